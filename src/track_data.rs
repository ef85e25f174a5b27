use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Ok, Result};
use integer_encoding::*;

use crate::track_history::{Coordinate, TrackHistory, TrackPoint};

/* Snapshot format for a parsed history, so repeated runs skip the XML
   parsing. Magic header + one version byte, then a zstd-compressed body:
   varint point count, then per point a varint timestamp and big-endian
   f64 longitude/latitude/altitude. The sequence is stored verbatim, in
   history order.
*/

// 3 is the zstd default
const ZSTD_COMPRESS_LEVEL: i32 = 3;

const SNAPSHOT_MAGIC_HEADER: [u8; 3] = [b'P', b'T', b'H'];
const SNAPSHOT_VERSION: u8 = 1;

pub fn serialize_history<T: Write>(history: &TrackHistory, mut writer: T) -> Result<()> {
    writer.write_all(&SNAPSHOT_MAGIC_HEADER)?;
    writer.write_all(&[SNAPSHOT_VERSION])?;

    // body is compressed as a whole
    let mut encoder = zstd::Encoder::new(writer, ZSTD_COMPRESS_LEVEL)?.auto_finish();
    encoder.write_all(&(history.len() as u64).encode_var_vec())?;
    for point in history.iter() {
        encoder.write_all(&point.timestamp.encode_var_vec())?;
        encoder.write_all(&point.coordinate.longitude.to_be_bytes())?;
        encoder.write_all(&point.coordinate.latitude.to_be_bytes())?;
        encoder.write_all(&point.coordinate.altitude.to_be_bytes())?;
    }
    Ok(())
}

pub fn deserialize_history<T: Read>(mut reader: T) -> Result<TrackHistory> {
    let mut magic_header: [u8; 3] = [0; 3];
    reader.read_exact(&mut magic_header)?;
    if magic_header != SNAPSHOT_MAGIC_HEADER {
        bail!(
            "invalid snapshot magic header, expect: {:?}, got: {:?}",
            SNAPSHOT_MAGIC_HEADER,
            &magic_header
        );
    };
    let mut version: [u8; 1] = [0; 1];
    reader.read_exact(&mut version)?;
    if version[0] != SNAPSHOT_VERSION {
        bail!("unsupported snapshot version: {}", version[0]);
    }

    let mut decoder = zstd::Decoder::new(reader)?;
    let points_count: u64 = decoder.read_varint()?;
    let mut points = Vec::with_capacity(points_count as usize);
    for _ in 0..points_count {
        let timestamp: i64 = decoder.read_varint()?;
        let mut buf: [u8; 8] = [0; 8];
        decoder.read_exact(&mut buf)?;
        let longitude = f64::from_be_bytes(buf);
        decoder.read_exact(&mut buf)?;
        let latitude = f64::from_be_bytes(buf);
        decoder.read_exact(&mut buf)?;
        let altitude = f64::from_be_bytes(buf);
        points.push(TrackPoint {
            timestamp,
            coordinate: Coordinate {
                longitude,
                latitude,
                altitude,
            },
        });
    }
    Ok(TrackHistory::from_points(points))
}

pub fn write_snapshot_file(history: &TrackHistory, path: &Path) -> Result<()> {
    serialize_history(history, BufWriter::new(File::create(path)?))
}

pub fn read_snapshot_file(path: &Path) -> Result<TrackHistory> {
    deserialize_history(BufReader::new(File::open(path)?))
}
