use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{debug, error, info, warn};

use phototag::import_data;
use phototag::locator;
use phototag::photo_exif;
use phototag::quality::QualityLimits;
use phototag::track_data;
use phototag::track_history::{HistoryError, TrackHistory};

#[derive(Parser, Debug)]
#[command(about = "Geotag photos from a recorded location-history track")]
struct Args {
    /// KML or GPX track log, or a snapshot produced by --write-snapshot
    #[arg(short = 'f', long)]
    history: PathBuf,

    /// Shift every photo's capture time by this many minutes
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset: f64,

    /// Distance fuzziness limit in meters (how far apart the bracketing
    /// samples may be)
    #[arg(short = 'd', long)]
    max_distance: Option<f64>,

    /// Time fuzziness limit in seconds (how far the nearest sample may be)
    #[arg(short = 't', long)]
    max_time: Option<f64>,

    /// Write the GPS tags into the photos (default is a dry run)
    #[arg(short, long)]
    save: bool,

    /// Process photos even when they already carry GPS tags
    #[arg(short = 'F', long)]
    force: bool,

    /// Persist the parsed history as a snapshot for faster reuse
    #[arg(short = 'c', long)]
    write_snapshot: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,

    /// Photos to process
    #[arg(required = true)]
    photos: Vec<PathBuf>,
}

/// What happened to one photo. Failures are a separate channel; skipping
/// a photo that already has a position is an outcome, not an error.
enum PhotoOutcome {
    Tagged,
    Located,
    SkippedExistingGps,
}

fn process_photo(
    photo: &Path,
    history: &TrackHistory,
    limits: &QualityLimits,
    offset_secs: i64,
    save: bool,
    force: bool,
) -> Result<PhotoOutcome> {
    if !force && photo_exif::has_gps(photo)? {
        return Ok(PhotoOutcome::SkippedExistingGps);
    }

    let timestamp = photo_exif::capture_timestamp(photo)? + offset_secs;
    let result = locator::locate(history, timestamp)?;

    let verdict = limits.check(&result);
    if verdict.distance_exceeded {
        warn!(
            "distance difference too big ({:.0}m > {:.0}m)",
            result.distance_diff,
            limits.max_distance.unwrap_or_default()
        );
    }
    if verdict.time_exceeded {
        warn!(
            "time difference too big ({:.0}s > {:.0}s)",
            result.time_diff,
            limits.max_time.unwrap_or_default()
        );
    }
    if verdict.rejected() {
        bail!("both distance and time limits exceeded");
    }

    info!(
        "position: {:.6}, {:.6} ({:.0}% along the bracket)",
        result.latitude,
        result.longitude,
        result.percentage * 100.0
    );
    debug!(
        "https://maps.google.com/maps?q={:.6},{:.6}",
        result.latitude, result.longitude
    );

    if save {
        photo_exif::write_gps(photo, result.latitude, result.longitude, result.altitude)?;
        Ok(PhotoOutcome::Tagged)
    } else {
        Ok(PhotoOutcome::Located)
    }
}

fn run(args: &Args) -> Result<bool> {
    let history = import_data::load_history(&args.history)
        .with_context(|| format!("unable to load history from {}", args.history.display()))?;
    if history.len() < 2 {
        bail!(HistoryError::TooFewEntries(history.len()));
    }
    info!(
        "loaded {} track points from {}",
        history.len(),
        args.history.display()
    );

    if let Some(path) = &args.write_snapshot {
        track_data::write_snapshot_file(&history, path)
            .with_context(|| format!("unable to write snapshot to {}", path.display()))?;
        info!("snapshot written to {}", path.display());
    }

    let limits = QualityLimits {
        max_distance: args.max_distance,
        max_time: args.max_time,
    };
    let offset_secs = (args.offset * 60.0).round() as i64;
    if offset_secs != 0 {
        debug!("time offset: {}s", offset_secs);
    }

    let mut failed: Vec<&Path> = Vec::new();
    for photo in &args.photos {
        info!("processing {}", photo.display());
        match process_photo(photo, &history, &limits, offset_secs, args.save, args.force) {
            Ok(PhotoOutcome::Tagged) => info!("gps tags written"),
            Ok(PhotoOutcome::Located) => info!("dry run, nothing written"),
            Ok(PhotoOutcome::SkippedExistingGps) => {
                info!("skipped: photo already has gps tags")
            }
            Err(err) => {
                error!("{}: {:#}", photo.display(), err);
                failed.push(photo);
            }
        }
    }

    if !failed.is_empty() {
        error!(
            "failed photos ({}): {}",
            failed.len(),
            failed.iter().map(|p| p.display()).join(", ")
        );
    }
    Ok(failed.is_empty())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = phototag::logs::init(args.verbose) {
        eprintln!("unable to set up logging: {err:#}");
        return ExitCode::FAILURE;
    }
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
