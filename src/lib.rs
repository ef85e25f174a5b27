#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod angle;
pub mod geo_utils;
pub mod import_data;
pub mod locator;
pub mod logs;
pub mod photo_exif;
pub mod quality;
pub mod track_data;
pub mod track_history;
