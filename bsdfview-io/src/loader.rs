//! Point cloud loading from bytes and files.

use std::path::Path;
use std::time::Instant;

use bsdfview_core::PointCloud;

use crate::parser::{parse_header, parse_samples, LoadReport};
use crate::reader::MappedFileReader;
use crate::Result;

/// Parses a complete BSDF text file held in memory.
///
/// # Errors
/// Returns [`crate::Error::MissingData`] for input without data lines and
/// [`crate::Error::MalformedLine`] for an unparseable data line.
pub fn load_bytes(bytes: &[u8]) -> Result<(PointCloud, LoadReport)> {
    let mut metadata = parse_header(bytes)?;
    let (samples, report) = parse_samples(bytes, &mut metadata)?;
    let cloud = PointCloud::new(metadata, samples)?;
    Ok((cloud, report))
}

/// Memory-maps and parses a BSDF text file.
///
/// # Errors
/// Returns [`crate::Error::Open`] if the file cannot be read, otherwise
/// the errors of [`load_bytes`].
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<(PointCloud, LoadReport)> {
    let start = Instant::now();
    let reader = MappedFileReader::open(path)?;
    let loaded = load_bytes(reader.as_bytes())?;
    log::debug!(
        "loaded {} points from {} ({} bytes) in {:.2?}",
        loaded.0.len(),
        reader.path().display(),
        reader.len(),
        start.elapsed()
    );
    Ok(loaded)
}
