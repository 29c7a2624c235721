//! Two-pass text parser for BSDF point files.
//!
//! Pass 1 ([`parse_header`]) collects the `#` comment lines that precede
//! the first data line. Pass 2 ([`parse_samples`]) re-scans the same bytes
//! from the start and builds the sample matrix, skipping comments, blank
//! lines and duplicate `(theta, phi)` pairs.

use std::collections::HashSet;

use bsdfview_core::Metadata;
use ndarray::{Array2, ArrayView1};

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fields of a standard (single intensity) data line.
const STANDARD_WIDTH: usize = 3;

/// A data line skipped because its angles were already loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DuplicatePoint {
    /// 1-based line number of the skipped line.
    pub line: usize,
    /// Incident theta in degrees.
    pub theta: f32,
    /// Incident phi in degrees.
    pub phi: f32,
}

/// Non-fatal findings of a load.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoadReport {
    /// Skipped duplicate points, in file order.
    pub duplicates: Vec<DuplicatePoint>,
    /// Data lines read, duplicates included.
    pub data_lines: usize,
}

impl LoadReport {
    /// Returns true if nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
    }
}

enum Line<'a> {
    Comment(&'a [u8]),
    Data(&'a [u8]),
}

/// Iterates non-blank lines with their 1-based line numbers.
fn classified_lines(bytes: &[u8]) -> impl Iterator<Item = (usize, Line<'_>)> {
    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = raw.strip_suffix(b"\r").unwrap_or(raw);
            if line.iter().all(u8::is_ascii_whitespace) {
                None
            } else if line.first() == Some(&b'#') {
                Some((index + 1, Line::Comment(line)))
            } else {
                Some((index + 1, Line::Data(line)))
            }
        })
}

/// Reads the header: every comment line before the first data line.
///
/// # Errors
/// Returns [`Error::MissingData`] if the input has no data line.
pub fn parse_header(bytes: &[u8]) -> Result<Metadata> {
    let mut header = Vec::new();
    for (_, line) in classified_lines(bytes) {
        match line {
            Line::Comment(text) => header.push(text),
            Line::Data(_) => return Ok(Metadata::from_raw_header_lines(header)),
        }
    }
    Err(Error::MissingData)
}

/// Reads every data line into a `(sample_width, n_points)` matrix.
///
/// For a spectral header that does not state the number of intensities,
/// the count is inferred from the first data line and stored back into
/// `metadata`. Duplicate angle pairs keep their first occurrence and are
/// logged and listed in the returned report.
///
/// # Errors
/// Returns [`Error::MalformedLine`] for a line with the wrong number of
/// fields, a token that is not a number, or a non-finite value, and
/// [`Error::MissingData`] if there is no data line.
pub fn parse_samples(bytes: &[u8], metadata: &mut Metadata) -> Result<(Array2<f32>, LoadReport)> {
    let mut width = sample_width(metadata);
    // A value takes at least two bytes ("0 "), so neither reservation can
    // exceed what the input could hold, whatever the header claims.
    let capacity = metadata
        .declared_points()
        .unwrap_or(0)
        .min(bytes.len() / 4);

    let mut values: Vec<f32> = Vec::with_capacity(bytes.len() / 2);
    let mut seen: HashSet<(u32, u32)> = HashSet::with_capacity(capacity);
    let mut report = LoadReport::default();
    let mut fields: Vec<f32> = Vec::new();

    for (line_no, line) in classified_lines(bytes) {
        let Line::Data(text) = line else {
            continue;
        };
        parse_fields(line_no, text, &mut fields)?;
        report.data_lines += 1;

        let expected = match width {
            Some(w) => w,
            None => {
                let inferred = infer_width(line_no, fields.len())?;
                metadata.set_data_points_per_loop(inferred - 2);
                width = Some(inferred);
                inferred
            }
        };
        if fields.len() != expected {
            return Err(Error::malformed(
                line_no,
                format!("expected {expected} fields, found {}", fields.len()),
            ));
        }

        let (theta, phi) = (fields[0], fields[1]);
        if !seen.insert(angle_key(theta, phi)) {
            log::warn!("line {line_no}: duplicate point theta={theta} phi={phi}, skipped");
            report.duplicates.push(DuplicatePoint {
                line: line_no,
                theta,
                phi,
            });
            continue;
        }
        values.extend_from_slice(&fields);
    }

    let Some(width) = width else {
        return Err(Error::MissingData);
    };
    if report.data_lines == 0 {
        return Err(Error::MissingData);
    }

    let n_points = values.len() / width;
    let mut samples = Array2::zeros((width, n_points));
    for (mut column, point) in samples
        .columns_mut()
        .into_iter()
        .zip(values.chunks_exact(width))
    {
        column.assign(&ArrayView1::from(point));
    }
    Ok((samples, report))
}

/// Expected fields per data line, or `None` if it must be inferred.
fn sample_width(metadata: &Metadata) -> Option<usize> {
    if !metadata.is_spectral() {
        Some(STANDARD_WIDTH)
    } else if metadata.data_points_per_loop() > 0 {
        // Saturates for absurd counts, which then fail the field count check.
        Some(metadata.data_points_per_loop().saturating_add(2))
    } else {
        None
    }
}

fn infer_width(line_no: usize, found: usize) -> Result<usize> {
    if found >= STANDARD_WIDTH {
        Ok(found)
    } else {
        Err(Error::malformed(
            line_no,
            format!("spectral line needs at least {STANDARD_WIDTH} fields, found {found}"),
        ))
    }
}

fn parse_fields(line_no: usize, text: &[u8], out: &mut Vec<f32>) -> Result<()> {
    let text =
        std::str::from_utf8(text).map_err(|_| Error::malformed(line_no, "invalid UTF-8"))?;
    out.clear();
    for token in text.split_ascii_whitespace() {
        let value: f32 = token
            .parse()
            .map_err(|_| Error::malformed(line_no, format!("invalid number {token:?}")))?;
        if !value.is_finite() {
            return Err(Error::malformed(
                line_no,
                format!("non-finite value {token:?}"),
            ));
        }
        out.push(value);
    }
    Ok(())
}

/// Hash key under exact float equality, with -0.0 folded onto 0.0.
fn angle_key(theta: f32, phi: f32) -> (u32, u32) {
    ((theta + 0.0).to_bits(), (phi + 0.0).to_bits())
}
