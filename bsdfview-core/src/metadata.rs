//! Dataset header metadata.
//!
//! Header lines start with `#` and are kept verbatim, as the original bytes,
//! so they can be written back unchanged. Directives are read from a lossy
//! UTF-8 decoding of those bytes. A handful of directives are interpreted on top of that:
//!
//! | directive              | meaning                                  |
//! |------------------------|------------------------------------------|
//! | `sample_name`          | material name (quotes stripped)          |
//! | `datapoints_in_file`   | point count claimed by the header        |
//! | `intheta` / `inphi`    | incident angle in degrees                |
//! | `spectral`             | `0/1/true/false/yes/no` format flag      |
//! | `data_points_per_loop` | intensities per point (spectral format)  |
//! | `wavelengths`          | wavelength list in nm                    |
//!
//! Keys are case-insensitive and may be separated from their value by
//! whitespace and/or a colon (`#intheta 30`, `# spectral: 1`).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shortest wavelength of the default spectral range (nm).
pub const DEFAULT_WAVELENGTH_MIN_NM: f32 = 360.0;
/// Longest wavelength of the default spectral range (nm).
pub const DEFAULT_WAVELENGTH_MAX_NM: f32 = 1000.0;

/// Header information of a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metadata {
    raw_lines: Vec<String>,
    raw_bytes: Vec<Vec<u8>>,
    is_spectral: bool,
    data_points_per_loop: usize,
    points_in_file: usize,
    sample_name: Option<String>,
    incident_angle: Option<(f32, f32)>,
    declared_points: Option<usize>,
    wavelengths: Vec<f32>,
}

impl Metadata {
    /// Creates empty metadata (standard format, no header lines).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds metadata from raw header lines and interprets known directives.
    #[must_use]
    pub fn from_header_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut metadata = Self::new();
        for line in lines {
            metadata.add_line(line);
        }
        metadata.init_infos();
        metadata
    }

    /// Builds metadata from header lines as read from a file, in any
    /// encoding.
    #[must_use]
    pub fn from_raw_header_lines<I, B>(lines: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut metadata = Self::new();
        for line in lines {
            metadata.add_raw_line(line.as_ref());
        }
        metadata.init_infos();
        metadata
    }

    /// Appends a raw header line. Call [`Metadata::init_infos`] afterwards.
    pub fn add_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.raw_bytes.push(line.as_bytes().to_vec());
        self.raw_lines.push(line);
    }

    /// Appends a header line given as bytes. Non UTF-8 bytes are kept for
    /// writing and replaced only in the decoded text.
    pub fn add_raw_line(&mut self, line: &[u8]) {
        self.raw_lines.push(String::from_utf8_lossy(line).into_owned());
        self.raw_bytes.push(line.to_vec());
    }

    /// Re-interprets every header directive from the raw lines.
    pub fn init_infos(&mut self) {
        let mut spectral_flag = None;
        let mut per_loop = None;
        let mut in_theta = None;
        let mut in_phi = None;

        self.sample_name = None;
        self.declared_points = None;
        self.wavelengths.clear();

        for line in &self.raw_lines {
            let Some((key, value)) = split_directive(line) else {
                continue;
            };
            match key.as_str() {
                "sample_name" => {
                    let name = value.trim_matches(|c: char| c == '"' || c == '\'').trim();
                    if !name.is_empty() {
                        self.sample_name = Some(name.to_string());
                    }
                }
                "datapoints_in_file" => self.declared_points = value.parse().ok(),
                "intheta" => in_theta = value.parse::<f32>().ok(),
                "inphi" => in_phi = value.parse::<f32>().ok(),
                "spectral" => spectral_flag = parse_flag(value),
                "data_points_per_loop" => per_loop = value.parse::<usize>().ok(),
                "wavelengths" => {
                    let parsed: Option<Vec<f32>> = value
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|tok| !tok.is_empty())
                        .map(|tok| tok.parse::<f32>().ok())
                        .collect();
                    self.wavelengths = parsed.unwrap_or_default();
                }
                _ => {}
            }
        }

        self.is_spectral = spectral_flag.unwrap_or(per_loop.is_some_and(|n| n > 0));
        self.data_points_per_loop = if self.is_spectral {
            per_loop.unwrap_or(0)
        } else {
            0
        };
        self.incident_angle = in_theta.zip(in_phi);
    }

    /// Header lines decoded as text, in file order.
    #[must_use]
    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    /// Header lines exactly as read, in file order.
    #[must_use]
    pub fn raw_bytes(&self) -> &[Vec<u8>] {
        &self.raw_bytes
    }

    /// Whether the data lines carry one intensity per wavelength.
    #[must_use]
    pub fn is_spectral(&self) -> bool {
        self.is_spectral
    }

    /// Intensities per point in the spectral format, 0 for the standard one.
    ///
    /// May also be 0 for a spectral header that does not state the count;
    /// the loader then infers it from the first data line.
    #[must_use]
    pub fn data_points_per_loop(&self) -> usize {
        self.data_points_per_loop
    }

    /// Sets the number of intensities per point (spectral format only).
    pub fn set_data_points_per_loop(&mut self, count: usize) {
        if self.is_spectral {
            self.data_points_per_loop = count;
        }
    }

    /// Number of points actually loaded. Only meaningful after loading.
    #[must_use]
    pub fn points_in_file(&self) -> usize {
        self.points_in_file
    }

    /// Records the number of points actually loaded.
    pub fn set_points_in_file(&mut self, count: usize) {
        self.points_in_file = count;
    }

    /// Material name from the `sample_name` directive.
    #[must_use]
    pub fn sample_name(&self) -> Option<&str> {
        self.sample_name.as_deref()
    }

    /// Incident angle `(theta, phi)` in degrees, if the header gives both.
    #[must_use]
    pub fn incident_angle(&self) -> Option<(f32, f32)> {
        self.incident_angle
    }

    /// Point count claimed by the header; not trusted beyond capacity hints.
    #[must_use]
    pub fn declared_points(&self) -> Option<usize> {
        self.declared_points
    }

    /// Explicit wavelength list from the header (nm).
    #[must_use]
    pub fn wavelengths(&self) -> &[f32] {
        &self.wavelengths
    }

    /// Number of intensity values per point.
    #[must_use]
    pub fn intensity_count(&self) -> usize {
        if self.is_spectral {
            self.data_points_per_loop
        } else {
            1
        }
    }

    /// Wavelength in nm of the given intensity index (spectral format only).
    ///
    /// Uses the header's wavelength list when it matches the intensity count,
    /// otherwise spreads the indices evenly over 360–1000 nm.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn wavelength_nm(&self, index: usize) -> Option<f32> {
        let count = self.intensity_count();
        if !self.is_spectral || index >= count {
            return None;
        }
        if self.wavelengths.len() == count {
            return Some(self.wavelengths[index]);
        }
        if count == 1 {
            return Some(DEFAULT_WAVELENGTH_MIN_NM);
        }
        let t = index as f32 / (count - 1) as f32;
        Some(DEFAULT_WAVELENGTH_MIN_NM + t * (DEFAULT_WAVELENGTH_MAX_NM - DEFAULT_WAVELENGTH_MIN_NM))
    }

    /// Human readable `(key, value)` pairs for an info panel.
    #[must_use]
    pub fn summary(&self) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        if let Some(name) = &self.sample_name {
            rows.push(("Sample name".to_string(), name.clone()));
        }
        rows.push((
            "Format".to_string(),
            if self.is_spectral { "spectral" } else { "standard" }.to_string(),
        ));
        if self.is_spectral {
            rows.push((
                "Data points per loop".to_string(),
                self.data_points_per_loop.to_string(),
            ));
        }
        rows.push(("Points in file".to_string(), self.points_in_file.to_string()));
        if let Some((theta, phi)) = self.incident_angle {
            rows.push(("Incident angle".to_string(), format!("{theta}° / {phi}°")));
        }
        rows
    }
}

/// Splits `#key value` / `# key: value` into a lowercase key and trimmed value.
fn split_directive(line: &str) -> Option<(String, &str)> {
    let body = line.strip_prefix('#')?.trim_start();
    let key_end = body
        .find(|c: char| c.is_whitespace() || c == ':')
        .unwrap_or(body.len());
    let (key, rest) = body.split_at(key_end);
    if key.is_empty() {
        return None;
    }
    let value = rest.trim_start().strip_prefix(':').unwrap_or(rest).trim();
    Some((key.to_ascii_lowercase(), value))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
