//! BSDF text file writer.

use crate::{Error, Result};
use bsdfview_core::PointCloud;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writer for the BSDF text format.
///
/// Emits the header lines verbatim followed by one line per point, values
/// separated by a single space with six decimal places.
pub struct DatasetWriter<W: Write> {
    writer: W,
}

impl DatasetWriter<BufWriter<File>> {
    /// Creates a buffered writer on a new file.
    ///
    /// # Errors
    /// Returns [`Error::Open`] if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }

    /// Writes `cloud` to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> Result<()> {
        let mut writer = Self::create(path)?;
        writer.write_cloud(cloud)?;
        writer.flush()
    }
}

impl<W: Write> DatasetWriter<W> {
    /// Wraps any writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Serializes a cloud into `writer`.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to(cloud: &PointCloud, writer: W) -> Result<W> {
        let mut this = Self::new(writer);
        this.write_cloud(cloud)?;
        this.flush()?;
        Ok(this.writer)
    }

    /// Writes header and points.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_cloud(&mut self, cloud: &PointCloud) -> Result<()> {
        for line in cloud.metadata().raw_bytes() {
            self.writer.write_all(line)?;
            self.writer.write_all(b"\n")?;
        }

        for column in cloud.samples().columns() {
            let mut values = column.iter();
            if let Some(first) = values.next() {
                write!(self.writer, "{first:.6}")?;
            }
            for value in values {
                write!(self.writer, " {value:.6}")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
