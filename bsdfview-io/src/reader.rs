//! Memory-mapped file reader.

use crate::{Error, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without copying the whole file
/// into memory. Empty files are not mapped.
pub struct MappedFileReader {
    mmap: Option<Mmap>,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns [`Error::Open`] if the file cannot be opened or mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source: std::io::Error| Error::Open {
            path: path.clone(),
            source,
        };
        let file = File::open(&path).map_err(open_error)?;
        let len = file.metadata().map_err(open_error)?.len();
        // Zero-length mappings are rejected on some platforms, so an empty
        // file is read as an empty slice instead.
        let mmap = if len == 0 {
            None
        } else {
            // SAFETY: The file is opened read-only and we assume it is not modified concurrently
            // or truncated while mapped. Only non-empty files reach this point.
            #[allow(unsafe_code)]
            let mmap = unsafe { Mmap::map(&file) }.map_err(open_error)?;
            Some(mmap)
        };
        Ok(Self { mmap, path })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or_default()
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path the reader was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
