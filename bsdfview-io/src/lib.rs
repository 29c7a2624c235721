//! bsdfview-io: BSDF text file I/O for bsdfview.
//!
//! This crate provides:
//! - **Parsing** - two-pass header/sample parsing of the standard and
//!   spectral text formats, with duplicate detection
//! - **Loading** - memory-mapped file loading via memmap2
//! - **Writing** - the same text format back out
//! - **Datasets** - a loaded cloud with cached statistics
//! - **Background loading** - a worker pool posting results to a queue
//!

mod dataset;
mod error;
mod loader;
mod parser;
mod queue;
mod reader;
mod writer;

pub use dataset::Dataset;
pub use error::{Error, Result};
pub use loader::{load_bytes, load_file};
pub use parser::{parse_header, parse_samples, DuplicatePoint, LoadReport};
pub use queue::{LoadQueue, LoadQueueConfig, LoadResult};
pub use reader::MappedFileReader;
pub use writer::DatasetWriter;
