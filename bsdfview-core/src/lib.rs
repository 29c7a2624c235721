//! bsdfview-core: Core data model for measured BSDF point clouds.
//!
//! This crate provides the header metadata, the angular to planar
//! coordinate transform and the [`PointCloud`] that keeps samples,
//! projected coordinates and the selection mask aligned.
//!

pub mod cloud;
pub mod error;
pub mod metadata;
pub mod transform;

pub use cloud::{PointCloud, FIRST_INTENSITY_ROW, PHI_ROW, THETA_ROW};
pub use error::{Error, Result};
pub use metadata::Metadata;
pub use transform::project_angles;
