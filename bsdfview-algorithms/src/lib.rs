//! bsdfview-algorithms: Selection and statistics over BSDF point clouds.
//!
//! This crate provides:
//! - **Statistics** - per-wavelength min/max/average over all or selected points
//! - **Projection** - point heights and MVP projection to canvas pixels
//! - **Selection** - picking, box selection with combination modes,
//!   extremum selection, path navigation and deletion
//!
#![warn(missing_docs)]

pub mod projection;
pub mod selection;
pub mod stats;

pub use projection::{heights, point_position, HeightScale, ScreenProjector};
pub use selection::{
    delete_selected_points, deselect_all, move_selection_along_path, select_all,
    select_closest_point, select_extreme_point, select_points, selection_center,
    selection_spectrum, Extremum, PathDirection, SelectionBox, SelectionConfig, SelectionMode,
};
pub use stats::{compute_slice, compute_stats, PointsStats, StatsSlice, Subset};

// Re-export the data model the algorithms operate on
pub use bsdfview_core::{Error, PointCloud, Result};
