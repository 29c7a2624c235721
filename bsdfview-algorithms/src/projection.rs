//! 3D placement of points and projection to canvas pixels.
//!
//! A point sits at `(x, h, y)` where `(x, y)` is its disk coordinate and `h`
//! its normalized intensity ("height") at the displayed wavelength.

use bsdfview_core::{Error, PointCloud, Result};
use glam::{Mat4, Vec2, Vec3};

use crate::stats::{compute_slice, Subset};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How intensities are mapped to heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeightScale {
    /// `(I - min) / (max - min)`
    #[default]
    Linear,
    /// `ln(I - min + 1) / ln(max - min + 1)`
    Log,
}

/// Normalized heights of every point at one wavelength, in `[0, 1]`.
///
/// A dataset whose intensities are all equal gets height 0 everywhere.
///
/// # Errors
/// Returns `InvalidWavelength` if `wavelength` is out of range.
pub fn heights(cloud: &PointCloud, wavelength: usize, scale: HeightScale) -> Result<Vec<f32>> {
    let stats = compute_slice(cloud, Subset::All, wavelength)?;
    let min = stats.min_intensity;
    let range = stats.range();
    let intensities = cloud.intensities(wavelength)?;

    if range <= 0.0 {
        return Ok(vec![0.0; cloud.len()]);
    }
    let heights = match scale {
        HeightScale::Linear => intensities.iter().map(|&i| (i - min) / range).collect(),
        HeightScale::Log => {
            let denom = range.ln_1p();
            intensities
                .iter()
                .map(|&i| (i - min).ln_1p() / denom)
                .collect()
        }
    };
    Ok(heights)
}

/// Checks that a height buffer belongs to `cloud`.
///
/// # Errors
/// Returns `DimensionMismatch` if the lengths differ.
pub fn check_heights(cloud: &PointCloud, heights: &[f32]) -> Result<()> {
    if heights.len() == cloud.len() {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            expected: cloud.len(),
            found: heights.len(),
        })
    }
}

/// 3D position of a point.
///
/// # Panics
/// Panics if `index` is out of bounds for the cloud or the heights.
#[must_use]
pub fn point_position(cloud: &PointCloud, heights: &[f32], index: usize) -> Vec3 {
    let [x, y] = cloud.projected_point(index);
    Vec3::new(x, heights[index], y)
}

/// Maps 3D positions to canvas pixels.
///
/// Pixel `(0, 0)` is the top-left corner of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjector {
    /// Model-view-projection matrix supplied by the viewer.
    pub mvp: Mat4,
    /// Canvas size in pixels.
    pub canvas: Vec2,
}

impl ScreenProjector {
    /// Creates a projector.
    #[must_use]
    pub fn new(mvp: Mat4, canvas: Vec2) -> Self {
        Self { mvp, canvas }
    }

    /// Projects a position, or `None` if it lies behind the camera.
    #[must_use]
    pub fn project(&self, position: Vec3) -> Option<Vec2> {
        let clip = self.mvp * position.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.canvas.x,
            (1.0 - ndc.y) * 0.5 * self.canvas.y,
        ))
    }

    /// Projects point `index` of the cloud.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn project_point(&self, cloud: &PointCloud, heights: &[f32], index: usize) -> Option<Vec2> {
        self.project(point_position(cloud, heights, index))
    }
}
