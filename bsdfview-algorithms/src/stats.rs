//! Intensity statistics over a point cloud.
//!
//! Statistics are always recomputed from scratch, either over every point or
//! over the current selection. Each wavelength gets its own slice; the slice
//! of the active wavelength is also exposed as [`PointsStats::current`].

use bsdfview_core::{PointCloud, Result};
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which points take part in a statistics pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Subset {
    /// Every point of the cloud.
    #[default]
    All,
    /// Only the currently selected points.
    Selected,
}

/// Intensity statistics of one wavelength.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatsSlice {
    /// Smallest intensity, 0.0 when empty.
    pub min_intensity: f32,
    /// Largest intensity, 0.0 when empty.
    pub max_intensity: f32,
    /// Mean intensity, 0.0 when empty.
    pub average_intensity: f32,
    /// Number of points that contributed.
    pub points_count: usize,
    /// Index of the first point holding the minimum.
    pub lowest_point: Option<usize>,
    /// Index of the first point holding the maximum.
    pub highest_point: Option<usize>,
}

impl StatsSlice {
    /// Statistics of an empty point set.
    pub const EMPTY: Self = Self {
        min_intensity: 0.0,
        max_intensity: 0.0,
        average_intensity: 0.0,
        points_count: 0,
        lowest_point: None,
        highest_point: None,
    };

    /// Returns true if no point contributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points_count == 0
    }

    /// `max - min`, 0.0 when empty.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.max_intensity - self.min_intensity
    }
}

impl Default for StatsSlice {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Per-wavelength statistics snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointsStats {
    /// Points the snapshot was computed over.
    pub subset: Subset,
    /// Number of contributing points.
    pub points_count: usize,
    /// Active wavelength index.
    pub wavelength_index: usize,
    /// One slice per wavelength index.
    pub slices: Vec<StatsSlice>,
    /// Copy of the active wavelength's slice.
    pub current: StatsSlice,
}

impl PointsStats {
    /// Slice of a wavelength index, if it exists.
    #[must_use]
    pub fn slice(&self, wavelength: usize) -> Option<&StatsSlice> {
        self.slices.get(wavelength)
    }

    /// Returns true if no point contributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points_count == 0
    }
}

/// Computes statistics of every wavelength, with `wavelength` as the
/// current one.
///
/// # Errors
/// Returns `InvalidWavelength` if `wavelength` is out of range.
pub fn compute_stats(cloud: &PointCloud, subset: Subset, wavelength: usize) -> Result<PointsStats> {
    cloud.check_wavelength(wavelength)?;

    let slices: Vec<StatsSlice> = (0..cloud.intensity_count())
        .into_par_iter()
        .map(|w| slice_unchecked(cloud, subset, w))
        .collect();
    let current = slices[wavelength];

    Ok(PointsStats {
        subset,
        points_count: current.points_count,
        wavelength_index: wavelength,
        slices,
        current,
    })
}

/// Computes the statistics of a single wavelength.
///
/// # Errors
/// Returns `InvalidWavelength` if `wavelength` is out of range.
pub fn compute_slice(cloud: &PointCloud, subset: Subset, wavelength: usize) -> Result<StatsSlice> {
    cloud.check_wavelength(wavelength)?;
    Ok(slice_unchecked(cloud, subset, wavelength))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn slice_unchecked(cloud: &PointCloud, subset: Subset, wavelength: usize) -> StatsSlice {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut lowest = None;
    let mut highest = None;
    let mut sum = 0.0_f64;
    let mut count = 0usize;

    let selection = cloud.selection();
    for index in 0..cloud.len() {
        if subset == Subset::Selected && !selection[index] {
            continue;
        }
        let intensity = cloud.intensity(index, wavelength);
        // strict comparisons: the first occurrence keeps the extremum
        if intensity < min {
            min = intensity;
            lowest = Some(index);
        }
        if intensity > max {
            max = intensity;
            highest = Some(index);
        }
        sum += f64::from(intensity);
        count += 1;
    }

    if count == 0 {
        return StatsSlice::EMPTY;
    }
    StatsSlice {
        min_intensity: min,
        max_intensity: max,
        average_intensity: (sum / count as f64) as f32,
        points_count: count,
        lowest_point: lowest,
        highest_point: highest,
    }
}
