//! Point selection: picking, box selection, extremum and path navigation.
//!
//! Every function works on a [`PointCloud`] in place and only touches its
//! selection mask, except [`delete_selected_points`] which compacts the
//! whole cloud. Screen-space operations take the point heights of the
//! displayed wavelength and a [`ScreenProjector`] built from the viewer's
//! camera.

use bsdfview_core::{PointCloud, Result};
use glam::{Vec2, Vec3};
use rayon::prelude::*;

use crate::projection::{check_heights, point_position, ScreenProjector};
use crate::stats::{compute_slice, StatsSlice, Subset};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a region selection combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SelectionMode {
    /// Drop the previous selection.
    #[default]
    Replace,
    /// Union with the previous selection.
    Add,
    /// Remove the contained points from the previous selection.
    Subtract,
    /// Keep points that were selected and are contained.
    Intersect,
}

impl SelectionMode {
    /// Combines a previous mask entry with a containment test.
    #[inline]
    #[must_use]
    pub fn combine(self, previous: bool, contained: bool) -> bool {
        match self {
            SelectionMode::Replace => contained,
            SelectionMode::Add => previous || contained,
            SelectionMode::Subtract => previous && !contained,
            SelectionMode::Intersect => previous && contained,
        }
    }
}

/// Which extremum [`select_extreme_point`] looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Extremum {
    /// Minimum intensity.
    Lowest,
    /// Maximum intensity.
    Highest,
}

/// Direction of travel along the acquisition path (file order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathDirection {
    /// Towards higher indices.
    Forward,
    /// Towards lower indices.
    Backward,
}

/// Screen-space rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionBox {
    /// Top-left corner.
    pub top_left: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl SelectionBox {
    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub fn new(top_left: Vec2, size: Vec2) -> Self {
        Self { top_left, size }
    }

    /// Creates a box spanning two arbitrary drag corners.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let top_left = a.min(b);
        Self {
            top_left,
            size: a.max(b) - top_left,
        }
    }

    /// A degenerate box at `position`, meaning "no drag".
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            top_left: position,
            size: Vec2::ZERO,
        }
    }

    /// Returns true if the box has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Inclusive containment test. An empty box contains nothing.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        if self.is_empty() {
            return false;
        }
        let bottom_right = self.top_left + self.size;
        point.x >= self.top_left.x
            && point.y >= self.top_left.y
            && point.x <= bottom_right.x
            && point.y <= bottom_right.y
    }
}

/// Configuration for interactive selection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionConfig {
    /// Maximum cursor distance (pixels) for picking a single point.
    pub pick_radius_px: f32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            pick_radius_px: 10.0,
        }
    }
}

impl SelectionConfig {
    /// Creates a selection configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pick radius.
    #[must_use]
    pub fn with_pick_radius(mut self, pick_radius_px: f32) -> Self {
        self.pick_radius_px = pick_radius_px;
        self
    }
}

/// Selects the point closest to `cursor` on screen.
///
/// Only points within `max_distance_px` are candidates; points behind the
/// camera are ignored. On success the selection becomes exactly that point
/// (lowest index on ties). Otherwise the selection is left unchanged.
///
/// # Errors
/// Returns `DimensionMismatch` if `heights` does not match the cloud.
pub fn select_closest_point(
    cloud: &mut PointCloud,
    heights: &[f32],
    projector: &ScreenProjector,
    cursor: Vec2,
    max_distance_px: f32,
) -> Result<Option<usize>> {
    check_heights(cloud, heights)?;

    let max_sq = max_distance_px * max_distance_px;
    let mut best: Option<(usize, f32)> = None;
    for index in 0..cloud.len() {
        let Some(screen) = projector.project_point(cloud, heights, index) else {
            continue;
        };
        let dist_sq = screen.distance_squared(cursor);
        if dist_sq > max_sq {
            continue;
        }
        if best.is_none_or(|(_, d)| dist_sq < d) {
            best = Some((index, dist_sq));
        }
    }

    let picked = best.map(|(index, _)| index);
    if let Some(index) = picked {
        cloud.select_only(index);
    }
    Ok(picked)
}

/// Combines the points inside `selection_box` with the current selection.
///
/// An empty box contains no point: [`SelectionMode::Replace`] and
/// [`SelectionMode::Intersect`] then clear the selection while the other
/// modes leave it untouched. Returns the number of selected points.
///
/// # Errors
/// Returns `DimensionMismatch` if `heights` does not match the cloud.
pub fn select_points(
    cloud: &mut PointCloud,
    heights: &[f32],
    projector: &ScreenProjector,
    selection_box: &SelectionBox,
    mode: SelectionMode,
) -> Result<usize> {
    check_heights(cloud, heights)?;

    let contained: Vec<bool> = {
        let cloud = &*cloud;
        (0..cloud.len())
            .into_par_iter()
            .map(|index| {
                projector
                    .project_point(cloud, heights, index)
                    .is_some_and(|p| selection_box.contains(p))
            })
            .collect()
    };

    for (selected, inside) in cloud.selection_mut().iter_mut().zip(contained) {
        *selected = mode.combine(*selected, inside);
    }
    Ok(cloud.selected_count())
}

/// Selects the single point of lowest or highest intensity.
///
/// Candidates are the selected points, or every point when nothing is
/// selected. Ties go to the first point in file order. An empty cloud is
/// left unchanged and yields `None`.
///
/// # Errors
/// Returns `InvalidWavelength` if `wavelength` is out of range.
pub fn select_extreme_point(
    cloud: &mut PointCloud,
    wavelength: usize,
    extremum: Extremum,
) -> Result<Option<usize>> {
    let subset = if cloud.has_selection() {
        Subset::Selected
    } else {
        Subset::All
    };
    let slice = compute_slice(cloud, subset, wavelength)?;
    let target = extreme_index(&slice, extremum);
    if let Some(index) = target {
        cloud.select_only(index);
    }
    Ok(target)
}

/// Index of the requested extremum in a statistics slice.
#[must_use]
pub fn extreme_index(slice: &StatsSlice, extremum: Extremum) -> Option<usize> {
    match extremum {
        Extremum::Lowest => slice.lowest_point,
        Extremum::Highest => slice.highest_point,
    }
}

/// Moves every selected point one step along the file order.
///
/// The move is clamped: if a selected point already sits at the end in the
/// direction of travel, nothing moves. Returns whether the selection moved.
pub fn move_selection_along_path(cloud: &mut PointCloud, direction: PathDirection) -> bool {
    let n = cloud.len();
    if n == 0 || !cloud.has_selection() {
        return false;
    }
    let mask = cloud.selection_mut();
    match direction {
        PathDirection::Forward => {
            if mask[n - 1] {
                return false;
            }
            mask.rotate_right(1);
        }
        PathDirection::Backward => {
            if mask[0] {
                return false;
            }
            mask.rotate_left(1);
        }
    }
    true
}

/// Selects every point.
pub fn select_all(cloud: &mut PointCloud) {
    cloud.set_all_selected(true);
}

/// Clears the selection.
pub fn deselect_all(cloud: &mut PointCloud) {
    cloud.set_all_selected(false);
}

/// Deletes the selected points. Returns the number of removed points.
///
/// Indices held outside the cloud are invalid afterwards and statistics
/// must be recomputed.
pub fn delete_selected_points(cloud: &mut PointCloud) -> usize {
    cloud.remove_selected()
}

/// Mean 3D position of the selected points.
///
/// # Errors
/// Returns `DimensionMismatch` if `heights` does not match the cloud.
#[allow(clippy::cast_precision_loss)]
pub fn selection_center(cloud: &PointCloud, heights: &[f32]) -> Result<Option<Vec3>> {
    check_heights(cloud, heights)?;
    let (sum, count) = cloud
        .selected_indices()
        .fold((Vec3::ZERO, 0usize), |(sum, count), index| {
            (sum + point_position(cloud, heights, index), count + 1)
        });
    Ok((count > 0).then(|| sum / count as f32))
}

/// Full spectrum (every wavelength) of the highest selected point at
/// `wavelength`, or `None` without selection.
///
/// # Errors
/// Returns `InvalidWavelength` if `wavelength` is out of range.
pub fn selection_spectrum(cloud: &PointCloud, wavelength: usize) -> Result<Option<Vec<f32>>> {
    let slice = compute_slice(cloud, Subset::Selected, wavelength)?;
    Ok(slice.highest_point.map(|index| {
        (0..cloud.intensity_count())
            .map(|w| cloud.intensity(index, w))
            .collect()
    }))
}
