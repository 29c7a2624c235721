//! Point cloud of measured samples.
//!
//! A [`PointCloud`] owns four collections that describe the same points:
//! the raw sample matrix, the projected disk coordinates, the selection mask
//! and the metadata's point count. They always have the same length and are
//! index aligned. Structural changes only happen through
//! [`PointCloud::retain_points`], which compacts all of them at once.

use crate::transform::project_angles;
use crate::{Error, Metadata, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// Row of the polar angle in the sample matrix.
pub const THETA_ROW: usize = 0;
/// Row of the azimuth in the sample matrix.
pub const PHI_ROW: usize = 1;
/// Row of the first intensity in the sample matrix.
pub const FIRST_INTENSITY_ROW: usize = 2;

/// Measured samples with their projected coordinates and selection state.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    metadata: Metadata,
    /// `(theta, phi, intensities...)` per column, columns in file order.
    samples: Array2<f32>,
    /// `(x, y)` disk coordinates per column.
    projected: Array2<f32>,
    selected: Vec<bool>,
}

impl PointCloud {
    /// Creates a cloud from a sample matrix, projecting every column.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSampleWidth`] if the matrix has fewer than
    /// three rows.
    pub fn new(metadata: Metadata, samples: Array2<f32>) -> Result<Self> {
        let mut projected = Array2::zeros((2, samples.ncols()));
        for (col, mut out) in samples.columns().into_iter().zip(projected.columns_mut()) {
            let [x, y] = project_angles(col[THETA_ROW], col[PHI_ROW]);
            out[0] = x;
            out[1] = y;
        }
        Self::from_parts(metadata, samples, projected)
    }

    /// Creates a cloud from already projected coordinates.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSampleWidth`] for fewer than three sample rows
    /// and [`Error::DimensionMismatch`] if the projected matrix is not
    /// `2 x n_points`.
    pub fn from_parts(
        mut metadata: Metadata,
        samples: Array2<f32>,
        projected: Array2<f32>,
    ) -> Result<Self> {
        if samples.nrows() <= FIRST_INTENSITY_ROW {
            return Err(Error::InvalidSampleWidth(samples.nrows()));
        }
        if projected.nrows() != 2 {
            return Err(Error::DimensionMismatch {
                expected: 2,
                found: projected.nrows(),
            });
        }
        if projected.ncols() != samples.ncols() {
            return Err(Error::DimensionMismatch {
                expected: samples.ncols(),
                found: projected.ncols(),
            });
        }
        let n_points = samples.ncols();
        metadata.set_points_in_file(n_points);
        Ok(Self {
            metadata,
            samples,
            projected,
            selected: vec![false; n_points],
        })
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.ncols()
    }

    /// Returns true if the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dataset header.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Raw sample matrix, one column per point.
    #[must_use]
    pub fn samples(&self) -> ArrayView2<'_, f32> {
        self.samples.view()
    }

    /// Projected coordinates, one `(x, y)` column per point.
    #[must_use]
    pub fn projected(&self) -> ArrayView2<'_, f32> {
        self.projected.view()
    }

    /// Number of rows per sample (`theta`, `phi` and the intensities).
    #[must_use]
    pub fn sample_width(&self) -> usize {
        self.samples.nrows()
    }

    /// Number of intensities (wavelengths) per point.
    #[must_use]
    pub fn intensity_count(&self) -> usize {
        self.sample_width() - FIRST_INTENSITY_ROW
    }

    /// Checks that `wavelength` addresses an intensity row.
    ///
    /// # Errors
    /// Returns [`Error::InvalidWavelength`] when out of range.
    pub fn check_wavelength(&self, wavelength: usize) -> Result<()> {
        if wavelength < self.intensity_count() {
            Ok(())
        } else {
            Err(Error::InvalidWavelength {
                index: wavelength,
                count: self.intensity_count(),
            })
        }
    }

    /// Intensities of every point at one wavelength.
    ///
    /// # Errors
    /// Returns [`Error::InvalidWavelength`] when out of range.
    pub fn intensities(&self, wavelength: usize) -> Result<ArrayView1<'_, f32>> {
        self.check_wavelength(wavelength)?;
        Ok(self.samples.row(FIRST_INTENSITY_ROW + wavelength))
    }

    /// Full sample column of one point.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn sample(&self, index: usize) -> ArrayView1<'_, f32> {
        self.samples.column(index)
    }

    /// Polar angle of a point in degrees.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn theta(&self, index: usize) -> f32 {
        self.samples[[THETA_ROW, index]]
    }

    /// Azimuth of a point in degrees.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn phi(&self, index: usize) -> f32 {
        self.samples[[PHI_ROW, index]]
    }

    /// Intensity of a point at a wavelength.
    ///
    /// # Panics
    /// Panics if `index` or `wavelength` is out of bounds.
    #[must_use]
    pub fn intensity(&self, index: usize, wavelength: usize) -> f32 {
        self.samples[[FIRST_INTENSITY_ROW + wavelength, index]]
    }

    /// Projected disk coordinate of a point.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn projected_point(&self, index: usize) -> [f32; 2] {
        [self.projected[[0, index]], self.projected[[1, index]]]
    }

    /// Selection mask, index aligned with the samples.
    #[must_use]
    pub fn selection(&self) -> &[bool] {
        &self.selected
    }

    /// Mutable selection mask. Its length is fixed to the point count.
    pub fn selection_mut(&mut self) -> &mut [bool] {
        &mut self.selected
    }

    /// Whether a point is selected.
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Number of selected points.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }

    /// Returns true if at least one point is selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.selected.iter().any(|&s| s)
    }

    /// Indices of the selected points in file order.
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
    }

    /// Sets every mask entry to `selected`.
    pub fn set_all_selected(&mut self, selected: bool) {
        self.selected.fill(selected);
    }

    /// Replaces the selection by exactly one point. Out of range is a no-op.
    pub fn select_only(&mut self, index: usize) {
        if index < self.len() {
            self.selected.fill(false);
            self.selected[index] = true;
        }
    }

    /// Keeps the points for which `keep(index)` is true and compacts the
    /// samples, projected coordinates and selection mask together.
    ///
    /// Returns the number of removed points.
    pub fn retain_points<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(usize) -> bool,
    {
        let kept: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        let removed = self.len() - kept.len();
        if removed == 0 {
            return 0;
        }

        self.samples = self.samples.select(Axis(1), &kept);
        self.projected = self.projected.select(Axis(1), &kept);
        self.selected = kept.iter().map(|&i| self.selected[i]).collect();
        self.metadata.set_points_in_file(self.len());

        debug_assert!(self.is_aligned());
        removed
    }

    /// Removes every selected point. Returns the number of removed points.
    pub fn remove_selected(&mut self) -> usize {
        let mask = self.selected.clone();
        self.retain_points(|i| !mask[i])
    }

    /// Whether all parallel collections agree on the point count.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let n = self.samples.ncols();
        self.projected.ncols() == n
            && self.selected.len() == n
            && self.metadata.points_in_file() == n
    }
}
