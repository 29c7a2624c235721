//! A loaded dataset: point cloud plus viewer-facing state.

use std::path::Path;

use bsdfview_algorithms::{
    compute_stats, heights, select_closest_point, select_points, selection, HeightScale,
    PointsStats, ScreenProjector, SelectionBox, SelectionConfig, SelectionMode, Subset,
};
use bsdfview_algorithms::{Extremum, PathDirection};
use bsdfview_core::PointCloud;
use glam::{Mat4, Vec2, Vec3};

use crate::loader::{load_bytes, load_file};
use crate::parser::LoadReport;
use crate::writer::DatasetWriter;
use crate::Result;

/// A point cloud with its name, dirty flag, active wavelength and cached
/// statistics.
///
/// Both statistics snapshots (full cloud and selection) are recomputed
/// after every mutation, so they always describe the current cloud.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    cloud: PointCloud,
    report: LoadReport,
    dirty: bool,
    wavelength_index: usize,
    height_scale: HeightScale,
    points_stats: PointsStats,
    selection_stats: PointsStats,
}

impl Dataset {
    /// Loads a dataset from a file. The name is the file stem.
    ///
    /// # Errors
    /// Returns any load error (see [`load_file`]).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (cloud, report) = load_file(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_cloud(name, cloud, report)
    }

    /// Loads a dataset from in-memory file contents.
    ///
    /// # Errors
    /// Returns any load error (see [`load_bytes`]).
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let (cloud, report) = load_bytes(bytes)?;
        Self::from_cloud(name, cloud, report)
    }

    /// Wraps an existing cloud.
    ///
    /// # Errors
    /// Fails only if the cloud has no intensity row.
    pub fn from_cloud(
        name: impl Into<String>,
        cloud: PointCloud,
        report: LoadReport,
    ) -> Result<Self> {
        let points_stats = compute_stats(&cloud, Subset::All, 0)?;
        let selection_stats = compute_stats(&cloud, Subset::Selected, 0)?;
        Ok(Self {
            name: name.into(),
            cloud,
            report,
            dirty: false,
            wavelength_index: 0,
            height_scale: HeightScale::default(),
            points_stats,
            selection_stats,
        })
    }

    fn refresh_stats(&mut self) -> Result<()> {
        self.points_stats = compute_stats(&self.cloud, Subset::All, self.wavelength_index)?;
        self.selection_stats =
            compute_stats(&self.cloud, Subset::Selected, self.wavelength_index)?;
        Ok(())
    }

    /// Dataset name (file stem).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name for display, underscores replaced by spaces.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }

    /// The underlying cloud.
    #[must_use]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Duplicates skipped during load.
    #[must_use]
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// True once points were deleted and not yet saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of points.
    #[must_use]
    pub fn points_count(&self) -> usize {
        self.cloud.len()
    }

    /// Average intensity of the whole cloud at the active wavelength.
    #[must_use]
    pub fn average_intensity(&self) -> f32 {
        self.points_stats.current.average_intensity
    }

    /// Whether any point is selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.cloud.has_selection()
    }

    /// The selection mask, one entry per point.
    #[must_use]
    pub fn selection_mask(&self) -> &[bool] {
        self.cloud.selection()
    }

    /// Statistics of every point.
    #[must_use]
    pub fn points_stats(&self) -> &PointsStats {
        &self.points_stats
    }

    /// Statistics of the selected points.
    #[must_use]
    pub fn selection_stats(&self) -> &PointsStats {
        &self.selection_stats
    }

    /// Active wavelength index.
    #[must_use]
    pub fn wavelength_index(&self) -> usize {
        self.wavelength_index
    }

    /// Changes the active wavelength.
    ///
    /// # Errors
    /// Returns `InvalidWavelength` if `index` is out of range; the dataset
    /// is left unchanged.
    pub fn set_wavelength_index(&mut self, index: usize) -> Result<()> {
        self.cloud.check_wavelength(index)?;
        self.wavelength_index = index;
        self.refresh_stats()
    }

    /// Label of the active wavelength, e.g. `"550 nm"`, for spectral data.
    #[must_use]
    pub fn wavelength_label(&self) -> Option<String> {
        let metadata = self.cloud.metadata();
        if !metadata.is_spectral() {
            return None;
        }
        metadata
            .wavelength_nm(self.wavelength_index)
            .map(|nm| format!("{nm:.0} nm"))
    }

    /// Current height mapping.
    #[must_use]
    pub fn height_scale(&self) -> HeightScale {
        self.height_scale
    }

    /// Switches between linear and logarithmic heights.
    pub fn set_height_scale(&mut self, scale: HeightScale) {
        self.height_scale = scale;
    }

    /// Heights of every point at the active wavelength.
    ///
    /// # Errors
    /// Never fails for a consistent dataset.
    pub fn heights(&self) -> Result<Vec<f32>> {
        Ok(heights(&self.cloud, self.wavelength_index, self.height_scale)?)
    }

    /// Applies a viewer selection gesture.
    ///
    /// An empty box is a click: the point closest to the box corner within
    /// the configured pick radius becomes the selection. Otherwise the
    /// points inside the box are combined according to `mode`. Returns the
    /// number of selected points.
    ///
    /// # Errors
    /// Never fails for a consistent dataset.
    pub fn select(
        &mut self,
        mvp: Mat4,
        selection_box: &SelectionBox,
        canvas: Vec2,
        mode: SelectionMode,
        config: &SelectionConfig,
    ) -> Result<usize> {
        let heights = self.heights()?;
        let projector = ScreenProjector::new(mvp, canvas);
        if selection_box.is_empty() {
            select_closest_point(
                &mut self.cloud,
                &heights,
                &projector,
                selection_box.top_left,
                config.pick_radius_px,
            )?;
        } else {
            select_points(&mut self.cloud, &heights, &projector, selection_box, mode)?;
        }
        self.refresh_stats()?;
        Ok(self.cloud.selected_count())
    }

    /// Selects every point.
    ///
    /// # Errors
    /// Never fails for a consistent dataset.
    pub fn select_all(&mut self) -> Result<()> {
        selection::select_all(&mut self.cloud);
        self.refresh_stats()
    }

    /// Clears the selection.
    ///
    /// # Errors
    /// Never fails for a consistent dataset.
    pub fn deselect_all(&mut self) -> Result<()> {
        selection::deselect_all(&mut self.cloud);
        self.refresh_stats()
    }

    /// Selects the lowest or highest point at the active wavelength.
    ///
    /// # Errors
    /// Never fails for a consistent dataset.
    pub fn select_extreme_point(&mut self, extremum: Extremum) -> Result<Option<usize>> {
        let index =
            selection::select_extreme_point(&mut self.cloud, self.wavelength_index, extremum)?;
        self.refresh_stats()?;
        Ok(index)
    }

    /// Steps the selection along the acquisition path.
    ///
    /// # Errors
    /// Never fails for a consistent dataset.
    pub fn move_selection_along_path(&mut self, direction: PathDirection) -> Result<bool> {
        let moved = selection::move_selection_along_path(&mut self.cloud, direction);
        if moved {
            self.refresh_stats()?;
        }
        Ok(moved)
    }

    /// Deletes the selected points and marks the dataset dirty.
    ///
    /// # Errors
    /// Never fails for a consistent dataset.
    pub fn delete_selected_points(&mut self) -> Result<usize> {
        let removed = selection::delete_selected_points(&mut self.cloud);
        if removed > 0 {
            self.dirty = true;
            log::info!("{}: deleted {removed} points", self.name);
        }
        self.refresh_stats()?;
        Ok(removed)
    }

    /// Mean 3D position of the selection, for centring the camera.
    ///
    /// # Errors
    /// Never fails for a consistent dataset.
    pub fn selection_center(&self) -> Result<Option<Vec3>> {
        let heights = self.heights()?;
        Ok(selection::selection_center(&self.cloud, &heights)?)
    }

    /// Spectrum of the highest selected point at the active wavelength.
    ///
    /// # Errors
    /// Never fails for a consistent dataset.
    pub fn selection_spectrum(&self) -> Result<Option<Vec<f32>>> {
        Ok(selection::selection_spectrum(
            &self.cloud,
            self.wavelength_index,
        )?)
    }

    /// Writes the dataset and clears the dirty flag.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written; the flag is kept.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        DatasetWriter::save(&self.cloud, path)?;
        self.dirty = false;
        Ok(())
    }
}
