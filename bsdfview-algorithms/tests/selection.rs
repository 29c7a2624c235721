#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]
use bsdfview_algorithms::{
    compute_stats, delete_selected_points, deselect_all, heights, move_selection_along_path,
    select_all, select_closest_point, select_extreme_point, select_points, selection_center,
    selection_spectrum, Extremum, HeightScale, PathDirection, PointCloud, ScreenProjector,
    SelectionBox, SelectionMode, Subset,
};
use bsdfview_core::Metadata;
use glam::{Mat4, Vec2, Vec4};
use ndarray::Array2;

const CANVAS: f32 = 200.0;

/// Top-down orthographic camera: disk x -> screen x, disk y -> screen up.
fn top_down() -> ScreenProjector {
    let mvp = Mat4::from_cols(Vec4::X, Vec4::Z, Vec4::Y, Vec4::W);
    ScreenProjector::new(mvp, Vec2::splat(CANVAS))
}

/// Five points along phi = 0 at theta = 0, 18, 36, 54, 72 degrees, which
/// land at screen x = 100, 120, 140, 160, 180 and y = 100.
fn row_cloud(intensities: &[f32]) -> PointCloud {
    let n = intensities.len();
    let mut samples = Array2::zeros((3, n));
    for (i, &intensity) in intensities.iter().enumerate() {
        samples[[0, i]] = 18.0 * i as f32;
        samples[[1, i]] = 0.0;
        samples[[2, i]] = intensity;
    }
    PointCloud::new(Metadata::new(), samples).unwrap()
}

fn flat_heights(cloud: &PointCloud) -> Vec<f32> {
    vec![0.0; cloud.len()]
}

fn selected(cloud: &PointCloud) -> Vec<usize> {
    cloud.selected_indices().collect()
}

fn assert_aligned(cloud: &PointCloud) {
    assert_eq!(cloud.selection().len(), cloud.samples().ncols());
    assert_eq!(cloud.projected().ncols(), cloud.samples().ncols());
    assert!(cloud.is_aligned());
}

#[test]
fn test_pick_closest_point() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let h = flat_heights(&cloud);
    cloud.selection_mut()[0] = true;

    let picked =
        select_closest_point(&mut cloud, &h, &top_down(), Vec2::new(143.0, 102.0), 10.0).unwrap();
    assert_eq!(picked, Some(2));
    assert_eq!(selected(&cloud), vec![2]);
    assert_aligned(&cloud);
}

#[test]
fn test_pick_outside_threshold_keeps_selection() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0]);
    let h = flat_heights(&cloud);
    cloud.selection_mut()[1] = true;

    let picked =
        select_closest_point(&mut cloud, &h, &top_down(), Vec2::new(100.0, 150.0), 10.0).unwrap();
    assert_eq!(picked, None);
    assert_eq!(selected(&cloud), vec![1]);
}

#[test]
fn test_pick_tie_prefers_lowest_index() {
    let mut cloud = row_cloud(&[1.0, 2.0]);
    let h = flat_heights(&cloud);
    // halfway between x = 100 and x = 120
    let picked =
        select_closest_point(&mut cloud, &h, &top_down(), Vec2::new(110.0, 100.0), 15.0).unwrap();
    assert_eq!(picked, Some(0));
}

#[test]
fn test_pick_ignores_points_behind_camera() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0]);
    let h = flat_heights(&cloud);
    // w = 10x - 1: point 0 (x = 0) is behind the camera and would
    // otherwise land exactly under the cursor
    let mvp = Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 10.0),
        Vec4::Z,
        Vec4::Y,
        Vec4::new(0.0, 0.0, 0.0, -1.0),
    );
    let projector = ScreenProjector::new(mvp, Vec2::splat(CANVAS));
    let picked = select_closest_point(&mut cloud, &h, &projector, Vec2::new(100.0, 100.0), 1e6)
        .unwrap();
    // point 1 lands at x = 120, point 2 at x = 113.3
    assert_eq!(picked, Some(2));
}

#[test]
fn test_pick_rejects_wrong_heights() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0]);
    let result = select_closest_point(&mut cloud, &[0.0], &top_down(), Vec2::ZERO, 10.0);
    assert!(result.is_err());
    assert_aligned(&cloud);
}

#[test]
fn test_box_selection_modes() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let h = flat_heights(&cloud);
    let projector = top_down();
    let first_three = SelectionBox::from_corners(Vec2::new(95.0, 90.0), Vec2::new(145.0, 110.0));
    let last_three = SelectionBox::from_corners(Vec2::new(135.0, 90.0), Vec2::new(185.0, 110.0));

    let n = select_points(&mut cloud, &h, &projector, &first_three, SelectionMode::Replace)
        .unwrap();
    assert_eq!(n, 3);
    assert_eq!(selected(&cloud), vec![0, 1, 2]);

    select_points(&mut cloud, &h, &projector, &last_three, SelectionMode::Intersect).unwrap();
    assert_eq!(selected(&cloud), vec![2]);

    select_points(&mut cloud, &h, &projector, &last_three, SelectionMode::Add).unwrap();
    assert_eq!(selected(&cloud), vec![2, 3, 4]);

    select_points(&mut cloud, &h, &projector, &first_three, SelectionMode::Subtract).unwrap();
    assert_eq!(selected(&cloud), vec![3, 4]);

    select_points(&mut cloud, &h, &projector, &last_three, SelectionMode::Replace).unwrap();
    assert_eq!(selected(&cloud), vec![2, 3, 4]);
    assert_aligned(&cloud);
}

#[test]
fn test_empty_box() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0]);
    let h = flat_heights(&cloud);
    let projector = top_down();
    let empty = SelectionBox::at(Vec2::new(100.0, 100.0));

    select_all(&mut cloud);
    select_points(&mut cloud, &h, &projector, &empty, SelectionMode::Add).unwrap();
    assert_eq!(cloud.selected_count(), 3);
    select_points(&mut cloud, &h, &projector, &empty, SelectionMode::Subtract).unwrap();
    assert_eq!(cloud.selected_count(), 3);

    let n = select_points(&mut cloud, &h, &projector, &empty, SelectionMode::Replace).unwrap();
    assert_eq!(n, 0);

    select_all(&mut cloud);
    select_points(&mut cloud, &h, &projector, &empty, SelectionMode::Intersect).unwrap();
    assert_eq!(cloud.selected_count(), 0);
}

#[test]
fn test_box_uses_heights() {
    let mut cloud = row_cloud(&[0.0, 10.0]);
    let h = heights(&cloud, 0, HeightScale::Linear).unwrap();
    // height -> screen up, disk x -> screen x
    let mvp = Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::W);
    let projector = ScreenProjector::new(mvp, Vec2::splat(CANVAS));
    // point 1 is at height 1.0 -> screen y = 0
    let top_strip = SelectionBox::from_corners(Vec2::new(0.0, 0.0), Vec2::new(200.0, 5.0));
    select_points(&mut cloud, &h, &projector, &top_strip, SelectionMode::Replace).unwrap();
    assert_eq!(selected(&cloud), vec![1]);
}

#[test]
fn test_select_all_then_deselect_all() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0]);
    select_all(&mut cloud);
    assert_eq!(cloud.selected_count(), 3);
    deselect_all(&mut cloud);
    assert_eq!(cloud.selected_count(), 0);
    assert_aligned(&cloud);
}

#[test]
fn test_extreme_point_over_all_points() {
    let mut cloud = row_cloud(&[3.0, 9.0, 1.0, 9.0, 4.0]);
    assert_eq!(
        select_extreme_point(&mut cloud, 0, Extremum::Highest).unwrap(),
        Some(1)
    );
    assert_eq!(selected(&cloud), vec![1]);

    // selection of a single point: the extremum is that point
    assert_eq!(
        select_extreme_point(&mut cloud, 0, Extremum::Lowest).unwrap(),
        Some(1)
    );

    deselect_all(&mut cloud);
    assert_eq!(
        select_extreme_point(&mut cloud, 0, Extremum::Lowest).unwrap(),
        Some(2)
    );
}

#[test]
fn test_extreme_point_within_selection() {
    let mut cloud = row_cloud(&[3.0, 9.0, 1.0, 8.0, 4.0]);
    cloud.selection_mut()[3] = true;
    cloud.selection_mut()[4] = true;
    assert_eq!(
        select_extreme_point(&mut cloud, 0, Extremum::Highest).unwrap(),
        Some(3)
    );
    assert_eq!(selected(&cloud), vec![3]);
}

#[test]
fn test_extreme_point_is_deterministic() {
    let intensities = [2.0, 7.0, 5.0, 1.0];
    for prior in 0..4 {
        let mut cloud = row_cloud(&intensities);
        cloud.selection_mut()[prior] = true;
        deselect_all(&mut cloud);
        assert_eq!(
            select_extreme_point(&mut cloud, 0, Extremum::Highest).unwrap(),
            Some(1)
        );
    }
}

#[test]
fn test_extreme_point_empty_cloud() {
    let mut cloud = row_cloud(&[]);
    assert_eq!(
        select_extreme_point(&mut cloud, 0, Extremum::Highest).unwrap(),
        None
    );
    assert!(select_extreme_point(&mut cloud, 1, Extremum::Highest).is_err());
}

#[test]
fn test_path_navigation() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0, 4.0]);
    cloud.selection_mut()[1] = true;

    assert!(move_selection_along_path(&mut cloud, PathDirection::Forward));
    assert_eq!(selected(&cloud), vec![2]);
    assert!(move_selection_along_path(&mut cloud, PathDirection::Forward));
    assert_eq!(selected(&cloud), vec![3]);

    // clamped at the last index
    assert!(!move_selection_along_path(&mut cloud, PathDirection::Forward));
    assert_eq!(selected(&cloud), vec![3]);

    for _ in 0..3 {
        assert!(move_selection_along_path(&mut cloud, PathDirection::Backward));
    }
    assert_eq!(selected(&cloud), vec![0]);

    // clamped at index 0, no wraparound
    assert!(!move_selection_along_path(&mut cloud, PathDirection::Backward));
    assert_eq!(selected(&cloud), vec![0]);
}

#[test]
fn test_path_navigation_moves_every_selected_point() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    cloud.selection_mut()[1] = true;
    cloud.selection_mut()[3] = true;
    assert!(move_selection_along_path(&mut cloud, PathDirection::Backward));
    assert_eq!(selected(&cloud), vec![0, 2]);
    assert!(!move_selection_along_path(&mut cloud, PathDirection::Backward));
    assert_eq!(selected(&cloud), vec![0, 2]);
}

#[test]
fn test_path_navigation_without_selection() {
    let mut cloud = row_cloud(&[1.0, 2.0]);
    assert!(!move_selection_along_path(&mut cloud, PathDirection::Forward));
    let mut empty = row_cloud(&[]);
    assert!(!move_selection_along_path(&mut empty, PathDirection::Backward));
}

#[test]
fn test_delete_selected_points() {
    let mut cloud = row_cloud(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let before_projected: Vec<[f32; 2]> = (0..5).map(|i| cloud.projected_point(i)).collect();
    cloud.selection_mut()[0] = true;
    cloud.selection_mut()[2] = true;

    assert_eq!(delete_selected_points(&mut cloud), 2);
    assert_eq!(cloud.len(), 3);
    assert_aligned(&cloud);

    // survivors 1, 3, 4 keep their own intensity and projection
    for (new, old) in [(0, 1), (1, 3), (2, 4)] {
        assert!((cloud.intensity(new, 0) - (old as f32 + 1.0)).abs() < f32::EPSILON);
        assert_eq!(cloud.projected_point(new), before_projected[old]);
    }

    let stats = compute_stats(&cloud, Subset::All, 0).unwrap();
    assert_eq!(stats.points_count, 3);
    assert!((stats.current.average_intensity - 11.0 / 3.0).abs() < 1e-6);
}

#[test]
fn test_delete_without_selection_is_noop() {
    let mut cloud = row_cloud(&[1.0, 2.0]);
    assert_eq!(delete_selected_points(&mut cloud), 0);
    assert_eq!(cloud.len(), 2);
}

#[test]
fn test_selection_center_and_spectrum() {
    let mut cloud = row_cloud(&[1.0, 6.0, 3.0]);
    let h = flat_heights(&cloud);
    assert_eq!(selection_center(&cloud, &h).unwrap(), None);
    assert_eq!(selection_spectrum(&cloud, 0).unwrap(), None);

    cloud.selection_mut()[0] = true;
    cloud.selection_mut()[2] = true;
    let centre = selection_center(&cloud, &h).unwrap().unwrap();
    // disk x of theta 0 and 36 degrees: 0.0 and 0.4
    assert!((centre.x - 0.2).abs() < 1e-6);
    assert!(centre.z.abs() < 1e-6);

    assert_eq!(selection_spectrum(&cloud, 0).unwrap(), Some(vec![3.0]));
}
