#![allow(clippy::uninlined_format_args)]
use approx::assert_abs_diff_eq;
use bsdfview_algorithms::{compute_stats, Subset};
use bsdfview_io::{load_bytes, load_file, Dataset, DatasetWriter, Error};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_duplicate_is_skipped_and_stats_ignore_it() {
    let file = write_temp("# spectral: 0\n0 0 1.0\n10 0 2.0\n10 0 3.0\n");
    let (cloud, report) = load_file(file.path()).unwrap();

    assert_eq!(cloud.len(), 2);
    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.duplicates[0].line, 4);
    assert_abs_diff_eq!(report.duplicates[0].theta, 10.0);

    let stats = compute_stats(&cloud, Subset::All, 0).unwrap();
    assert_abs_diff_eq!(stats.current.min_intensity, 1.0);
    assert_abs_diff_eq!(stats.current.max_intensity, 2.0);
    assert_abs_diff_eq!(stats.current.average_intensity, 1.5);
}

#[test]
fn test_file_order_and_projection() {
    let (cloud, _) = load_bytes(b"90 0 1\n0 0 2\n45 90 3\n").unwrap();
    assert_abs_diff_eq!(cloud.theta(0), 90.0);
    assert_abs_diff_eq!(cloud.theta(1), 0.0);
    assert_abs_diff_eq!(cloud.phi(2), 90.0);

    let [x, y] = cloud.projected_point(0);
    assert_abs_diff_eq!(x, 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(y, 0.0, epsilon = 1e-6);
    let [x, y] = cloud.projected_point(2);
    assert_abs_diff_eq!(x, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(y, 0.5, epsilon = 1e-6);
    assert!(cloud.selection().iter().all(|&s| !s));
}

#[test]
fn test_spectral_count_inferred_from_first_line() {
    let (cloud, _) = load_bytes(b"#spectral: yes\n0 0 1 2 3 4\n10 0 5 6 7 8\n").unwrap();
    assert!(cloud.metadata().is_spectral());
    assert_eq!(cloud.metadata().data_points_per_loop(), 4);
    assert_eq!(cloud.intensity_count(), 4);
    assert_abs_diff_eq!(cloud.intensity(1, 3), 8.0);
}

#[test]
fn test_spectral_count_from_header() {
    let text = b"#DATA_POINTS_PER_LOOP 2\n0 0 1 2\n10 0 3 4\n";
    let (cloud, _) = load_bytes(text).unwrap();
    assert!(cloud.metadata().is_spectral());
    assert_eq!(cloud.sample_width(), 4);
}

#[test]
fn test_malformed_line_numbers() {
    let cases: [(&[u8], usize); 5] = [
        (b"#spectral 0\n\n0 0 1\n0 1\n", 4),
        (b"0 0 1\n1 0 1 2\n", 2),
        (b"0 0 1\n1 0 abc\n", 2),
        (b"#c\n0 0 inf\n", 2),
        (b"#spectral 1\n#data_points_per_loop 3\n0 0 1 2\n", 3),
    ];
    for (text, expected_line) in cases {
        match load_bytes(text) {
            Err(Error::MalformedLine { line, .. }) => {
                assert_eq!(line, expected_line, "{:?}", String::from_utf8_lossy(text));
            }
            other => panic!("expected malformed line, got {:?}", other.map(|(c, _)| c.len())),
        }
    }
}

#[test]
fn test_spectral_line_too_short_to_infer() {
    assert!(matches!(
        load_bytes(b"#spectral 1\n0 0\n"),
        Err(Error::MalformedLine { line: 2, .. })
    ));
}

#[test]
fn test_missing_data() {
    for text in [&b""[..], b"\n\n", b"#sample_name x\n#spectral 0\n"] {
        assert!(matches!(load_bytes(text), Err(Error::MissingData)));
    }
}

#[test]
fn test_only_duplicates_of_one_point() {
    let (cloud, report) = load_bytes(b"5 5 1\n5 5 2\n5 5 3\n").unwrap();
    assert_eq!(cloud.len(), 1);
    assert_abs_diff_eq!(cloud.intensity(0, 0), 1.0);
    assert_eq!(report.duplicates.len(), 2);
    assert_eq!(cloud.metadata().points_in_file(), 1);
}

#[test]
fn test_save_then_load_round_trip() {
    let source = "#sample_name \"white paint\"\n#spectral 1\n#data_points_per_loop 2\n\
                  0 0 0.125 0.5\n30 45 1.75 2\n60 180 3 4.25\n";
    let mut dataset = Dataset::from_bytes("white_paint", source.as_bytes()).unwrap();
    dataset.select_all().unwrap();
    let out = NamedTempFile::new().unwrap();
    dataset.save(out.path()).unwrap();

    let (reloaded, report) = load_file(out.path()).unwrap();
    assert!(report.is_clean());
    assert_eq!(reloaded.metadata().raw_lines(), dataset.cloud().metadata().raw_lines());
    assert_eq!(reloaded.samples(), dataset.cloud().samples());
    assert_eq!(reloaded.metadata().sample_name(), Some("white paint"));
    // selection is not persisted
    assert!(!reloaded.has_selection());
}

#[test]
fn test_latin1_header_survives_save() {
    let source = b"#sample_name \"caf\xe9\"\n#note 45\xb0\n0 0 1\n10 0 2\n";
    let mut dataset = Dataset::from_bytes("cafe", source).unwrap();
    let out = NamedTempFile::new().unwrap();
    dataset.save(out.path()).unwrap();

    let written = std::fs::read(out.path()).unwrap();
    assert!(written.starts_with(b"#sample_name \"caf\xe9\"\n#note 45\xb0\n"));
    let (reloaded, _) = load_file(out.path()).unwrap();
    assert_eq!(reloaded.metadata().raw_bytes(), dataset.cloud().metadata().raw_bytes());
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn test_delete_then_save() {
    let file = write_temp("0 0 1\n10 0 5\n20 0 2\n");
    let mut dataset = Dataset::open(file.path()).unwrap();
    dataset
        .select_extreme_point(bsdfview_algorithms::Extremum::Highest)
        .unwrap();
    assert_eq!(dataset.delete_selected_points().unwrap(), 1);
    assert!(dataset.is_dirty());

    let out = NamedTempFile::new().unwrap();
    dataset.save(out.path()).unwrap();
    assert!(!dataset.is_dirty());

    let text = std::fs::read_to_string(out.path()).unwrap();
    assert_eq!(text, "0.000000 0.000000 1.000000\n20.000000 0.000000 2.000000\n");
}

#[test]
fn test_writer_into_memory() {
    let (cloud, _) = load_bytes(b"#intheta 30\n#inphi 0\n1.5 2.5 3.5\n").unwrap();
    assert_eq!(cloud.metadata().incident_angle(), Some((30.0, 0.0)));
    let bytes = DatasetWriter::write_to(&cloud, Vec::new()).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "#intheta 30\n#inphi 0\n1.500000 2.500000 3.500000\n"
    );
}

#[test]
fn test_dataset_name_from_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blue_metal_paint.txt");
    std::fs::write(&path, "0 0 1\n").unwrap();
    let dataset = Dataset::open(&path).unwrap();
    assert_eq!(dataset.name(), "blue_metal_paint");
    assert_eq!(dataset.display_name(), "blue metal paint");
}
