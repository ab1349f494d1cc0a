use deviation_plots::charts::RenderError;
use deviation_plots::data::LoaderError;
use deviation_plots::{PlotConfig, PlotError, Plotter};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const CHART_NAMES: [&str; 3] = [
    "mean_hist.png",
    "corners_mean_bar.png",
    "ceiling_floor_mean_scatter.png",
];

const RECORDS_JSON: &str = r#"[
    {"mean": 0.12, "gt_corners": 4, "ceiling_mean": 0.20, "floor_mean": 0.05},
    {"mean": -0.30, "gt_corners": 4, "ceiling_mean": 0.10, "floor_mean": 0.40},
    {"mean": 0.05, "gt_corners": 6, "ceiling_mean": 0.08, "floor_mean": 0.02},
    {"mean": 0.80, "gt_corners": 8, "ceiling_mean": 0.90, "floor_mean": 0.70},
    {"mean": -0.02, "gt_corners": 10, "ceiling_mean": 0.01, "floor_mean": 0.03}
]"#;

/// Fresh, empty scratch directory unique to this test binary and `name`.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "deviation_plots_{}_{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_input(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, contents).unwrap();
    path
}

fn plotter_into(dir: &Path) -> Plotter {
    Plotter::with_config(PlotConfig::default().with_save_dir(dir.join("plots")))
}

fn assert_charts_written(paths: &[PathBuf], save_dir: &Path) {
    assert_eq!(paths.len(), 3);
    for (path, name) in paths.iter().zip(CHART_NAMES) {
        assert_eq!(path, &save_dir.join(name));
        assert!(path.is_file(), "{} was not written", path.display());
    }
}

#[test]
fn test_draw_writes_every_chart_in_order() {
    let dir = scratch_dir("draw_order");
    let input = write_input(&dir, "deviations.json", RECORDS_JSON);
    let plotter = plotter_into(&dir);

    let paths = plotter.draw(&input).unwrap();
    assert_charts_written(&paths, plotter.save_dir());

    let img = image::open(&paths[0]).unwrap();
    assert_eq!((img.width(), img.height()), (800, 600));
}

#[test]
fn test_draw_twice_gives_same_names() {
    let dir = scratch_dir("draw_twice");
    let input = write_input(&dir, "deviations.json", RECORDS_JSON);
    let plotter = plotter_into(&dir);

    let first = plotter.draw(&input).unwrap();
    let second = plotter.draw(&input).unwrap();
    assert_eq!(first, second);
    assert_charts_written(&second, plotter.save_dir());
}

#[test]
fn test_output_dir_created_when_missing() {
    let dir = scratch_dir("dir_missing");
    let input = write_input(&dir, "deviations.json", RECORDS_JSON);
    let save_dir = dir.join("nested").join("plots");
    assert!(!save_dir.exists());

    let plotter = Plotter::with_config(PlotConfig::default().with_save_dir(&save_dir));
    plotter.draw(&input).unwrap();
    assert!(save_dir.is_dir());
}

#[test]
fn test_existing_output_dir_is_not_an_error() {
    let dir = scratch_dir("dir_exists");
    let input = write_input(&dir, "deviations.json", RECORDS_JSON);
    let plotter = plotter_into(&dir);
    fs::create_dir_all(plotter.save_dir()).unwrap();

    let paths = plotter.draw(&input).unwrap();
    assert_charts_written(&paths, plotter.save_dir());
}

#[test]
fn test_output_dir_blocked_by_file() {
    let dir = scratch_dir("dir_blocked");
    let input = write_input(&dir, "deviations.json", RECORDS_JSON);
    let blocker = write_input(&dir, "plots", "not a directory");

    let plotter = Plotter::with_config(PlotConfig::default().with_save_dir(&blocker));
    let err = plotter.draw(&input).unwrap_err();
    assert!(matches!(err, PlotError::Io { .. }));
}

#[test]
fn test_all_zero_means_render() {
    let dir = scratch_dir("zero_means");
    let df = df!(
        "mean" => &[0.0, 0.0, 0.0],
        "gt_corners" => &[4i64, 4, 5],
        "ceiling_mean" => &[0.0, 0.0, 0.0],
        "floor_mean" => &[0.0, 0.0, 0.0]
    )
    .unwrap();
    let plotter = plotter_into(&dir);

    let paths = plotter.draw_frame(&df).unwrap();
    assert_charts_written(&paths, plotter.save_dir());
}

#[test]
fn test_empty_table_renders_blank_charts() {
    let dir = scratch_dir("empty_frame");
    let df = df!(
        "mean" => Vec::<f64>::new(),
        "gt_corners" => Vec::<i64>::new(),
        "ceiling_mean" => Vec::<f64>::new(),
        "floor_mean" => Vec::<f64>::new()
    )
    .unwrap();
    let plotter = plotter_into(&dir);

    let paths = plotter.draw_frame(&df).unwrap();
    assert_charts_written(&paths, plotter.save_dir());
}

#[test]
fn test_empty_json_file_renders_blank_charts() {
    let dir = scratch_dir("empty_json");
    let input = write_input(&dir, "deviations.json", "[]");
    let plotter = plotter_into(&dir);

    let paths = plotter.draw(&input).unwrap();
    assert_charts_written(&paths, plotter.save_dir());
}

#[test]
fn test_negative_group_means_render() {
    let dir = scratch_dir("negative_bars");
    let df = df!(
        "mean" => &[-0.4, -0.2, 0.3],
        "gt_corners" => &[3i64, 3, 4],
        "ceiling_mean" => &[0.1, 0.2, 0.3],
        "floor_mean" => &[0.3, 0.2, 0.1]
    )
    .unwrap();
    let plotter = plotter_into(&dir);

    let paths = plotter.draw_frame(&df).unwrap();
    assert_charts_written(&paths, plotter.save_dir());
}

#[test]
fn test_non_finite_values_render() {
    let dir = scratch_dir("non_finite");
    let df = df!(
        "mean" => &[0.1, f64::NAN, f64::INFINITY, -0.2],
        "gt_corners" => &[3i64, 3, 4, 4],
        "ceiling_mean" => &[0.5, f64::NAN, 0.2, f64::INFINITY],
        "floor_mean" => &[0.1, 0.3, f64::NEG_INFINITY, 0.4]
    )
    .unwrap();
    let plotter = plotter_into(&dir);

    let paths = plotter.draw_frame(&df).unwrap();
    assert_charts_written(&paths, plotter.save_dir());
}

#[test]
fn test_extreme_means_are_an_axis_error() {
    let dir = scratch_dir("extreme_means");
    let df = df!(
        "mean" => &[-1.7e308, 1.7e308],
        "gt_corners" => &[3i64, 4],
        "ceiling_mean" => &[0.1, 0.2],
        "floor_mean" => &[0.2, 0.1]
    )
    .unwrap();
    let plotter = plotter_into(&dir);

    let err = plotter.draw_frame(&df).unwrap_err();
    match err {
        PlotError::Render { file_name, source } => {
            assert_eq!(file_name, "mean_hist.png");
            assert!(matches!(source, RenderError::AxisRange { axis: "x", .. }));
        }
        other => panic!("expected render error, got {other:?}"),
    }
}

#[test]
fn test_extreme_scatter_bounds_are_an_axis_error() {
    let dir = scratch_dir("extreme_scatter");
    let df = df!(
        "mean" => &[0.1, 0.2],
        "gt_corners" => &[3i64, 4],
        "ceiling_mean" => &[1.7e308, -1.7e308],
        "floor_mean" => &[0.2, 0.1]
    )
    .unwrap();
    let plotter = plotter_into(&dir);

    let err = plotter.draw_frame(&df).unwrap_err();
    match err {
        PlotError::Render { file_name, source } => {
            assert_eq!(file_name, "ceiling_floor_mean_scatter.png");
            assert!(matches!(source, RenderError::AxisRange { axis: "y", .. }));
        }
        other => panic!("expected render error, got {other:?}"),
    }
}

#[test]
fn test_custom_image_size() {
    let dir = scratch_dir("custom_size");
    let input = write_input(&dir, "deviations.json", RECORDS_JSON);
    let plotter = Plotter::with_config(
        PlotConfig::default()
            .with_save_dir(dir.join("plots"))
            .with_size(640, 480)
            .with_histogram_bins(20),
    );

    let paths = plotter.draw(&input).unwrap();
    for path in &paths {
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), (640, 480));
    }
}

#[test]
fn test_missing_file_is_load_error() {
    let dir = scratch_dir("missing_file");
    let plotter = plotter_into(&dir);

    let err = plotter.draw(dir.join("nope.json")).unwrap_err();
    assert!(matches!(err, PlotError::Load(LoaderError::NotFound(_))));
    assert!(!plotter.save_dir().exists());
}

#[test]
fn test_missing_column_is_load_error() {
    let dir = scratch_dir("missing_column");
    let input = write_input(
        &dir,
        "deviations.json",
        r#"[{"mean": 0.1, "gt_corners": 4, "floor_mean": 0.0}]"#,
    );
    let plotter = plotter_into(&dir);

    let err = plotter.draw(&input).unwrap_err();
    assert!(matches!(
        err,
        PlotError::Load(LoaderError::MissingColumn(ref name)) if name == "ceiling_mean"
    ));
}

#[test]
fn test_malformed_json_is_load_error() {
    let dir = scratch_dir("malformed_json");
    let input = write_input(&dir, "deviations.json", "[{\"mean\": 0.1,");
    let plotter = plotter_into(&dir);

    let err = plotter.draw(&input).unwrap_err();
    assert!(matches!(err, PlotError::Load(LoaderError::Json(_))));
}
