use flate2::Compression;
use flate2::write::GzEncoder;
use olex2gpx::error::ConvertError;
use olex2gpx::gpx_types::{OutputMode, Waypoint};
use olex2gpx::map::{LeafletMap, MapRenderer, NoMap};
use olex2gpx::options::{ConvertOptions, GpxWriteOptions};
use olex2gpx::parser::parse_gpx;
use olex2gpx::pipeline::{convert_bytes, convert_file, waypoints_from_bytes};
use olex2gpx::record::{parse_records, parse_records_with_report};
use olex2gpx::writer::to_gpx_string;
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

fn load_fixture(path: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{path}")).unwrap()
}

fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

/// Gzip a fixture into `dir` and return the path of the `.gz` file.
fn gz_fixture(dir: &Path, fixture: &str) -> PathBuf {
    let path = dir.join("Ruter.gz");
    std::fs::write(&path, gzip(&load_fixture(fixture))).unwrap();
    path
}

/// Records every call instead of writing a map.
#[derive(Default)]
struct RecordingMap {
    calls: RefCell<Vec<(Vec<Waypoint>, PathBuf)>>,
}

impl MapRenderer for RecordingMap {
    fn render(&self, waypoints: &[Waypoint], path: &Path) -> io::Result<Option<PathBuf>> {
        self.calls
            .borrow_mut()
            .push((waypoints.to_vec(), path.to_path_buf()));
        Ok(Some(path.to_path_buf()))
    }
}

// ---- record parsing ----

#[test]
fn test_buoy_scenario() {
    let waypoints = parse_records(["540.0 -120.0 1700000000 Buoy1"]);
    assert_eq!(
        waypoints,
        vec![Waypoint::new(9.0, -2.0, "2023-11-14T22:13:20Z", "Buoy1")]
    );
}

#[test]
fn test_mixed_scenario() {
    let parsed = parse_records_with_report([
        "540.0 -120.0 1700000000 Buoy1",
        "bad line",
        "60.0 60.0 notanumber Mark",
    ]);
    assert_eq!(parsed.waypoints.len(), 1);
    assert_eq!(parsed.waypoints[0].name, "Buoy1");
    // Only the bad timestamp is reported; the short line is dropped silently.
    assert_eq!(parsed.rejected.len(), 1);
    assert_eq!(parsed.rejected[0].line, "60.0 60.0 notanumber Mark");
}

#[test]
fn test_mixed_fixture() {
    let parsed = parse_records_with_report(load_fixture("edge_cases/03_mixed.txt").lines());

    let names: Vec<&str> = parsed.waypoints.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["SouthWest", "Tabbed", "NearZero"]);

    let sw = &parsed.waypoints[0];
    assert_eq!(sw.lat, -2040.0 / 60.0);
    assert_eq!(sw.lon, -3780.0 / 60.0);
    assert_eq!(parsed.waypoints[2].lat, -0.01);

    let rejected: Vec<usize> = parsed.rejected.iter().map(|r| r.line_number).collect();
    assert_eq!(rejected, vec![6, 7]);
}

// ---- encoding ----

#[test]
fn test_route_and_list_shapes() {
    let waypoints = parse_records(load_fixture("basic/02_route.txt").lines());
    assert_eq!(waypoints.len(), 4);

    let route = to_gpx_string(&waypoints, &GpxWriteOptions::new(OutputMode::Route)).unwrap();
    assert_eq!(route.matches("<rte>").count(), 1);
    assert_eq!(route.matches("<rtept ").count(), 4);
    assert!(!route.contains("<wpt"));

    let list = to_gpx_string(&waypoints, &GpxWriteOptions::new(OutputMode::Waypoints)).unwrap();
    assert_eq!(list.matches("<wpt ").count(), 4);
    assert!(!list.contains("<rte"));
}

#[test]
fn test_round_trip_both_modes() {
    let mut waypoints = parse_records(load_fixture("basic/02_route.txt").lines());
    waypoints.extend(parse_records(load_fixture("edge_cases/03_mixed.txt").lines()));
    waypoints.push(Waypoint::new(1.0, 2.0, "1970-01-01T00:00:00Z", "A&B<C>"));

    let route = to_gpx_string(&waypoints, &GpxWriteOptions::new(OutputMode::Route)).unwrap();
    let data = parse_gpx(&route).unwrap();
    assert_eq!(data.creator.as_deref(), Some("OlexConverter"));
    assert!(data.waypoints.is_empty());
    assert_eq!(data.routes, vec![waypoints.clone()]);

    let list = to_gpx_string(
        &waypoints,
        &GpxWriteOptions::new(OutputMode::Waypoints).compact(),
    )
    .unwrap();
    let data = parse_gpx(&list).unwrap();
    assert!(data.routes.is_empty());
    assert_eq!(data.waypoints, waypoints);
}

// ---- pipeline ----

#[test]
fn test_convert_file_route_with_map() {
    let dir = tempfile::tempdir().unwrap();
    let input = gz_fixture(dir.path(), "basic/02_route.txt");
    let output = dir.path().join("out.gpx");
    let opts = ConvertOptions {
        mode: OutputMode::Route,
        ..Default::default()
    };
    let map = LeafletMap {
        zoom: opts.zoom,
        mode: opts.mode,
    };

    let summary = convert_file(&input, &output, &opts, &map).unwrap();
    assert_eq!(summary.waypoint_count, 4);
    assert_eq!(summary.gpx_path, output);
    assert_eq!(summary.map_path, Some(dir.path().join("map.html")));

    let data = parse_gpx(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(data.routes.len(), 1);
    assert_eq!(data.routes[0].len(), 4);

    let html = std::fs::read_to_string(dir.path().join("map.html")).unwrap();
    assert!(html.contains("setView([59.07,10.275], 10)"));
    assert!(summary.to_string().starts_with("4 waypoints extracted."));
}

#[test]
fn test_renderer_receives_waypoints() {
    let dir = tempfile::tempdir().unwrap();
    let input = gz_fixture(dir.path(), "basic/01_single_buoy.txt");
    let output = dir.path().join("buoy.gpx");
    let recorder = RecordingMap::default();

    convert_file(&input, &output, &ConvertOptions::default(), &recorder).unwrap();

    let calls = recorder.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0[0].name, "Buoy1");
    assert_eq!(calls[0].1, dir.path().join("map.html"));
}

#[test]
fn test_map_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let input = gz_fixture(dir.path(), "basic/01_single_buoy.txt");
    let output = dir.path().join("buoy.gpx");
    let recorder = RecordingMap::default();
    let opts = ConvertOptions {
        map: false,
        ..Default::default()
    };

    let summary = convert_file(&input, &output, &opts, &recorder).unwrap();
    assert!(summary.map_path.is_none());
    assert!(recorder.calls.borrow().is_empty());
    assert!(output.exists());
}

#[test]
fn test_no_records_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = gz_fixture(dir.path(), "edge_cases/04_no_records.txt");
    let output = dir.path().join("out.gpx");

    let err = convert_file(&input, &output, &ConvertOptions::default(), &LeafletMap::default())
        .unwrap_err();
    assert!(matches!(err, ConvertError::NoWaypoints));
    assert!(!output.exists());
    assert!(!dir.path().join("map.html").exists());
}

#[test]
fn test_missing_input_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gpx");

    let err = convert_file(
        &dir.path().join("missing.gz"),
        &output,
        &ConvertOptions::default(),
        &NoMap,
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::Read(_)));
    assert!(!output.exists());
}

#[test]
fn test_corrupt_archive_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plain.gz");
    std::fs::write(&input, load_fixture("basic/01_single_buoy.txt")).unwrap();
    let output = dir.path().join("out.gpx");

    let err = convert_file(&input, &output, &ConvertOptions::default(), &NoMap).unwrap_err();
    assert!(matches!(err, ConvertError::Read(_)));
    assert!(!output.exists());
}

#[test]
fn test_unwritable_output_is_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = gz_fixture(dir.path(), "basic/01_single_buoy.txt");
    let output = dir.path().join("no_such_dir").join("out.gpx");

    let err = convert_file(&input, &output, &ConvertOptions::default(), &NoMap).unwrap_err();
    assert!(matches!(err, ConvertError::Write(_)));
}

#[test]
fn test_convert_bytes() {
    let data = gzip(&load_fixture("basic/01_single_buoy.txt"));
    let opts = ConvertOptions {
        mode: OutputMode::Route,
        indent: false,
        ..Default::default()
    };
    let xml = convert_bytes(&data, &opts).unwrap();
    assert!(xml.contains(
        r#"<rte><rtept lat="9.0" lon="-2.0"><time>2023-11-14T22:13:20Z</time><name>Buoy1</name></rtept></rte>"#
    ));

    let empty = gzip(&load_fixture("edge_cases/04_no_records.txt"));
    assert!(matches!(
        convert_bytes(&empty, &opts),
        Err(ConvertError::NoWaypoints)
    ));
}

#[test]
fn test_multi_member_and_cr_only_sources() {
    let mut data = gzip("540.0 -120.0 1700000000 Buoy1\r600.0 -60.0 1700000060 Buoy2\r");
    data.extend(gzip("-60.0 -60.0 1700000120 Buoy3\n"));

    let names: Vec<String> = waypoints_from_bytes(&data)
        .unwrap()
        .into_iter()
        .map(|w| w.name)
        .collect();
    assert_eq!(names, vec!["Buoy1", "Buoy2", "Buoy3"]);

    data.extend_from_slice(b"garbage");
    assert!(matches!(
        waypoints_from_bytes(&data),
        Err(ConvertError::Read(_))
    ));
}
