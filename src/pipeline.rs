use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::gpx_types::Waypoint;
use crate::map::{MapRenderer, map_path};
use crate::options::ConvertOptions;
use crate::record::parse_records;
use crate::source;
use crate::writer::{to_gpx_string, write_gpx};

/// Outcome of a successful file conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub waypoint_count: usize,
    pub gpx_path: PathBuf,
    /// `None` when no map was rendered.
    pub map_path: Option<PathBuf>,
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} waypoints extracted.", self.waypoint_count)?;
        write!(f, "GPX file saved to: {}", self.gpx_path.display())?;
        if let Some(map) = &self.map_path {
            write!(f, "\nMap generated at: {}", map.display())?;
        }
        Ok(())
    }
}

/// Convert a gzip Olex file to GPX and hand the waypoints to `renderer`.
///
/// Nothing is written when the source cannot be read or holds no valid
/// record.
pub fn convert_file(
    input: &Path,
    output: &Path,
    opts: &ConvertOptions,
    renderer: &dyn MapRenderer,
) -> Result<ConversionSummary, ConvertError> {
    let lines = source::read_lines(input)?;
    let waypoints = non_empty(parse_records(&lines))?;

    save_gpx(&waypoints, output, opts)?;
    tracing::info!(
        path = %output.display(),
        waypoints = waypoints.len(),
        mode = ?opts.mode,
        "wrote GPX"
    );

    let rendered = if opts.map {
        renderer
            .render(&waypoints, &map_path(output, &opts.map_file_name))
            .map_err(ConvertError::Map)?
    } else {
        None
    };

    Ok(ConversionSummary {
        waypoint_count: waypoints.len(),
        gpx_path: output.to_path_buf(),
        map_path: rendered,
    })
}

/// Convert an in-memory gzip Olex buffer into a GPX document.
pub fn convert_bytes(data: &[u8], opts: &ConvertOptions) -> Result<String, ConvertError> {
    let waypoints = waypoints_from_bytes(data)?;
    to_gpx_string(&waypoints, &opts.gpx())
}

/// Decompress and parse an in-memory gzip Olex buffer.
pub fn waypoints_from_bytes(data: &[u8]) -> Result<Vec<Waypoint>, ConvertError> {
    let lines = source::lines_from_bytes(data)?;
    non_empty(parse_records(&lines))
}

/// Default GPX output for an input: same location, `.gpx` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("gpx")
}

fn non_empty(waypoints: Vec<Waypoint>) -> Result<Vec<Waypoint>, ConvertError> {
    if waypoints.is_empty() {
        return Err(ConvertError::NoWaypoints);
    }
    Ok(waypoints)
}

/// Write the GPX file; a half-written file is removed on failure.
fn save_gpx(waypoints: &[Waypoint], output: &Path, opts: &ConvertOptions) -> Result<(), ConvertError> {
    let file = File::create(output).map_err(ConvertError::Write)?;
    let result = write_and_flush(file, waypoints, opts);
    if result.is_err() {
        let _ = fs::remove_file(output);
    }
    result.map_err(ConvertError::Write)
}

fn write_and_flush(file: File, waypoints: &[Waypoint], opts: &ConvertOptions) -> io::Result<()> {
    let mut out = BufWriter::new(file);
    write_gpx(&mut out, waypoints, &opts.gpx())?;
    out.flush()
}
