//! Olex record parsing.
//!
//! An Olex route file is a sequence of lines of the shape
//! `<lat minutes> <lon minutes> <epoch seconds> <name>`. Anything that does
//! not split into exactly four tokens (headers, blank lines, section markers)
//! is skipped without a word. Four-token lines whose numbers do not parse are
//! dropped with a warning.

use chrono::DateTime;

use crate::error::RecordError;
use crate::gpx_types::Waypoint;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Result of looking at a single source line.
#[derive(Debug)]
pub enum LineOutcome {
    Record(Waypoint),
    /// Not a four-token record; ignored silently.
    Skipped,
    Rejected(RecordError),
}

/// A four-token line that failed numeric conversion.
#[derive(Debug)]
pub struct RejectedLine {
    /// 1-based position in the input.
    pub line_number: usize,
    pub line: String,
    pub error: RecordError,
}

/// Waypoints plus the lines that were dropped with a diagnostic.
#[derive(Debug, Default)]
pub struct ParsedRecords {
    pub waypoints: Vec<Waypoint>,
    pub rejected: Vec<RejectedLine>,
}

/// Parse Olex lines into waypoints, preserving input order.
pub fn parse_records<I, S>(lines: I) -> Vec<Waypoint>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_records_with_report(lines).waypoints
}

/// Like [`parse_records`], also returning every rejected line.
pub fn parse_records_with_report<I, S>(lines: I) -> ParsedRecords
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedRecords::default();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        match parse_line(line) {
            LineOutcome::Record(wpt) => parsed.waypoints.push(wpt),
            LineOutcome::Skipped => {}
            LineOutcome::Rejected(error) => {
                tracing::warn!(
                    line_number = index + 1,
                    line = line.trim_end(),
                    %error,
                    "dropping malformed Olex record"
                );
                parsed.rejected.push(RejectedLine {
                    line_number: index + 1,
                    line: line.to_string(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        waypoints = parsed.waypoints.len(),
        rejected = parsed.rejected.len(),
        "parsed Olex records"
    );
    parsed
}

/// Classify and convert one line.
pub fn parse_line(line: &str) -> LineOutcome {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let &[lat, lon, timestamp, name] = tokens.as_slice() else {
        return LineOutcome::Skipped;
    };

    match build_waypoint(lat, lon, timestamp, name) {
        Ok(wpt) => LineOutcome::Record(wpt),
        Err(e) => LineOutcome::Rejected(e),
    }
}

fn build_waypoint(
    lat: &str,
    lon: &str,
    timestamp: &str,
    name: &str,
) -> Result<Waypoint, RecordError> {
    let lat = minutes_to_degrees(lat)?;
    let lon = minutes_to_degrees(lon)?;
    let time = epoch_to_iso(timestamp)?;
    Ok(Waypoint::new(lat, lon, time, name))
}

/// Convert a signed minutes token to signed decimal degrees.
///
/// Leading `-` characters are stripped before parsing the magnitude, and the
/// sign is reapplied to the converted value.
pub fn minutes_to_degrees(token: &str) -> Result<f64, RecordError> {
    let sign = if token.starts_with('-') { -1.0 } else { 1.0 };
    let magnitude = token.trim_start_matches('-');

    let minutes = magnitude
        .parse::<f64>()
        .map_err(|source| RecordError::InvalidCoordinate {
            token: token.to_string(),
            source,
        })?;
    if !minutes.is_finite() {
        return Err(RecordError::NonFiniteCoordinate(token.to_string()));
    }

    Ok(minutes / 60.0 * sign)
}

/// Convert an epoch-seconds token to `YYYY-MM-DDTHH:MM:SSZ`.
///
/// The pattern has no offset component, so the trailing `Z` is the only zone
/// designator ever emitted.
pub fn epoch_to_iso(token: &str) -> Result<String, RecordError> {
    let secs = token
        .parse::<i64>()
        .map_err(|source| RecordError::InvalidTimestamp {
            token: token.to_string(),
            source,
        })?;
    let dt = DateTime::from_timestamp(secs, 0).ok_or(RecordError::TimestampOutOfRange(secs))?;
    Ok(format!("{}Z", dt.format(TIME_FORMAT)))
}
