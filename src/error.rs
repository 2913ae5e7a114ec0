use std::io;
use std::num::{ParseFloatError, ParseIntError};
use wasm_bindgen::JsValue;

/// Why a four-token Olex record was rejected.
#[derive(Debug)]
pub enum RecordError {
    InvalidCoordinate {
        token: String,
        source: ParseFloatError,
    },
    NonFiniteCoordinate(String),
    InvalidTimestamp {
        token: String,
        source: ParseIntError,
    },
    TimestampOutOfRange(i64),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCoordinate { token, source } => {
                write!(f, "invalid coordinate '{token}': {source}")
            }
            Self::NonFiniteCoordinate(token) => write!(f, "coordinate '{token}' is not finite"),
            Self::InvalidTimestamp { token, source } => {
                write!(f, "invalid timestamp '{token}': {source}")
            }
            Self::TimestampOutOfRange(secs) => {
                write!(f, "timestamp {secs} is out of the representable range")
            }
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidCoordinate { source, .. } => Some(source),
            Self::InvalidTimestamp { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure of a whole conversion run.
#[derive(Debug)]
pub enum ConvertError {
    /// The gzip source could not be opened, decompressed or decoded as UTF-8.
    Read(io::Error),
    /// Parsing succeeded but produced no usable record.
    NoWaypoints,
    /// The GPX output could not be written.
    Write(io::Error),
    /// The map document could not be written.
    Map(io::Error),
    XmlParse(quick_xml::Error),
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(e) => write!(f, "Error reading Olex file: {e}"),
            Self::NoWaypoints => write!(f, "No valid waypoint found"),
            Self::Write(e) => write!(f, "Error writing GPX file: {e}"),
            Self::Map(e) => write!(f, "Error writing map file: {e}"),
            Self::XmlParse(e) => write!(f, "XML parse error: {e}"),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) | Self::Write(e) | Self::Map(e) => Some(e),
            Self::XmlParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for ConvertError {
    fn from(e: quick_xml::Error) -> Self {
        Self::XmlParse(e)
    }
}

impl From<ConvertError> for JsValue {
    fn from(e: ConvertError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
