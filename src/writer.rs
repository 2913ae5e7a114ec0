use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{self, Write};

use crate::error::ConvertError;
use crate::gpx_types::{OutputMode, Waypoint};
use crate::options::GpxWriteOptions;

pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
pub const GPX_VERSION: &str = "1.1";

const INDENT_SIZE: usize = 4;

/// Serialize waypoints as a GPX 1.1 document into `sink`.
///
/// In [`OutputMode::Route`] all points go into a single `<rte>`, in input
/// order. In [`OutputMode::Waypoints`] each point is a top-level `<wpt>`.
pub fn write_gpx<W: Write>(
    sink: W,
    waypoints: &[Waypoint],
    opts: &GpxWriteOptions,
) -> io::Result<()> {
    let mut writer = if opts.indent {
        Writer::new_with_indent(sink, b' ', INDENT_SIZE)
    } else {
        Writer::new(sink)
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", GPX_VERSION));
    root.push_attribute(("creator", opts.creator.as_str()));
    root.push_attribute(("xmlns", GPX_NAMESPACE));
    writer.write_event(Event::Start(root))?;

    match opts.mode {
        OutputMode::Route => {
            writer.write_event(Event::Start(BytesStart::new("rte")))?;
            for wpt in waypoints {
                write_point(&mut writer, "rtept", wpt)?;
            }
            writer.write_event(Event::End(BytesEnd::new("rte")))?;
        }
        OutputMode::Waypoints => {
            for wpt in waypoints {
                write_point(&mut writer, "wpt", wpt)?;
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new("gpx")))?;

    let mut sink = writer.into_inner();
    if opts.indent {
        sink.write_all(b"\n")?;
    }
    Ok(())
}

/// Serialize waypoints as a GPX document held in memory.
pub fn to_gpx_string(waypoints: &[Waypoint], opts: &GpxWriteOptions) -> Result<String, ConvertError> {
    let mut buf = Vec::new();
    write_gpx(&mut buf, waypoints, opts).map_err(ConvertError::Write)?;
    String::from_utf8(buf)
        .map_err(|e| ConvertError::Write(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn write_point<W: Write>(writer: &mut Writer<W>, element: &str, wpt: &Waypoint) -> io::Result<()> {
    let mut start = BytesStart::new(element);
    start.push_attribute(("lat", format_coord(wpt.lat).as_str()));
    start.push_attribute(("lon", format_coord(wpt.lon).as_str()));
    writer.write_event(Event::Start(start))?;

    write_text_element(writer, "time", &wpt.time)?;
    write_text_element(writer, "name", &wpt.name)?;

    writer.write_event(Event::End(BytesEnd::new(element)))
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, element: &str, text: &str) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(element)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(element)))
}

/// Shortest round-trip form that always keeps a fractional part (`9.0`, not `9`)
/// and never uses exponent notation (`0.00001`, not `1e-5`).
pub fn format_coord(value: f64) -> String {
    let repr = format!("{value:?}");
    let Some((mantissa, exp)) = repr.split_once('e') else {
        return repr;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let int_len = mantissa.find('.').unwrap_or(mantissa.len()) as i32;
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = int_len + exp;

    let plain = if point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else if point as usize >= digits.len() {
        format!("{digits}{}.0", "0".repeat(point as usize - digits.len()))
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    };
    format!("{sign}{plain}")
}
