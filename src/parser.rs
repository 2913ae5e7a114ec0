use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::ConvertError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, ConvertError>;

/// Parse a GPX XML string into GpxData.
///
/// Only `<wpt>` and `<rte>` are read; tracks, metadata and extensions are
/// skipped.
pub fn parse_gpx(xml: &str) -> Result<GpxData> {
    let mut reader = Reader::from_str(xml);
    let mut data = GpxData::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"gpx" => read_root_attributes(&e, &mut data),
                b"wpt" => {
                    if let Some(pt) = parse_point(&e, &mut reader)? {
                        data.waypoints.push(pt);
                    }
                }
                b"rte" => data.routes.push(parse_route(&mut reader)?),
                b"trk" | b"metadata" | b"extensions" => {
                    reader
                        .read_to_end(e.name())
                        .map_err(ConvertError::XmlParse)?;
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"gpx" => read_root_attributes(&e, &mut data),
                b"rte" => data.routes.push(Vec::new()),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(data)
}

fn read_root_attributes(e: &BytesStart<'_>, data: &mut GpxData) {
    for attr in e.attributes().flatten() {
        let value = std::str::from_utf8(&attr.value)
            .unwrap_or_default()
            .to_string();
        match attr.key.local_name().as_ref() {
            b"version" => data.version = Some(value),
            b"creator" => data.creator = Some(value),
            _ => {}
        }
    }
}

/// `lat`/`lon` of a point tag, or `None` when either is missing or not a number.
fn point_coords(e: &BytesStart<'_>) -> Option<(f64, f64)> {
    let number = |key: &[u8]| {
        let attr = e.try_get_attribute(key).ok()??;
        std::str::from_utf8(&attr.value).ok()?.trim().parse::<f64>().ok()
    };
    Some((number(b"lat")?, number(b"lon")?))
}

/// Parse a point element (wpt, rtept) and its children.
/// Called after receiving Event::Start for the point element.
/// Points without valid coordinates, a `<time>` or a `<name>` are skipped.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<Waypoint>> {
    let Some((lat, lon)) = point_coords(start) else {
        reader.read_to_end(start.name())?;
        return Ok(None);
    };

    let mut time: Option<String> = None;
    let mut name: Option<String> = None;
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"time" => time = Some(element_text(reader, &e)?),
                b"name" => name = Some(element_text(reader, &e)?),
                _ => {
                    // ele, desc, sym, extensions, ...
                    reader
                        .read_to_end(e.name())
                        .map_err(ConvertError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(time
        .zip(name)
        .map(|(time, name)| Waypoint::new(lat, lon, time, name)))
}

/// Parse a <rte> element into its ordered points.
fn parse_route<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Vec<Waypoint>> {
    let mut points = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"rtept" => {
                    if let Some(pt) = parse_point(&e, reader)? {
                        points.push(pt);
                    }
                }
                _ => {
                    reader
                        .read_to_end(e.name())
                        .map_err(ConvertError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"rte" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(points)
}

/// Text of the element opened by `start`, with CDATA and entity references
/// resolved.
fn element_text(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => match e.resolve_char_ref() {
                Ok(Some(ch)) => text.push(ch),
                _ => {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_predefined_entity(&entity) {
                        text.push_str(resolved);
                    }
                }
            },
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
