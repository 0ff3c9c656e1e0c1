//! Decode engine: walks a `minidom` tree following the binding table and builds a
//! `serde_json::Value` per record, converting every field to its declared kind.

use crate::custom_attributes;
use crate::error::{Error, Result};
use crate::model::{format_timestamp, CustomAttributes, Float, ZERO_TIMESTAMP};
use crate::schema::{Binding, Kind, Schema, DOCUMENT, ROOT_ELEMENT};
use chrono::DateTime;
use log::{log_enabled, trace, Level};
use minidom::Element;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// Builds the element tree of an export and checks that its root is `<orders>`.
pub fn parse_root(xml: &str) -> Result<Element> {
    check_well_formed(xml)?;

    let root: Element = xml.parse()?;
    if root.name() != ROOT_ELEMENT {
        return Err(Error::MalformedInput(format!(
            "expected root element <{}>, found <{}>",
            ROOT_ELEMENT,
            root.name()
        )));
    }

    Ok(root)
}

/// Rejects truncated input, mismatched closing tags, text outside the root, a raw `<`
/// in an attribute value and anything other than exactly one root element. The tree
/// builder alone accepts a document that simply stops.
fn check_well_formed(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.check_end_names(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event(&mut buf)? {
            Event::Start(ref e) => {
                check_attribute_values(e)?;
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                check_attribute_values(e)?;
                if depth == 0 {
                    roots += 1;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(ref e) if depth == 0 => {
                if !e.escaped().iter().all(u8::is_ascii_whitespace) {
                    return Err(Error::MalformedInput(
                        "character data outside the root element".to_owned(),
                    ));
                }
            }
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(Error::MalformedInput(format!(
            "document ends with {} unclosed element(s)",
            depth
        )));
    }
    match roots {
        0 => Err(Error::MalformedInput("missing root element".to_owned())),
        1 => Ok(()),
        n => Err(Error::MalformedInput(format!("{} root elements", n))),
    }
}

fn check_attribute_values(tag: &BytesStart) -> Result<()> {
    for attr in tag.attributes() {
        let attr = attr?;
        if attr.value.contains(&b'<') {
            return Err(Error::MalformedInput(format!(
                "'<' in value of attribute {}",
                String::from_utf8_lossy(attr.key)
            )));
        }
    }
    Ok(())
}

/// Decodes every order under `root` into a JSON array.
pub fn decode_document(root: &Element) -> Result<Value> {
    let path = format!("/{}", root.name());
    decode_binding(root, &DOCUMENT, &path)
}

/// Decodes one record: every binding of `schema` becomes one entry of the map, in table order.
pub fn decode_record(el: &Element, schema: &Schema, path: &str) -> Result<Map<String, Value>> {
    if log_enabled!(Level::Trace) {
        report_unbound(el, schema, path);
    }

    let mut data = Map::new();
    for binding in schema.bindings {
        data.insert(binding.field.to_owned(), decode_binding(el, binding, path)?);
    }

    Ok(data)
}

fn decode_binding(el: &Element, binding: &Binding, path: &str) -> Result<Value> {
    let source = binding.source();
    let field_path = format!("{}/{}", path, binding.path.replace('>', "/"));
    let matches = select(el, &source.elements);

    match binding.kind {
        Kind::Sequence(schema) => matches
            .into_iter()
            .map(|item| decode_record(item, schema, &field_path).map(Value::Object))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Kind::Record(schema) => {
            let record = match matches.last() {
                Some(item) => decode_record(item, schema, &field_path)?,
                None => decode_record(&Element::bare(schema.name), schema, &field_path)?,
            };
            Ok(Value::Object(record))
        }
        Kind::AttributeBag => {
            let attributes = match matches.last() {
                Some(group) => custom_attributes::extract(group),
                None => CustomAttributes::new(),
            };
            Ok(attributes.to_json())
        }
        ref scalar => {
            let text = match source.attribute {
                Some(name) => matches.last().and_then(|m| m.attr(name)).map(str::to_owned),
                None => matches.last().map(|m| m.text()),
            };
            match text {
                Some(text) => convert(&text, scalar, &field_path),
                None => Ok(zero_value(scalar)),
            }
        }
    }
}

/// Every element reached by descending through `steps`, in document order.
fn select<'a>(el: &'a Element, steps: &[&str]) -> Vec<&'a Element> {
    match steps.split_first() {
        None => vec![el],
        Some((first, rest)) => el
            .children()
            .filter(|child| child.name() == *first)
            .flat_map(|child| select(child, rest))
            .collect(),
    }
}

/// The value an absent scalar field takes.
fn zero_value(kind: &Kind) -> Value {
    match kind {
        Kind::Float => Float(0.0).to_json(),
        Kind::Int => Value::from(0i64),
        Kind::Bool => Value::Bool(false),
        Kind::Timestamp => Value::String(ZERO_TIMESTAMP.to_owned()),
        _ => Value::String(String::new()),
    }
}

/// Converts source text into the JSON value of a scalar kind. Empty numbers are zero;
/// an empty boolean or timestamp is an error.
fn convert(text: &str, kind: &Kind, path: &str) -> Result<Value> {
    if let Kind::Text = kind {
        return Ok(Value::String(text.to_owned()));
    }

    let trimmed = text.trim();
    let error = || Error::TypeConversion {
        path: path.to_owned(),
        value: text.to_owned(),
        target: kind.target_name(),
    };

    match kind {
        Kind::Float if trimmed.is_empty() => Ok(Float(0.0).to_json()),
        Kind::Float => match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Float(v).to_json()),
            _ => Err(error()),
        },
        Kind::Int if trimmed.is_empty() => Ok(Value::from(0i64)),
        Kind::Int => trimmed.parse::<i64>().map(Value::from).map_err(|_| error()),
        Kind::Bool => parse_bool(trimmed).map(Value::Bool).ok_or_else(error),
        Kind::Timestamp => DateTime::parse_from_rfc3339(trimmed)
            .map(|ts| Value::String(format_timestamp(&ts)))
            .map_err(|_| error()),
        _ => Err(error()),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn report_unbound(el: &Element, schema: &Schema, path: &str) {
    for child in el.children() {
        let bound = schema
            .bindings
            .iter()
            .any(|b| b.path.split('>').next() == Some(child.name()));
        if !bound {
            trace!("ignoring unbound element {}/{}", path, child.name());
        }
    }
}
