//! Converts an e-commerce order export (XML, root element `<orders>`) into a JSON array
//! of orders with normalized field names.
//!
//! The conversion is driven by the binding table in [`schema`]: every output field names
//! the vendor path it is read from and the type it is converted to. `custom-attributes`
//! groups are folded into maps by [`custom_attributes::extract`].
//!
//! ```
//! use order_export_to_json::{xml_to_json, Config};
//!
//! let xml = r#"<orders><order><original-order-no>00001</original-order-no></order></orders>"#;
//! let json = xml_to_json(xml.as_bytes(), &Config::new_with_defaults()).unwrap();
//! assert!(String::from_utf8(json).unwrap().contains("\"originalOrderNo\": \"00001\""));
//! ```

pub mod custom_attributes;
pub mod error;
mod mapper;
pub mod model;
pub mod schema;


use log::debug;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

pub use error::{Error, Result};
pub use model::{
    Address, BillingAddress, CustomAttributes, Customer, Document, Float, Note, Order, Payment,
    PriceAdjustment, ProductLineItem, Shipment, ShippingAddress, ShippingLineItem, Status,
    Timestamp, Total, Totals,
};

/// Tells the encoder how to lay out the JSON output.
/// Decoding is fixed by the binding table and takes no options.
#[derive(Debug, Clone)]
pub struct Config {
    /// Indentation added per nesting level. An empty string writes the whole
    /// document on a single line.
    pub indent: String,
    /// Terminate the output with `\n`.
    pub trailing_newline: bool,
}

impl Config {
    /// One tab per level, no trailing newline.
    pub fn new_with_defaults() -> Self {
        Config {
            indent: "\t".to_owned(),
            trailing_newline: false,
        }
    }

    pub fn new_with_custom_values(indent: &str, trailing_newline: bool) -> Self {
        Config {
            indent: indent.to_owned(),
            trailing_newline,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new_with_defaults()
    }
}

/// Decodes an order export held in memory.
/// Fails with [`Error::MalformedInput`] or [`Error::TypeConversion`]; no partial document
/// is ever returned.
pub fn parse_orders(xml: &[u8]) -> Result<Document> {
    parse_orders_str(std::str::from_utf8(xml)?)
}

/// Same as [`parse_orders`] for input that is already a string.
pub fn parse_orders_str(xml: &str) -> Result<Document> {
    let value = xml_str_to_json(xml)?;
    let document: Document = serde_json::from_value(value)?;
    debug!("decoded {} order(s)", document.orders.len());
    Ok(document)
}

/// Decodes an order export into a JSON array without going through the typed model.
pub fn xml_str_to_json(xml: &str) -> Result<Value> {
    let root = mapper::parse_root(xml)?;
    mapper::decode_document(&root)
}

/// Encodes a decoded document using the layout from `Config`.
pub fn orders_to_json(document: &Document, config: &Config) -> Result<Vec<u8>> {
    let mut out = Vec::new();

    if config.indent.is_empty() {
        serde_json::to_writer(&mut out, document)?;
    } else {
        let formatter = PrettyFormatter::with_indent(config.indent.as_bytes());
        let mut serializer = Serializer::with_formatter(&mut out, formatter);
        document.serialize(&mut serializer)?;
    }

    if config.trailing_newline {
        out.push(b'\n');
    }

    Ok(out)
}

/// Converts an order export into JSON bytes.
pub fn xml_to_json(xml: &[u8], config: &Config) -> Result<Vec<u8>> {
    let document = parse_orders(xml)?;
    orders_to_json(&document, config)
}
