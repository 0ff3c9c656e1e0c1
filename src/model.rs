//! Typed records produced by the decoder.
//!
//! Field names on the JSON side are the output names of the binding table in
//! [`schema`](crate::schema). Records are built once per decode and never mutated.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_derive::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Timestamp as read from the export, keeping its UTC offset.
pub type Timestamp = DateTime<FixedOffset>;

/// JSON form of an absent timestamp.
pub const ZERO_TIMESTAMP: &str = "0001-01-01T00:00:00Z";

/// Largest magnitude below which every integral `f64` is exact.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// RFC 3339 with `Z` for UTC and only as many fractional digits as needed.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

mod timestamp {
    use super::{format_timestamp, Timestamp};
    use chrono::DateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text).map_err(serde::de::Error::custom)
    }
}

/// A floating point amount. Integral values are written as JSON integers
/// (`0`, `10`), everything else as JSON floats (`10.5`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Float(pub f64);

impl Float {
    fn as_exact_int(self) -> Option<i64> {
        if self.0.fract() == 0.0 && self.0.abs() <= MAX_EXACT_INT {
            Some(self.0 as i64)
        } else {
            None
        }
    }

    /// Same representation as the `Serialize` impl; non-finite values become `null`.
    pub fn to_json(self) -> Value {
        match self.as_exact_int() {
            Some(v) => Value::from(v),
            None => Number::from_f64(self.0).map_or(Value::Null, Value::Number),
        }
    }
}

impl From<f64> for Float {
    fn from(v: f64) -> Self {
        Float(v)
    }
}

impl From<Float> for f64 {
    fn from(v: Float) -> Self {
        v.0
    }
}

impl serde::Serialize for Float {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_exact_int() {
            Some(v) => serializer.serialize_i64(v),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Float {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <f64 as serde::Deserialize>::deserialize(deserializer).map(Float)
    }
}

/// Merchant defined key/value pairs attached to a record.
///
/// Only the custom attribute extractor builds these; keys are kept sorted so the
/// encoded output is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomAttributes(BTreeMap<String, String>);

impl CustomAttributes {
    pub(crate) fn new() -> Self {
        CustomAttributes(BTreeMap::new())
    }

    /// Returns the previous value if the key was already present.
    pub(crate) fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.0.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a CustomAttributes {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// All orders of one export, in document order. Encodes as a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(with = "timestamp")]
    pub order_date: Timestamp,
    pub original_order_no: String,
    pub invoice_no: String,
    pub customer: Customer,
    pub status: Status,
    pub business_type: String,
    pub channel_type: String,
    pub current_order_no: String,
    pub product_line_items: Vec<ProductLineItem>,
    pub shipping_line_items: Vec<ShippingLineItem>,
    pub shipments: Vec<Shipment>,
    pub totals: Totals,
    pub payments: Vec<Payment>,
    pub remote_host: String,
    pub notes: Vec<Note>,
    pub custom_attributes: CustomAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub guest: bool,
    pub name: String,
    pub email: String,
    pub billing_address: BillingAddress,
}

/// Postal address. The billing and shipping roles share this layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
    pub phone: String,
    pub custom_attributes: CustomAttributes,
}

pub type BillingAddress = Address;
pub type ShippingAddress = Address;

/// Vendor status values, passed through unchecked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub order_status: String,
    pub shipping_status: String,
    pub confirmation_status: String,
    pub payment_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLineItem {
    pub net_price: Float,
    pub tax: Float,
    pub gross_price: Float,
    pub base_price: Float,
    pub text: String,
    pub tax_basis: Float,
    pub position: i64,
    #[serde(rename = "productID")]
    pub product_id: String,
    pub product_name: String,
    pub quantity: Float,
    pub tax_rate: Float,
    #[serde(rename = "shipmentID")]
    pub shipment_id: String,
    pub gift: bool,
    pub custom_attributes: CustomAttributes,
    pub price_adjustments: Vec<PriceAdjustment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAdjustment {
    pub net_price: Float,
    pub tax: Float,
    pub gross_price: Float,
    pub base_price: Float,
    pub text: String,
    pub tax_basis: Float,
    #[serde(rename = "promotionID")]
    pub promotion_id: String,
    /// Read from `discount>amount`.
    pub amount: Float,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLineItem {
    pub net_price: Float,
    pub tax: Float,
    pub gross_price: Float,
    pub base_price: Float,
    pub tax_basis: Float,
    pub price_adjustments: Vec<PriceAdjustment>,
    #[serde(rename = "itemID")]
    pub item_id: String,
    #[serde(rename = "shipmentID")]
    pub shipment_id: String,
    pub tax_rate: Float,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    /// Taken from the `shipment-id` attribute of `<shipment>`.
    #[serde(rename = "ID")]
    pub id: String,
    pub status: String,
    pub method: String,
    pub tracking_number: String,
    pub shipping_address: ShippingAddress,
    pub gift: bool,
    pub totals: Totals,
    pub custom_attributes: CustomAttributes,
}

/// The six totals of an order or shipment. Any of them, `order_total` included,
/// is all zeros when the export leaves it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub merchandise_total: Total,
    pub adjusted_merchandise_total: Total,
    pub shipping_total: Total,
    pub adjusted_shipping_total: Total,
    pub shipment_total: Total,
    pub order_total: Total,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Total {
    pub net_price: Float,
    pub tax: Float,
    pub gross_price: Float,
    pub price_adjustments: Vec<PriceAdjustment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub custom_method: String,
    pub amount: Float,
    #[serde(rename = "processorID")]
    pub processor_id: String,
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    pub custom_attributes: CustomAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub created_by: String,
    #[serde(with = "timestamp")]
    pub creation_date: Timestamp,
    pub subject: String,
    pub text: String,
}
