//! The binding table between the vendor order export and the JSON output.
//!
//! Each record type is described by a [`Schema`]: an ordered list of [`Binding`]s, each
//! naming the output field, the source path it is read from, and the [`Kind`] that decides
//! how the source text is converted. The decode engine in `mapper` walks these tables and
//! never hard-codes a vendor element name.
//!
//! Path expressions use the vendor tag syntax:
//! * `customer-name` - text of the direct child element
//! * `shipments>shipment` - every `shipment` child of every `shipments` child
//! * `@shipment-id` - attribute of the element being decoded

/// Defines how the source text (or sub-tree) of a binding is converted.
#[derive(Debug)]
pub enum Kind {
    /// Character data copied as-is.
    Text,
    /// 64 bit float. Absent or empty converts to `0`.
    Float,
    /// Signed integer. Absent or empty converts to `0`.
    Int,
    /// `true`/`false` in any of the accepted spellings. Absent converts to `false`; empty is an error.
    Bool,
    /// RFC 3339 timestamp. Absent converts to `0001-01-01T00:00:00Z`; empty is an error.
    Timestamp,
    /// A nested record. The last matching element wins; absent yields a record of zero-values.
    Record(&'static Schema),
    /// Every matching element in document order. Absent yields `[]`.
    Sequence(&'static Schema),
    /// A `custom-attributes` grouping element folded into a key/value map.
    AttributeBag,
}

impl Kind {
    /// Type name used in conversion errors.
    pub fn target_name(&self) -> &'static str {
        match self {
            Kind::Text => "text",
            Kind::Float => "float",
            Kind::Int => "integer",
            Kind::Bool => "boolean",
            Kind::Timestamp => "timestamp",
            Kind::Record(_) => "record",
            Kind::Sequence(_) => "sequence",
            Kind::AttributeBag => "custom attributes",
        }
    }
}

/// One row of the table: output field name, source path, conversion.
#[derive(Debug)]
pub struct Binding {
    pub field: &'static str,
    pub path: &'static str,
    pub kind: Kind,
}

impl Binding {
    pub const fn new(field: &'static str, path: &'static str, kind: Kind) -> Self {
        Binding { field, path, kind }
    }

    pub fn source(&self) -> SourcePath {
        SourcePath::parse(self.path)
    }
}

/// A parsed path expression.
#[derive(Debug, PartialEq)]
pub struct SourcePath {
    /// Element names to descend through, outermost first.
    pub elements: Vec<&'static str>,
    /// Attribute read from the last element reached, if any.
    pub attribute: Option<&'static str>,
}

impl SourcePath {
    pub fn parse(expr: &'static str) -> Self {
        let mut elements: Vec<&'static str> = expr.split('>').collect();
        let attribute = elements.last().copied().and_then(|last| last.strip_prefix('@'));
        if attribute.is_some() {
            elements.pop();
        }

        SourcePath {
            elements,
            attribute,
        }
    }
}

/// The fields of one record type.
#[derive(Debug)]
pub struct Schema {
    /// Vendor element name of the record, used in error paths.
    pub name: &'static str,
    pub bindings: &'static [Binding],
}

/// Name of the root element of every export.
pub const ROOT_ELEMENT: &str = "orders";

/// The export itself: every `order` under the root, in document order.
pub static DOCUMENT: Binding = Binding::new("orders", "order", Kind::Sequence(&ORDER));

pub static ORDER: Schema = Schema {
    name: "order",
    bindings: &[
        Binding::new("orderDate", "order-date", Kind::Timestamp),
        Binding::new("originalOrderNo", "original-order-no", Kind::Text),
        Binding::new("invoiceNo", "invoice-no", Kind::Text),
        Binding::new("customer", "customer", Kind::Record(&CUSTOMER)),
        Binding::new("status", "status", Kind::Record(&STATUS)),
        Binding::new("businessType", "business-type", Kind::Text),
        Binding::new("channelType", "channel-type", Kind::Text),
        Binding::new("currentOrderNo", "current-order-no", Kind::Text),
        Binding::new(
            "productLineItems",
            "product-lineitems>product-lineitem",
            Kind::Sequence(&PRODUCT_LINE_ITEM),
        ),
        Binding::new(
            "shippingLineItems",
            "shipping-lineitems>shipping-lineitem",
            Kind::Sequence(&SHIPPING_LINE_ITEM),
        ),
        Binding::new("shipments", "shipments>shipment", Kind::Sequence(&SHIPMENT)),
        Binding::new("totals", "totals", Kind::Record(&TOTALS)),
        Binding::new("payments", "payments>payment", Kind::Sequence(&PAYMENT)),
        Binding::new("remoteHost", "remoteHost", Kind::Text),
        Binding::new("notes", "notes>note", Kind::Sequence(&NOTE)),
        Binding::new("customAttributes", "custom-attributes", Kind::AttributeBag),
    ],
};

pub static CUSTOMER: Schema = Schema {
    name: "customer",
    bindings: &[
        Binding::new("guest", "guest", Kind::Bool),
        Binding::new("name", "customer-name", Kind::Text),
        Binding::new("email", "customer-email", Kind::Text),
        Binding::new("billingAddress", "billing-address", Kind::Record(&ADDRESS)),
    ],
};

/// Shared by billing and shipping addresses.
pub static ADDRESS: Schema = Schema {
    name: "address",
    bindings: &[
        Binding::new("firstName", "first-name", Kind::Text),
        Binding::new("lastName", "last-name", Kind::Text),
        Binding::new("address", "address1", Kind::Text),
        Binding::new("city", "city", Kind::Text),
        Binding::new("postalCode", "postal-code", Kind::Text),
        Binding::new("countryCode", "country-code", Kind::Text),
        Binding::new("phone", "phone", Kind::Text),
        Binding::new("customAttributes", "custom-attributes", Kind::AttributeBag),
    ],
};

pub static STATUS: Schema = Schema {
    name: "status",
    bindings: &[
        Binding::new("orderStatus", "order-status", Kind::Text),
        Binding::new("shippingStatus", "shipping-status", Kind::Text),
        Binding::new("confirmationStatus", "confirmation-status", Kind::Text),
        Binding::new("paymentStatus", "payment-status", Kind::Text),
    ],
};

pub static PRODUCT_LINE_ITEM: Schema = Schema {
    name: "product-lineitem",
    bindings: &[
        Binding::new("netPrice", "net-price", Kind::Float),
        Binding::new("tax", "tax", Kind::Float),
        Binding::new("grossPrice", "gross-price", Kind::Float),
        Binding::new("basePrice", "base-price", Kind::Float),
        Binding::new("text", "lineitem-text", Kind::Text),
        Binding::new("taxBasis", "tax-basis", Kind::Float),
        Binding::new("position", "position", Kind::Int),
        Binding::new("productID", "product-id", Kind::Text),
        Binding::new("productName", "product-name", Kind::Text),
        Binding::new("quantity", "quantity", Kind::Float),
        Binding::new("taxRate", "tax-rate", Kind::Float),
        Binding::new("shipmentID", "shipment-id", Kind::Text),
        Binding::new("gift", "gift", Kind::Bool),
        Binding::new("customAttributes", "custom-attributes", Kind::AttributeBag),
        Binding::new(
            "priceAdjustments",
            "price-adjustments>price-adjustment",
            Kind::Sequence(&PRICE_ADJUSTMENT),
        ),
    ],
};

pub static PRICE_ADJUSTMENT: Schema = Schema {
    name: "price-adjustment",
    bindings: &[
        Binding::new("netPrice", "net-price", Kind::Float),
        Binding::new("tax", "tax", Kind::Float),
        Binding::new("grossPrice", "gross-price", Kind::Float),
        Binding::new("basePrice", "base-price", Kind::Float),
        Binding::new("text", "lineitem-text", Kind::Text),
        Binding::new("taxBasis", "tax-basis", Kind::Float),
        Binding::new("promotionID", "promotion-id", Kind::Text),
        Binding::new("amount", "discount>amount", Kind::Float),
    ],
};

pub static SHIPPING_LINE_ITEM: Schema = Schema {
    name: "shipping-lineitem",
    bindings: &[
        Binding::new("netPrice", "net-price", Kind::Float),
        Binding::new("tax", "tax", Kind::Float),
        Binding::new("grossPrice", "gross-price", Kind::Float),
        Binding::new("basePrice", "base-price", Kind::Float),
        Binding::new("taxBasis", "tax-basis", Kind::Float),
        Binding::new(
            "priceAdjustments",
            "price-adjustments>price-adjustment",
            Kind::Sequence(&PRICE_ADJUSTMENT),
        ),
        Binding::new("itemID", "item-id", Kind::Text),
        Binding::new("shipmentID", "shipment-id", Kind::Text),
        Binding::new("taxRate", "tax-rate", Kind::Float),
    ],
};

pub static SHIPMENT: Schema = Schema {
    name: "shipment",
    bindings: &[
        Binding::new("ID", "@shipment-id", Kind::Text),
        Binding::new("status", "status>shipping-status", Kind::Text),
        Binding::new("method", "shipping-method", Kind::Text),
        Binding::new("trackingNumber", "tracking-number", Kind::Text),
        Binding::new("shippingAddress", "shipping-address", Kind::Record(&ADDRESS)),
        Binding::new("gift", "gift", Kind::Bool),
        Binding::new("totals", "totals", Kind::Record(&TOTALS)),
        Binding::new("customAttributes", "custom-attributes", Kind::AttributeBag),
    ],
};

pub static TOTALS: Schema = Schema {
    name: "totals",
    bindings: &[
        Binding::new("merchandiseTotal", "merchandize-total", Kind::Record(&TOTAL)),
        Binding::new(
            "adjustedMerchandiseTotal",
            "adjusted-merchandize-total",
            Kind::Record(&TOTAL),
        ),
        Binding::new("shippingTotal", "shipping-total", Kind::Record(&TOTAL)),
        Binding::new(
            "adjustedShippingTotal",
            "adjusted-shipping-total",
            Kind::Record(&TOTAL),
        ),
        Binding::new("shipmentTotal", "shipment-total", Kind::Record(&TOTAL)),
        Binding::new("orderTotal", "order-total", Kind::Record(&TOTAL)),
    ],
};

/// Shared by all six totals.
pub static TOTAL: Schema = Schema {
    name: "total",
    bindings: &[
        Binding::new("netPrice", "net-price", Kind::Float),
        Binding::new("tax", "tax", Kind::Float),
        Binding::new("grossPrice", "gross-price", Kind::Float),
        Binding::new(
            "priceAdjustments",
            "price-adjustments>price-adjustment",
            Kind::Sequence(&PRICE_ADJUSTMENT),
        ),
    ],
};

pub static PAYMENT: Schema = Schema {
    name: "payment",
    bindings: &[
        Binding::new("customMethod", "custom-method>method-name", Kind::Text),
        Binding::new("amount", "amount", Kind::Float),
        Binding::new("processorID", "processor-id", Kind::Text),
        Binding::new("transactionID", "transaction-id", Kind::Text),
        Binding::new("customAttributes", "custom-attributes", Kind::AttributeBag),
    ],
};

pub static NOTE: Schema = Schema {
    name: "note",
    bindings: &[
        Binding::new("createdBy", "created-by", Kind::Text),
        Binding::new("creationDate", "creation-date", Kind::Timestamp),
        Binding::new("subject", "subject", Kind::Text),
        Binding::new("text", "text", Kind::Text),
    ],
};
