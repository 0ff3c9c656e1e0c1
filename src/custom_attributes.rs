//! Folds a `custom-attributes` grouping element into a [`CustomAttributes`] map.
//!
//! ```xml
//! <custom-attributes>
//!     <custom-attribute attribute-id="giftMessage">Happy birthday</custom-attribute>
//!     <custom-attribute attribute-id="loyaltyTier">gold</custom-attribute>
//! </custom-attributes>
//! ```

use crate::model::CustomAttributes;
use log::debug;
use minidom::Element;

/// Attribute holding the key of each custom attribute element.
pub const KEY_ATTRIBUTE: &str = "attribute-id";

/// Reads every child element of `group` as one key/value pair.
///
/// The key comes from the `attribute-id` attribute (`""` when missing) and the value is
/// the child's direct text. A key seen twice keeps its last value. The scan does not
/// descend below the children.
pub fn extract(group: &Element) -> CustomAttributes {
    let mut attributes = CustomAttributes::new();

    for child in group.children() {
        let key = child.attr(KEY_ATTRIBUTE).unwrap_or_default();
        if let Some(previous) = attributes.insert(key.to_owned(), child.text()) {
            debug!(
                "custom attribute {:?} repeated, replacing {:?}",
                key, previous
            );
        }
    }

    attributes
}
