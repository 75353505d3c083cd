//! Component record structure.

use serde::{Deserialize, Serialize};

/// Table attribute holding the component identifier (partition key).
pub const ATTR_NAME: &str = "component_name";

/// Table attribute holding the vendor product page URL.
pub const ATTR_URL: &str = "component_url";

/// Table attribute holding the mutable stock flag.
pub const ATTR_AVAILABILITY: &str = "component_availability";

/// A tracked component from the inventory table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Component {
    /// Unique component identifier
    pub name: String,

    /// Vendor product page URL
    pub url: String,

    /// Last observed stock flag; `None` until the first poll
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
}

impl Component {
    /// Create a component that has not been polled yet.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            availability: None,
        }
    }
}
