use serde::{Deserialize, Serialize};

/// Custom header configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CustomHeader {
    /// Header name (e.g., "X-Frame-Options")
    pub name: String,
    /// Header value (e.g., "DENY")
    pub value: String,
}

impl CustomHeader {
    pub fn new(name: &str, value: &str) -> Self {
        Self { name: name.to_string(), value: value.to_string() }
    }
}
