use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::CATEGORY_SEPARATOR;
use crate::error::StatusError;

// ---------------------------------------------------------------------------
// Order lifecycle
// ---------------------------------------------------------------------------

/// Fulfilment state of an order.
///
/// Any state may move to any other state; there is no terminal state and
/// re-applying the current state is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Ready")]
    Ready,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::InProgress,
        OrderStatus::Ready,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Ready => "Ready",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusError::Unknown(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Identity role
// ---------------------------------------------------------------------------

/// Which identity table a login resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Chef,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Customer => f.write_str("customer"),
            Role::Chef => f.write_str("chef"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dish categories
// ---------------------------------------------------------------------------

/// Ordered, de-duplicated set of dish category tags.
///
/// Kept as a list in memory and flattened into a single delimited column
/// only when written to the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTags(Vec<String>);

impl CategoryTags {
    /// Build from raw form values. Each value may itself hold several
    /// comma-separated tags.
    pub fn from_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags: Vec<String> = Vec::new();
        for input in inputs {
            for tag in input.as_ref().split(',') {
                let tag = tag.trim();
                if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                    tags.push(tag.to_string());
                }
            }
        }
        Self(tags)
    }

    /// Parse the stored column value.
    pub fn from_stored(stored: &str) -> Self {
        Self::from_inputs([stored])
    }

    /// Flatten for storage.
    pub fn to_stored(&self) -> String {
        self.0.join(CATEGORY_SEPARATOR)
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_all() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert_eq!(
            "Bogus".parse::<OrderStatus>(),
            Err(StatusError::Unknown("Bogus".to_string()))
        );
        // exact match only
        assert!("ready".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_display_names() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"Out for Delivery\"");
        let back: OrderStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(back, OrderStatus::InProgress);
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Chef).unwrap(), "\"chef\"");
    }

    #[test]
    fn test_category_tags_split_and_dedupe() {
        let tags = CategoryTags::from_inputs(["Vegan, Spicy", "spicy", " ", "Dessert"]);
        assert_eq!(tags.tags(), &["Vegan", "Spicy", "Dessert"]);
        assert_eq!(tags.to_stored(), "Vegan, Spicy, Dessert");
    }

    #[test]
    fn test_category_tags_from_stored() {
        let tags = CategoryTags::from_stored("Vegan, Spicy");
        assert_eq!(tags.tags(), &["Vegan", "Spicy"]);
        assert!(CategoryTags::from_stored("").is_empty());
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"["Vegan","Spicy"]"#);
    }
}
