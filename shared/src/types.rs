use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering applied to product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
    Newest,
}

impl SortOrder {
    /// Resolve a query-string sort key. Missing or unrecognised keys fall back
    /// to ascending name.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("price_low") => SortOrder::PriceLow,
            Some("price_high") => SortOrder::PriceHigh,
            Some("newest") => SortOrder::Newest,
            _ => SortOrder::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Name => "name",
            SortOrder::PriceLow => "price_low",
            SortOrder::PriceHigh => "price_high",
            SortOrder::Newest => "newest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl fmt::Display for FlashLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashLevel::Success => write!(f, "success"),
            FlashLevel::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_falls_back_to_name() {
        assert_eq!(SortOrder::from_param(None), SortOrder::Name);
        assert_eq!(SortOrder::from_param(Some("")), SortOrder::Name);
        assert_eq!(SortOrder::from_param(Some("PRICE_LOW")), SortOrder::Name);
        assert_eq!(SortOrder::from_param(Some("price_low")), SortOrder::PriceLow);
        assert_eq!(SortOrder::from_param(Some("price_high")), SortOrder::PriceHigh);
        assert_eq!(SortOrder::from_param(Some("newest")), SortOrder::Newest);
    }
}
