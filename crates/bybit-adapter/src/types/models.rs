/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - shared wire shapes used by REST and websocket payloads
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One side of the book at one price, transmitted as a `["price", "size"]`
/// pair in both the REST orderbook snapshot and the websocket delta stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel(
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
);

impl PriceLevel {
    pub fn price(&self) -> Decimal {
        self.0
    }

    pub fn size(&self) -> Decimal {
        self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_level_from_string_pair() {
        let level: PriceLevel = serde_json::from_str(r#"["16493.50", "0.006"]"#).unwrap();
        assert_eq!(level.price(), "16493.50".parse().unwrap());
        assert_eq!(level.size(), "0.006".parse().unwrap());
    }

    #[test]
    fn test_price_level_rejects_non_numeric() {
        assert!(serde_json::from_str::<PriceLevel>(r#"["abc", "1"]"#).is_err());
    }
}
