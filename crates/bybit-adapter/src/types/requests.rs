/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Category, OrderType, Side, TimeInForce, TriggerBy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub category: Category,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::str")]
    pub qty: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_link_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_by: Option<TriggerBy>,
}

impl CreateOrderRequest {
    /// Market order with the minimum required fields.
    pub fn market(category: Category, symbol: impl Into<String>, side: Side, qty: Decimal) -> Self {
        Self {
            category,
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            qty,
            price: None,
            time_in_force: None,
            order_link_id: None,
            reduce_only: None,
            take_profit: None,
            stop_loss: None,
            trigger_price: None,
            trigger_by: None,
        }
    }

    /// Limit order with the minimum required fields.
    pub fn limit(
        category: Category,
        symbol: impl Into<String>,
        side: Side,
        qty: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            order_type: OrderType::Limit,
            price: Some(price),
            ..Self::market(category, symbol, side, qty)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub category: Category,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_link_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_order_omits_optional_fields() {
        let req = CreateOrderRequest::market(
            Category::Linear,
            "BTCUSDT",
            Side::Buy,
            "0.01".parse().unwrap(),
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["category"], "linear");
        assert_eq!(json["orderType"], "Market");
        assert_eq!(json["qty"], "0.01");
        assert!(json.get("price").is_none());
        assert!(json.get("timeInForce").is_none());
    }

    #[test]
    fn test_limit_order_carries_price() {
        let req = CreateOrderRequest::limit(
            Category::Linear,
            "BTCUSDT",
            Side::Sell,
            "0.5".parse().unwrap(),
            "30000".parse().unwrap(),
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["orderType"], "Limit");
        assert_eq!(json["price"], "30000");
    }
}
