/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{AccountType, Category};
use super::models::PriceLevel;

/// Common `{retCode, retMsg, result, time}` envelope wrapping every v5
/// REST response. A non-zero `ret_code` means the call failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub ret_code: i64,
    pub ret_msg: String,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub order_id: String,
    pub order_link_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickersResult {
    pub category: Category,
    pub list: Vec<TickerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSnapshot {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub last_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high_price24h: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub low_price24h: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub prev_price24h: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub volume24h: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub turnover24h: Decimal,
    /// Signed ratio, e.g. "-0.0405"; kept as text since the venue sends
    /// empty strings for some categories.
    #[serde(default)]
    pub price24h_pcnt: String,
    #[serde(default)]
    pub usd_index_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderbookResult {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "b")]
    pub bids: Vec<PriceLevel>,
    #[serde(rename = "a")]
    pub asks: Vec<PriceLevel>,
    #[serde(rename = "ts")]
    pub timestamp: i64,
    #[serde(rename = "u")]
    pub update_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalanceResult {
    pub list: Vec<WalletAccount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    pub account_type: AccountType,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_equity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_wallet_balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_available_balance: Decimal,
    #[serde(default)]
    pub account_im_rate: String,
    #[serde(default)]
    pub account_mm_rate: String,
    pub coin: Vec<CoinBalance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalance {
    pub coin: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub equity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub wallet_balance: Decimal,
    #[serde(default)]
    pub usd_value: String,
    #[serde(default)]
    pub unrealised_pnl: String,
    #[serde(default)]
    pub cum_realised_pnl: String,
}
