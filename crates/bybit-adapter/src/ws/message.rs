/*
[INPUT]:  Raw websocket frame bodies
[OUTPUT]: Typed push payloads with re-derived subscription keys
[POS]:    WebSocket layer - per-topic payload schemas
[UPDATE]: When the venue adds stream fields or changes a payload shape
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::topic::{AccountEventKey, OrderbookKey, PrivateTopic, TickerKey, TradeKey};
use crate::types::PriceLevel;

/// Order book delta or snapshot on `orderbook.<depth>.<symbol>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderbookUpdate {
    pub topic: String,
    /// `snapshot` or `delta`.
    #[serde(rename = "type")]
    pub update_type: String,
    pub ts: i64,
    pub data: OrderbookData,
}

impl OrderbookUpdate {
    /// Key re-derived from the frame's own topic string. Depth only exists
    /// there, so this is a parse rather than a field read.
    pub fn key(&self) -> OrderbookKey {
        OrderbookKey::parse(&self.topic).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderbookData {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "b")]
    pub bids: Vec<PriceLevel>,
    #[serde(rename = "a")]
    pub asks: Vec<PriceLevel>,
    #[serde(rename = "u")]
    pub update_id: i64,
    pub seq: i64,
}

/// Ticker push on `tickers.<symbol>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerUpdate {
    pub topic: String,
    #[serde(rename = "type", default)]
    pub update_type: String,
    #[serde(default)]
    pub ts: i64,
    pub data: TickerData,
}

impl TickerUpdate {
    pub fn key(&self) -> TickerKey {
        TickerKey::parse(&self.topic).unwrap_or_default()
    }
}

/// Ticker fields common to every category; numeric fields stay text because
/// the venue sends empty strings on partial (delta) ticks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TickerData {
    pub symbol: String,
    pub last_price: String,
    pub high_price24h: String,
    pub low_price24h: String,
    pub prev_price24h: String,
    pub volume24h: String,
    pub turnover24h: String,
    pub price24h_pcnt: String,
    pub usd_index_price: String,
}

/// Order push on the private `order` topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(default)]
    pub id: String,
    pub topic: String,
    #[serde(default)]
    pub creation_time: i64,
    pub data: Vec<OrderData>,
}

impl OrderUpdate {
    pub fn key(&self) -> Option<PrivateTopic> {
        PrivateTopic::parse(&self.topic)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderData {
    pub category: String,
    pub symbol: String,
    pub order_id: String,
    pub order_link_id: String,
    pub side: String,
    pub order_type: String,
    pub order_status: String,
    pub price: String,
    pub qty: String,
    pub avg_price: String,
    pub leaves_qty: String,
    pub leaves_value: String,
    pub cum_exec_qty: String,
    pub cum_exec_value: String,
    pub cum_exec_fee: String,
    pub time_in_force: String,
    pub reduce_only: bool,
    pub close_on_trigger: bool,
    pub position_idx: i32,
    pub reject_reason: String,
    pub stop_order_type: String,
    pub trigger_price: String,
    pub take_profit: String,
    pub stop_loss: String,
    pub created_time: String,
    pub updated_time: String,
}

/// Position push on the private `position` topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    #[serde(default)]
    pub id: String,
    pub topic: String,
    #[serde(default)]
    pub creation_time: i64,
    pub data: Vec<PositionData>,
}

impl PositionUpdate {
    pub fn key(&self) -> Option<PrivateTopic> {
        PrivateTopic::parse(&self.topic)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionData {
    pub category: String,
    pub symbol: String,
    pub side: String,
    pub size: String,
    pub position_idx: i32,
    pub entry_price: String,
    pub leverage: String,
    pub position_value: String,
    pub mark_price: String,
    pub position_balance: String,
    pub take_profit: String,
    pub stop_loss: String,
    pub trailing_stop: String,
    pub unrealised_pnl: String,
    pub cum_realised_pnl: String,
    pub liq_price: String,
    pub bust_price: String,
    pub position_status: String,
    pub created_time: String,
    pub updated_time: String,
}

/// Wallet push on the private `wallet` topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdate {
    #[serde(default)]
    pub id: String,
    pub topic: String,
    #[serde(default)]
    pub creation_time: i64,
    pub data: Vec<WalletData>,
}

impl WalletUpdate {
    pub fn key(&self) -> Option<PrivateTopic> {
        PrivateTopic::parse(&self.topic)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletData {
    pub account_type: String,
    pub account_im_rate: String,
    pub account_mm_rate: String,
    pub total_equity: String,
    pub total_wallet_balance: String,
    pub total_margin_balance: String,
    pub total_available_balance: String,
    pub total_perp_upl: String,
    #[serde(rename = "coin")]
    pub coins: Vec<WalletCoinData>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletCoinData {
    pub coin: String,
    pub equity: String,
    pub usd_value: String,
    pub wallet_balance: String,
    pub available_to_withdraw: String,
    pub unrealised_pnl: String,
    pub cum_realised_pnl: String,
}

/// Trade tick on the legacy spot quote stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeUpdate {
    pub topic: String,
    pub params: TradeParams,
    pub data: TradeTick,
}

impl TradeUpdate {
    pub fn key(&self) -> TradeKey {
        TradeKey::new(self.params.symbol.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeParams {
    pub symbol: String,
    #[serde(rename = "symbolName")]
    pub symbol_name: String,
    pub binary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeTick {
    #[serde(rename = "v")]
    pub trade_id: String,
    #[serde(rename = "t")]
    pub timestamp: i64,
    #[serde(rename = "p", with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(rename = "q", with = "rust_decimal::serde::str")]
    pub qty: Decimal,
    /// True when the taker was on the buy side.
    #[serde(rename = "m")]
    pub is_buy_side_taker: bool,
}

/// Account push on the legacy spot private stream. The wire shape is a
/// one-element array wrapping the event object.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountInfoUpdate {
    pub content: AccountInfoContent,
}

impl AccountInfoUpdate {
    pub fn key(&self) -> AccountEventKey {
        AccountEventKey::new(self.content.event.clone())
    }
}

impl<'de> Deserialize<'de> for AccountInfoUpdate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut items = Vec::<AccountInfoContent>::deserialize(deserializer)?;
        if items.len() != 1 {
            return Err(serde::de::Error::invalid_length(
                items.len(),
                &"a single account event",
            ));
        }
        Ok(Self {
            content: items.remove(0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountInfoContent {
    #[serde(rename = "e")]
    pub event: String,
    #[serde(rename = "E")]
    pub timestamp: String,
    #[serde(rename = "T")]
    pub allow_trade: bool,
    #[serde(rename = "W")]
    pub allow_withdraw: bool,
    #[serde(rename = "D")]
    pub allow_deposit: bool,
    #[serde(rename = "B")]
    pub balances: Vec<BalanceDelta>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceDelta {
    #[serde(rename = "a")]
    pub asset: String,
    #[serde(rename = "f")]
    pub free: String,
    #[serde(rename = "l")]
    pub locked: String,
}
