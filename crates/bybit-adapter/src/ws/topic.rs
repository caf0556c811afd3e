/*
[INPUT]:  Topic strings from the wire and key fields from callers
[OUTPUT]: Structured subscription keys that round-trip through topic strings
[POS]:    WebSocket layer - registry keys and topic grammar
[UPDATE]: When the venue adds topics or changes the topic grammar
*/

use std::fmt;

/// A structured subscription key. `topic` is the identity used in control
/// frames (uniform dialect) and in error messages (both dialects).
pub trait Topic {
    fn topic(&self) -> String;
}

/// Key for `orderbook.<depth>.<symbol>` streams.
///
/// The default value is the invalid zero key; malformed topic strings fall
/// back to it, so their lookups fail rather than crash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OrderbookKey {
    pub depth: u32,
    pub symbol: String,
}

impl OrderbookKey {
    pub fn new(depth: u32, symbol: impl Into<String>) -> Self {
        Self {
            depth,
            symbol: symbol.into(),
        }
    }

    pub fn parse(topic: &str) -> Option<Self> {
        let mut parts = topic.splitn(4, '.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("orderbook"), Some(depth), Some(symbol), None) => Some(Self {
                depth: depth.parse().ok()?,
                symbol: symbol.to_string(),
            }),
            _ => None,
        }
    }
}

impl Topic for OrderbookKey {
    fn topic(&self) -> String {
        format!("orderbook.{}.{}", self.depth, self.symbol)
    }
}

/// Key for `tickers.<symbol>` streams.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TickerKey {
    pub symbol: String,
}

impl TickerKey {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn parse(topic: &str) -> Option<Self> {
        let mut parts = topic.splitn(3, '.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("tickers"), Some(symbol), None) => Some(Self {
                symbol: symbol.to_string(),
            }),
            _ => None,
        }
    }
}

impl Topic for TickerKey {
    fn topic(&self) -> String {
        format!("tickers.{}", self.symbol)
    }
}

/// Account push topics on the uniform private channel; the topic string is
/// the bare event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivateTopic {
    Order,
    Position,
    Wallet,
}

impl PrivateTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivateTopic::Order => "order",
            PrivateTopic::Position => "position",
            PrivateTopic::Wallet => "wallet",
        }
    }

    pub fn parse(topic: &str) -> Option<Self> {
        match topic {
            "order" => Some(PrivateTopic::Order),
            "position" => Some(PrivateTopic::Position),
            "wallet" => Some(PrivateTopic::Wallet),
            _ => None,
        }
    }
}

impl Topic for PrivateTopic {
    fn topic(&self) -> String {
        self.as_str().to_string()
    }
}

impl fmt::Display for PrivateTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key for the legacy spot quote `trade` stream. The wire carries the topic
/// and symbol as separate fields; the combined form is only a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TradeKey {
    pub symbol: String,
}

impl TradeKey {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl Topic for TradeKey {
    fn topic(&self) -> String {
        format!("trade.{}", self.symbol)
    }
}

/// Key for legacy spot private pushes, identified by the `e` event field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AccountEventKey {
    pub event: String,
}

impl AccountEventKey {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
        }
    }
}

impl Topic for AccountEventKey {
    fn topic(&self) -> String {
        self.event.clone()
    }
}
