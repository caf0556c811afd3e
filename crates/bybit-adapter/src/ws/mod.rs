/*
[INPUT]:  Stream endpoints, topic subscriptions, inbound frames
[OUTPUT]: Typed push payloads delivered to per-topic callbacks
[POS]:    WebSocket layer - module wiring and public surface
[UPDATE]: When adding channels or reshaping the streaming API
*/

mod auth;
mod codec;
mod session;

pub mod client;
pub mod error;
pub mod legacy;
pub mod message;
pub mod private;
pub mod public;
pub mod registry;
pub mod topic;

pub use client::{BybitWebSocket, MAINNET_STREAM_URL, TESTNET_STREAM_URL};
pub use error::{HandlerResult, WsError};
pub use legacy::{SpotPrivateChannel, SpotQuoteChannel};
pub use private::PrivateChannel;
pub use public::PublicChannel;
pub use registry::{Callback, Unsubscriber};
pub use topic::{AccountEventKey, OrderbookKey, PrivateTopic, TickerKey, Topic, TradeKey};
