/*
[INPUT]:  Subscription keys and raw inbound frame bytes
[OUTPUT]: Control frames per dialect and minimal classification envelopes
[POS]:    WebSocket layer - wire codec shared by every channel kind
[UPDATE]: When the venue changes a control frame shape or envelope field
*/

use serde::Deserialize;
use tokio_tungstenite::tungstenite::Message;

use super::topic::Topic;

/// Subscription operations of the uniform dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Subscribe,
    Unsubscribe,
}

impl Op {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Op::Subscribe => "subscribe",
            Op::Unsubscribe => "unsubscribe",
        }
    }
}

/// `{"op": ..., "args": [topic]}` control frame (uniform dialect).
pub(crate) fn op_frame(op: Op, key: &impl Topic) -> Message {
    let request = serde_json::json!({
        "op": op.as_str(),
        "args": [key.topic()],
    });
    Message::Text(request.to_string().into())
}

/// Discriminator fields of a uniform-dialect inbound frame. Decoded before
/// committing to a payload schema; `success` only appears on command acks.
#[derive(Debug, Deserialize)]
pub(crate) struct V5Envelope {
    pub topic: Option<String>,
    pub success: Option<bool>,
    pub ret_msg: Option<String>,
}

/// Subscription events of the legacy spot dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LegacyEvent {
    Sub,
    Cancel,
}

impl LegacyEvent {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            LegacyEvent::Sub => "sub",
            LegacyEvent::Cancel => "cancel",
        }
    }
}

/// `{symbol, topic, event, params}` control frame (legacy dialect).
pub(crate) fn legacy_trade_frame(event: LegacyEvent, symbol: &str) -> Message {
    let request = serde_json::json!({
        "symbol": symbol,
        "topic": "trade",
        "event": event.as_str(),
        "params": { "binary": false },
    });
    Message::Text(request.to_string().into())
}

/// Discriminator fields of a legacy quote-stream frame.
#[derive(Debug, Deserialize)]
pub(crate) struct QuoteEnvelope {
    pub topic: Option<String>,
    pub event: Option<String>,
}

/// Discriminator field of a legacy private frame shaped as an object; only
/// auth acks matter here. Account pushes instead arrive as one-element
/// arrays of [`SpotEventProbe`].
#[derive(Debug, Deserialize)]
pub(crate) struct SpotAuthProbe {
    pub auth: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotEventProbe {
    #[serde(rename = "e")]
    pub event: Option<String>,
}
