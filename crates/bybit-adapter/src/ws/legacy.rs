/*
[INPUT]:  Legacy spot stream sockets and subscriptions
[OUTPUT]: Routed trade tick and account event callbacks
[POS]:    WebSocket layer - legacy spot quote and private channels
[UPDATE]: When the legacy spot wire format changes
*/

use std::sync::Arc;

use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::codec::{legacy_trade_frame, LegacyEvent, QuoteEnvelope, SpotAuthProbe, SpotEventProbe};
use super::error::{HandlerResult, WsError};
use super::message::{AccountInfoUpdate, TradeUpdate};
use super::registry::{HandlerMap, Unsubscriber};
use super::session::{ChannelCore, Route, Socket};
use super::topic::{AccountEventKey, Topic, TradeKey};

fn legacy_ping_frame() -> Message {
    let frame = serde_json::json!({"ping": chrono::Utc::now().timestamp_millis()});
    Message::Text(frame.to_string().into())
}

/// Legacy spot quote socket (`/spot/quote/ws/v2`).
pub struct SpotQuoteChannel {
    core: Arc<ChannelCore<SpotQuoteRouter>>,
    trades: HandlerMap<TradeKey, TradeUpdate>,
    outbound: tokio::sync::mpsc::Sender<Message>,
}

impl Clone for SpotQuoteChannel {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            trades: self.trades.clone(),
            outbound: self.outbound.clone(),
        }
    }
}

impl SpotQuoteChannel {
    pub(crate) fn new(socket: Socket, cancel: CancellationToken) -> Self {
        let trades = HandlerMap::new();
        let router = SpotQuoteRouter {
            trades: trades.clone(),
        };
        let core = Arc::new(ChannelCore::new(router, socket, cancel));
        let outbound = core.outbound();
        Self {
            core,
            trades,
            outbound,
        }
    }

    /// Drives the session until error, cancellation, or peer closure.
    pub async fn run(&self) -> Result<(), WsError> {
        self.core.run().await
    }

    /// Subscribe to the `trade` topic for one symbol.
    pub async fn subscribe_trade<F>(
        &self,
        symbol: impl Into<String>,
        callback: F,
    ) -> Result<Unsubscriber<TradeKey, TradeUpdate>, WsError>
    where
        F: FnMut(TradeUpdate) -> HandlerResult + Send + 'static,
    {
        let key = TradeKey::new(symbol);
        self.trades.add(key.clone(), Box::new(callback)).await?;
        let frame = legacy_trade_frame(LegacyEvent::Sub, &key.symbol);
        if self.outbound.send(frame).await.is_err() {
            self.trades.remove(&key).await;
            return Err(WsError::ChannelClosed);
        }
        info!(topic = %key.topic(), "ws subscribe queued");
        let frame = legacy_trade_frame(LegacyEvent::Cancel, &key.symbol);
        Ok(Unsubscriber::new(
            key,
            Some(frame),
            self.trades.clone(),
            self.outbound.clone(),
        ))
    }
}

pub(crate) struct SpotQuoteRouter {
    trades: HandlerMap<TradeKey, TradeUpdate>,
}

impl Route for SpotQuoteRouter {
    async fn route(&self, frame: &str) -> Result<(), WsError> {
        let envelope: QuoteEnvelope = serde_json::from_str(frame)?;

        // Subscription acks echo the request with `event: "sub"`. Data
        // pushes carry no event field.
        if envelope.event.as_deref() == Some("sub") {
            debug!("ws subscription acknowledged");
            return Ok(());
        }

        match envelope.topic.as_deref() {
            Some("trade") => {
                let update: TradeUpdate = serde_json::from_str(frame)?;
                let key = update.key();
                self.trades.dispatch(&key, update).await
            }
            _ => {
                debug!("ws frame unrecognized, dropped");
                Ok(())
            }
        }
    }

    fn ping_frame(&self) -> Message {
        legacy_ping_frame()
    }
}

/// The one event type this channel routes. The stream also pushes
/// execution and ticket events; those fall through untouched.
const ACCOUNT_INFO_EVENT: &str = "outboundAccountInfo";

/// Legacy spot private socket (`/spot/ws`). Account pushes arrive as
/// one-element arrays; auth acks as bare objects.
pub struct SpotPrivateChannel {
    core: Arc<ChannelCore<SpotPrivateRouter>>,
    accounts: HandlerMap<AccountEventKey, AccountInfoUpdate>,
    outbound: tokio::sync::mpsc::Sender<Message>,
}

impl std::fmt::Debug for SpotPrivateChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotPrivateChannel").finish_non_exhaustive()
    }
}

impl Clone for SpotPrivateChannel {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            accounts: self.accounts.clone(),
            outbound: self.outbound.clone(),
        }
    }
}

impl SpotPrivateChannel {
    pub(crate) fn new(socket: Socket, cancel: CancellationToken) -> Self {
        let accounts = HandlerMap::new();
        let router = SpotPrivateRouter {
            accounts: accounts.clone(),
        };
        let core = Arc::new(ChannelCore::new(router, socket, cancel));
        let outbound = core.outbound();
        Self {
            core,
            accounts,
            outbound,
        }
    }

    /// Drives the session until error, cancellation, or peer closure.
    pub async fn run(&self) -> Result<(), WsError> {
        self.core.run().await
    }

    /// Register for `outboundAccountInfo` pushes. The stream starts on
    /// auth; no subscribe frame goes out and unsubscribe only drops the
    /// handler.
    pub async fn subscribe_account_info<F>(
        &self,
        callback: F,
    ) -> Result<Unsubscriber<AccountEventKey, AccountInfoUpdate>, WsError>
    where
        F: FnMut(AccountInfoUpdate) -> HandlerResult + Send + 'static,
    {
        let key = AccountEventKey::new(ACCOUNT_INFO_EVENT);
        self.accounts.add(key.clone(), Box::new(callback)).await?;
        info!(topic = %key.topic(), "ws handler registered");
        Ok(Unsubscriber::new(
            key,
            None,
            self.accounts.clone(),
            self.outbound.clone(),
        ))
    }
}

pub(crate) struct SpotPrivateRouter {
    accounts: HandlerMap<AccountEventKey, AccountInfoUpdate>,
}

impl Route for SpotPrivateRouter {
    async fn route(&self, frame: &str) -> Result<(), WsError> {
        if frame.trim_start().starts_with('[') {
            let probes: Vec<SpotEventProbe> = serde_json::from_str(frame)?;
            let Some(event) = probes.first().and_then(|probe| probe.event.clone()) else {
                debug!("ws event frame without type dropped");
                return Ok(());
            };
            // The stream multiplexes execution reports and ticket events
            // next to account info; only the routed set may be fatal.
            if event != ACCOUNT_INFO_EVENT {
                debug!(event, "ws event unrecognized, frame dropped");
                return Ok(());
            }
            let update: AccountInfoUpdate = serde_json::from_str(frame)?;
            let key = AccountEventKey::new(event);
            return self.accounts.dispatch(&key, update).await;
        }

        let probe: SpotAuthProbe = serde_json::from_str(frame)?;
        if let Some(auth) = probe.auth {
            if auth == "success" {
                debug!("ws auth acknowledged");
                return Ok(());
            }
            return Err(WsError::AuthFailed { message: auth });
        }
        debug!("ws frame unrecognized, dropped");
        Ok(())
    }

    fn ping_frame(&self) -> Message {
        legacy_ping_frame()
    }
}
