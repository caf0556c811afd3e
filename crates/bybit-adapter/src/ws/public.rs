/*
[INPUT]:  Public stream socket and topic subscriptions
[OUTPUT]: Routed order book and ticker callbacks
[POS]:    WebSocket layer - public market-data channel
[UPDATE]: When adding public topics or changing routing rules
*/

use std::sync::Arc;

use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::codec::{op_frame, Op, V5Envelope};
use super::error::{HandlerResult, WsError};
use super::message::{OrderbookUpdate, TickerUpdate};
use super::registry::{HandlerMap, Unsubscriber};
use super::session::{ChannelCore, Route, Socket};
use super::topic::{OrderbookKey, TickerKey, Topic};

/// One public market-data socket. Cheap to clone; all clones share the
/// same registry and outbound queue.
pub struct PublicChannel {
    core: Arc<ChannelCore<PublicRouter>>,
    orderbook: HandlerMap<OrderbookKey, OrderbookUpdate>,
    tickers: HandlerMap<TickerKey, TickerUpdate>,
    outbound: tokio::sync::mpsc::Sender<Message>,
}

impl Clone for PublicChannel {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            orderbook: self.orderbook.clone(),
            tickers: self.tickers.clone(),
            outbound: self.outbound.clone(),
        }
    }
}

impl PublicChannel {
    pub(crate) fn new(socket: Socket, cancel: CancellationToken) -> Self {
        let orderbook = HandlerMap::new();
        let tickers = HandlerMap::new();
        let router = PublicRouter {
            orderbook: orderbook.clone(),
            tickers: tickers.clone(),
        };
        let core = Arc::new(ChannelCore::new(router, socket, cancel));
        let outbound = core.outbound();
        Self {
            core,
            orderbook,
            tickers,
            outbound,
        }
    }

    /// Drives the session until error, cancellation, or peer closure.
    /// Subscribe calls may run concurrently from other tasks.
    pub async fn run(&self) -> Result<(), WsError> {
        self.core.run().await
    }

    /// Subscribe to `orderbook.<depth>.<symbol>` deltas and snapshots.
    pub async fn subscribe_orderbook<F>(
        &self,
        depth: u32,
        symbol: impl Into<String>,
        callback: F,
    ) -> Result<Unsubscriber<OrderbookKey, OrderbookUpdate>, WsError>
    where
        F: FnMut(OrderbookUpdate) -> HandlerResult + Send + 'static,
    {
        let key = OrderbookKey::new(depth, symbol);
        self.orderbook.add(key.clone(), Box::new(callback)).await?;
        if self
            .outbound
            .send(op_frame(Op::Subscribe, &key))
            .await
            .is_err()
        {
            self.orderbook.remove(&key).await;
            return Err(WsError::ChannelClosed);
        }
        info!(topic = %key.topic(), "ws subscribe queued");
        let frame = op_frame(Op::Unsubscribe, &key);
        Ok(Unsubscriber::new(
            key,
            Some(frame),
            self.orderbook.clone(),
            self.outbound.clone(),
        ))
    }

    /// Subscribe to `tickers.<symbol>` pushes.
    pub async fn subscribe_ticker<F>(
        &self,
        symbol: impl Into<String>,
        callback: F,
    ) -> Result<Unsubscriber<TickerKey, TickerUpdate>, WsError>
    where
        F: FnMut(TickerUpdate) -> HandlerResult + Send + 'static,
    {
        let key = TickerKey::new(symbol);
        self.tickers.add(key.clone(), Box::new(callback)).await?;
        if self
            .outbound
            .send(op_frame(Op::Subscribe, &key))
            .await
            .is_err()
        {
            self.tickers.remove(&key).await;
            return Err(WsError::ChannelClosed);
        }
        info!(topic = %key.topic(), "ws subscribe queued");
        let frame = op_frame(Op::Unsubscribe, &key);
        Ok(Unsubscriber::new(
            key,
            Some(frame),
            self.tickers.clone(),
            self.outbound.clone(),
        ))
    }
}

pub(crate) struct PublicRouter {
    orderbook: HandlerMap<OrderbookKey, OrderbookUpdate>,
    tickers: HandlerMap<TickerKey, TickerUpdate>,
}

impl Route for PublicRouter {
    async fn route(&self, frame: &str) -> Result<(), WsError> {
        let envelope: V5Envelope = serde_json::from_str(frame)?;

        if let Some(success) = envelope.success {
            if !success {
                return Err(WsError::AuthFailed {
                    message: envelope.ret_msg.unwrap_or_default(),
                });
            }
            debug!("ws command acknowledged");
            return Ok(());
        }

        let Some(topic) = envelope.topic.as_deref() else {
            debug!("ws frame without topic dropped");
            return Ok(());
        };

        if topic.starts_with("orderbook.") {
            let update: OrderbookUpdate = serde_json::from_str(frame)?;
            let key = update.key();
            self.orderbook.dispatch(&key, update).await
        } else if topic.starts_with("tickers.") {
            let update: TickerUpdate = serde_json::from_str(frame)?;
            let key = update.key();
            self.tickers.dispatch(&key, update).await
        } else {
            debug!(topic, "ws topic unrecognized, frame dropped");
            Ok(())
        }
    }

    fn ping_frame(&self) -> Message {
        Message::Text(serde_json::json!({"op": "ping"}).to_string().into())
    }
}
