/*
[INPUT]:  Authenticated stream socket and private topic subscriptions
[OUTPUT]: Routed order, position, and wallet callbacks
[POS]:    WebSocket layer - private account-data channel
[UPDATE]: When adding private topics or changing routing rules
*/

use std::sync::Arc;

use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::codec::{op_frame, Op, V5Envelope};
use super::error::{HandlerResult, WsError};
use super::message::{OrderUpdate, PositionUpdate, WalletUpdate};
use super::registry::{HandlerMap, Unsubscriber};
use super::session::{ChannelCore, Route, Socket};
use super::topic::PrivateTopic;

/// One authenticated account-data socket. The login frame is written
/// before this channel is handed out, so subscribes never race auth.
pub struct PrivateChannel {
    core: Arc<ChannelCore<PrivateRouter>>,
    orders: HandlerMap<PrivateTopic, OrderUpdate>,
    positions: HandlerMap<PrivateTopic, PositionUpdate>,
    wallets: HandlerMap<PrivateTopic, WalletUpdate>,
    outbound: tokio::sync::mpsc::Sender<Message>,
}

impl std::fmt::Debug for PrivateChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateChannel").finish_non_exhaustive()
    }
}

impl Clone for PrivateChannel {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            orders: self.orders.clone(),
            positions: self.positions.clone(),
            wallets: self.wallets.clone(),
            outbound: self.outbound.clone(),
        }
    }
}

impl PrivateChannel {
    pub(crate) fn new(socket: Socket, cancel: CancellationToken) -> Self {
        let orders = HandlerMap::new();
        let positions = HandlerMap::new();
        let wallets = HandlerMap::new();
        let router = PrivateRouter {
            orders: orders.clone(),
            positions: positions.clone(),
            wallets: wallets.clone(),
        };
        let core = Arc::new(ChannelCore::new(router, socket, cancel));
        let outbound = core.outbound();
        Self {
            core,
            orders,
            positions,
            wallets,
            outbound,
        }
    }

    /// Drives the session until error, cancellation, or peer closure.
    pub async fn run(&self) -> Result<(), WsError> {
        self.core.run().await
    }

    pub async fn subscribe_order<F>(
        &self,
        callback: F,
    ) -> Result<Unsubscriber<PrivateTopic, OrderUpdate>, WsError>
    where
        F: FnMut(OrderUpdate) -> HandlerResult + Send + 'static,
    {
        Self::subscribe(
            &self.orders,
            &self.outbound,
            PrivateTopic::Order,
            Box::new(callback),
        )
        .await
    }

    pub async fn subscribe_position<F>(
        &self,
        callback: F,
    ) -> Result<Unsubscriber<PrivateTopic, PositionUpdate>, WsError>
    where
        F: FnMut(PositionUpdate) -> HandlerResult + Send + 'static,
    {
        Self::subscribe(
            &self.positions,
            &self.outbound,
            PrivateTopic::Position,
            Box::new(callback),
        )
        .await
    }

    pub async fn subscribe_wallet<F>(
        &self,
        callback: F,
    ) -> Result<Unsubscriber<PrivateTopic, WalletUpdate>, WsError>
    where
        F: FnMut(WalletUpdate) -> HandlerResult + Send + 'static,
    {
        Self::subscribe(
            &self.wallets,
            &self.outbound,
            PrivateTopic::Wallet,
            Box::new(callback),
        )
        .await
    }

    async fn subscribe<T>(
        handlers: &HandlerMap<PrivateTopic, T>,
        outbound: &tokio::sync::mpsc::Sender<Message>,
        key: PrivateTopic,
        callback: super::registry::Callback<T>,
    ) -> Result<Unsubscriber<PrivateTopic, T>, WsError> {
        handlers.add(key, callback).await?;
        if outbound.send(op_frame(Op::Subscribe, &key)).await.is_err() {
            handlers.remove(&key).await;
            return Err(WsError::ChannelClosed);
        }
        info!(topic = key.as_str(), "ws subscribe queued");
        let frame = op_frame(Op::Unsubscribe, &key);
        Ok(Unsubscriber::new(
            key,
            Some(frame),
            handlers.clone(),
            outbound.clone(),
        ))
    }
}

pub(crate) struct PrivateRouter {
    orders: HandlerMap<PrivateTopic, OrderUpdate>,
    positions: HandlerMap<PrivateTopic, PositionUpdate>,
    wallets: HandlerMap<PrivateTopic, WalletUpdate>,
}

impl Route for PrivateRouter {
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

        let topic = envelope
            .topic
            .as_deref()
            .and_then(PrivateTopic::parse);
        match topic {
            Some(key @ PrivateTopic::Order) => {
                let update: OrderUpdate = serde_json::from_str(frame)?;
                self.orders.dispatch(&key, update).await
            }
            Some(key @ PrivateTopic::Position) => {
                let update: PositionUpdate = serde_json::from_str(frame)?;
                self.positions.dispatch(&key, update).await
            }
            Some(key @ PrivateTopic::Wallet) => {
                let update: WalletUpdate = serde_json::from_str(frame)?;
                self.wallets.dispatch(&key, update).await
            }
            None => {
                debug!("ws topic unrecognized, frame dropped");
                Ok(())
            }
        }
    }

    fn ping_frame(&self) -> Message {
        Message::Text(serde_json::json!({"op": "ping"}).to_string().into())
    }
}
