/*
[INPUT]:  Connected socket, outbound frame queue, cancellation token
[OUTPUT]: Driven session until error, cancellation, or peer closure
[POS]:    WebSocket layer - connection lifecycle and read/dispatch loop
[UPDATE]: When changing keepalive timing or shutdown behavior
*/

use std::time::Duration;

use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::WsError;

pub(crate) type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const PING_INTERVAL: Duration = Duration::from_secs(20);
const READ_DEADLINE: Duration = Duration::from_secs(60);
const CLOSE_GRACE: Duration = Duration::from_secs(1);
const OUTBOUND_QUEUE: usize = 100;

/// Frame router for one wire dialect. `route` sees every inbound text
/// frame in socket order; an error return ends the session.
pub(crate) trait Route: Send + Sync {
    async fn route(&self, frame: &str) -> Result<(), WsError>;

    /// Keepalive frame in this dialect's wire format.
    fn ping_frame(&self) -> Message;
}

/// Everything `drive` consumes. Built once per dial and taken by `run`.
pub(crate) struct Connection {
    socket: Socket,
    outbound_rx: mpsc::Receiver<Message>,
    cancel: CancellationToken,
}

/// Shared per-channel state: the dialect router, the outbound queue
/// feeding the single writer, and the one-shot connection slot.
pub(crate) struct ChannelCore<R> {
    route: R,
    outbound_tx: mpsc::Sender<Message>,
    conn: Mutex<Option<Connection>>,
}

impl<R: Route> ChannelCore<R> {
    pub(crate) fn new(route: R, socket: Socket, cancel: CancellationToken) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE);
        Self {
            route,
            outbound_tx,
            conn: Mutex::new(Some(Connection {
                socket,
                outbound_rx,
                cancel,
            })),
        }
    }

    /// Handle for queueing control frames. All writes funnel through the
    /// session loop so there is exactly one socket writer.
    pub(crate) fn outbound(&self) -> mpsc::Sender<Message> {
        self.outbound_tx.clone()
    }

    /// Drives the session to completion. Returns `AlreadyStarted` on a
    /// second call; the connection slot is consumed by the first.
    pub(crate) async fn run(&self) -> Result<(), WsError> {
        let conn = self
            .conn
            .lock()
            .await
            .take()
            .ok_or(WsError::AlreadyStarted)?;
        drive(conn, &self.route).await
    }
}

async fn drive<R: Route>(conn: Connection, route: &R) -> Result<(), WsError> {
    let Connection {
        socket,
        mut outbound_rx,
        cancel,
    } = conn;
    let (mut write, mut read) = socket.split();

    let mut ping = tokio::time::interval_at(Instant::now() + PING_INTERVAL, PING_INTERVAL);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let deadline = tokio::time::sleep(READ_DEADLINE);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("ws session cancelled");
                let _ = write.send(Message::Close(None)).await;
                drain_until_closed(&mut read).await;
                return Ok(());
            }
            _ = ping.tick() => {
                write.send(route.ping_frame()).await?;
            }
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(frame) => write.send(frame).await?,
                    None => {
                        // Every sender dropped; treat like cancellation.
                        let _ = write.send(Message::Close(None)).await;
                        drain_until_closed(&mut read).await;
                        return Ok(());
                    }
                }
            }
            incoming = read.next() => {
                // Any inbound traffic proves the peer is alive.
                deadline.as_mut().reset(Instant::now() + READ_DEADLINE);
                match incoming {
                    Some(Ok(Message::Close(frame))) => {
                        debug!(?frame, "ws peer closed");
                        let _ = write.send(Message::Close(None)).await;
                        return Ok(());
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        write.send(Message::Pong(payload)).await?;
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(message)) => {
                        if let Ok(text) = message.to_text() {
                            route.route(text).await?;
                        }
                    }
                    Some(Err(err)) => return Err(WsError::Transport(err)),
                    None => {
                        debug!("ws stream ended");
                        return Ok(());
                    }
                }
            }
            _ = &mut deadline => {
                warn!(timeout_secs = READ_DEADLINE.as_secs(), "ws read deadline expired");
                return Err(WsError::Stalled);
            }
        }
    }
}

/// After our close frame goes out, give the peer a short window to
/// acknowledge before tearing the socket down.
async fn drain_until_closed(read: &mut SplitStream<Socket>) {
    let drain = async {
        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Close(_)) | Err(_) => break,
                _ => {}
            }
        }
    };
    let _ = tokio::time::timeout(CLOSE_GRACE, drain).await;
}
