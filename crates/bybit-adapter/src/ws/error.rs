/*
[INPUT]:  Failure modes of the subscription and dispatch machinery
[OUTPUT]: Structured websocket error type with closure classification
[POS]:    WebSocket layer - error taxonomy shared by every channel kind
[UPDATE]: When adding new failure modes or changing fatality rules
*/

use thiserror::Error;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::error::ProtocolError;

/// Outcome of a user-supplied subscription handler. Returning an error is
/// fatal to the session: the dispatch loop stops and tears the socket down.
pub type HandlerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Error type for websocket sessions
#[derive(Error, Debug)]
pub enum WsError {
    /// Subscribe for a topic that already has a live handler; nothing is
    /// sent on the wire and the existing handler stays registered
    #[error("a handler is already registered for topic `{topic}`")]
    AlreadyRegistered { topic: String },

    /// Inbound frame matched a topic with no registered handler
    #[error("no handler registered for topic `{topic}`")]
    HandlerNotFound { topic: String },

    /// Malformed frame body
    #[error("failed to decode frame: {0}")]
    Decode(#[from] serde_json::Error),

    /// Server rejected the authentication frame
    #[error("authentication rejected: {message}")]
    AuthFailed { message: String },

    /// No frame arrived within the read deadline
    #[error("no frame received within the read deadline")]
    Stalled,

    /// Underlying websocket transport failed or closed
    #[error("websocket transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// Outbound queue is gone because the session already exited
    #[error("session is no longer running")]
    ChannelClosed,

    /// The channel's session loop was already started
    #[error("session already started")]
    AlreadyStarted,

    /// A registered handler returned an error
    #[error("handler failed for topic `{topic}`: {source}")]
    Handler {
        topic: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Private channel was requested without API credentials
    #[error("private channel requires API credentials")]
    MissingCredentials,
}

impl WsError {
    /// True when the session ended because the peer closed the connection,
    /// as opposed to failing. Callers use this to tell planned closure from
    /// an error worth redialing over.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            WsError::Transport(tungstenite::Error::ConnectionClosed)
                | WsError::Transport(tungstenite::Error::AlreadyClosed)
                | WsError::Transport(tungstenite::Error::Protocol(
                    ProtocolError::ResetWithoutClosingHandshake
                ))
        )
    }
}
