/*
[INPUT]:  Stream base URL and optional API credentials
[OUTPUT]: Dialed public, private, and legacy spot channels
[POS]:    WebSocket layer - connection facade
[UPDATE]: When adding stream endpoints or changing dial behavior
*/

use futures_util::SinkExt;
use tokio_tungstenite::connect_async;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::auth::auth_frame;
use super::error::WsError;
use super::legacy::{SpotPrivateChannel, SpotQuoteChannel};
use super::private::PrivateChannel;
use super::public::PublicChannel;
use super::session::Socket;
use crate::http::Credentials;
use crate::types::Category;

pub const MAINNET_STREAM_URL: &str = "wss://stream.bybit.com";
pub const TESTNET_STREAM_URL: &str = "wss://stream-testnet.bybit.com";

/// Entry point for the streaming API. Dials one socket per channel; each
/// channel multiplexes its topics over that socket.
#[derive(Debug, Clone)]
pub struct BybitWebSocket {
    base_url: String,
    credentials: Option<Credentials>,
}

impl BybitWebSocket {
    pub fn new() -> Self {
        Self::with_base_url(MAINNET_STREAM_URL)
    }

    pub fn testnet() -> Self {
        Self::with_base_url(TESTNET_STREAM_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, api_key: String, api_secret: String) -> Self {
        self.credentials = Some(Credentials {
            api_key,
            api_secret,
        });
        self
    }

    /// Public market-data channel for one product category.
    pub async fn public(
        &self,
        category: Category,
        cancel: CancellationToken,
    ) -> Result<PublicChannel, WsError> {
        let socket = self
            .dial(&format!("/v5/public/{}", category.as_str()))
            .await?;
        Ok(PublicChannel::new(socket, cancel))
    }

    /// Private account-data channel. The signed login frame goes out
    /// before the channel is returned, so it always precedes the first
    /// subscribe on the wire.
    pub async fn private(&self, cancel: CancellationToken) -> Result<PrivateChannel, WsError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(WsError::MissingCredentials)?;
        let mut socket = self.dial("/v5/private").await?;
        socket.send(auth_frame(credentials)).await?;
        Ok(PrivateChannel::new(socket, cancel))
    }

    /// Legacy spot quote channel.
    pub async fn spot_quote(&self, cancel: CancellationToken) -> Result<SpotQuoteChannel, WsError> {
        let socket = self.dial("/spot/quote/ws/v2").await?;
        Ok(SpotQuoteChannel::new(socket, cancel))
    }

    /// Legacy spot private channel. Auth frame first, same as `private`.
    pub async fn spot_private(
        &self,
        cancel: CancellationToken,
    ) -> Result<SpotPrivateChannel, WsError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(WsError::MissingCredentials)?;
        let mut socket = self.dial("/spot/ws").await?;
        socket.send(auth_frame(credentials)).await?;
        Ok(SpotPrivateChannel::new(socket, cancel))
    }

    async fn dial(&self, path: &str) -> Result<Socket, WsError> {
        let url = format!("{}{path}", self.base_url);
        let (socket, _response) = connect_async(url.as_str()).await?;
        info!(url, "ws connected");
        Ok(socket)
    }
}

impl Default for BybitWebSocket {
    fn default() -> Self {
        Self::new()
    }
}
