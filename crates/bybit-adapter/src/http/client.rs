/*
[INPUT]:  HTTP configuration (base URLs, timeouts, credentials)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::http::error::{BybitError, Result};
use crate::http::sign::RequestSigner;
use crate::types::ApiResponse;

/// Base URLs for the Bybit REST API
const MAINNET_URL: &str = "https://api.bybit.com";
const TESTNET_URL: &str = "https://api-testnet.bybit.com";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Window in milliseconds during which a signed request stays valid.
    pub recv_window: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            recv_window: 5_000,
        }
    }
}

/// API key pair for authenticated REST calls and private websocket channels
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

/// Main HTTP client for the Bybit REST API
#[derive(Debug)]
pub struct BybitClient {
    http_client: Client,
    base_url: Url,
    recv_window: u64,
    signer: Option<RequestSigner>,
}

impl BybitClient {
    /// Create a new mainnet client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new mainnet client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, MAINNET_URL)
    }

    /// Create a new testnet client with default configuration
    pub fn testnet() -> Result<Self> {
        Self::with_config_and_base_url(ClientConfig::default(), TESTNET_URL)
    }

    /// Create a client against an arbitrary base URL (testnet, mock server)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            recv_window: config.recv_window,
            signer: None,
        })
    }

    /// Set credentials for signed endpoints
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.signer = Some(RequestSigner::new(
            credentials.api_key,
            credentials.api_secret,
        ));
    }

    /// Builder-style variant of [`Self::set_credentials`]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.set_credentials(credentials);
        self
    }

    /// GET against a public endpoint
    pub(crate) async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.base_url.join(path)?;
        let builder = self.http_client.get(url).query(query);
        self.send(builder).await
    }

    /// GET against a signed endpoint; the signature covers the query string
    pub(crate) async fn get_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let signer = self.signer.as_ref().ok_or(BybitError::MissingCredentials)?;
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        // Sign the percent-encoded query exactly as the URL carries it, so
        // the signed bytes and the sent bytes cannot diverge.
        let query_string = url.query().unwrap_or_default().to_string();
        let builder = self.http_client.get(url);
        let builder = attach_auth_headers(builder, signer, self.recv_window, &query_string);
        self.send(builder).await
    }

    /// POST against a signed endpoint; the signature covers the JSON body
    pub(crate) async fn post_signed<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let signer = self.signer.as_ref().ok_or(BybitError::MissingCredentials)?;
        let url = self.base_url.join(path)?;
        let payload = serde_json::to_string(body)?;
        let builder = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.clone());
        let builder = attach_auth_headers(builder, signer, self.recv_window, &payload);
        self.send(builder).await
    }

    /// Execute a request and unwrap the common response envelope
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Err(BybitError::RateLimit { retry_after });
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(BybitError::api_error(status, body));
        }

        // Failure envelopes ship a placeholder `result`, so the typed payload
        // is only decoded after the retCode check passes.
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(&body)?;
        if envelope.ret_code != 0 {
            debug!(ret_code = envelope.ret_code, ret_msg = %envelope.ret_msg, "API call rejected");
            return Err(BybitError::Api {
                code: envelope.ret_code,
                message: envelope.ret_msg,
            });
        }

        let result = envelope
            .result
            .ok_or_else(|| BybitError::InvalidResponse("envelope is missing `result`".to_string()))?;
        Ok(serde_json::from_value(result)?)
    }
}

fn attach_auth_headers(
    builder: RequestBuilder,
    signer: &RequestSigner,
    recv_window: u64,
    payload: &str,
) -> RequestBuilder {
    let timestamp = Utc::now().timestamp_millis();
    let signature = signer.sign(timestamp, recv_window, payload);
    builder
        .header("X-BAPI-API-KEY", signer.api_key())
        .header("X-BAPI-TIMESTAMP", timestamp.to_string())
        .header("X-BAPI-RECV-WINDOW", recv_window.to_string())
        .header("X-BAPI-SIGN", signature)
}
