/*
[INPUT]:  API credentials
[OUTPUT]: Signed `auth` control frame for private streams
[POS]:    WebSocket layer - pre-subscription authentication
[UPDATE]: When the venue changes the websocket login payload
*/

use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

use crate::http::sign::hmac_sha256_hex;
use crate::http::Credentials;

/// Signature lifetime granted past the moment of signing.
const AUTH_WINDOW_MS: i64 = 10_000;

/// Builds the login frame sent before any private subscription. The
/// signature covers the literal string `GET/realtime{expires}`.
pub(crate) fn auth_frame(credentials: &Credentials) -> Message {
    let expires = chrono::Utc::now().timestamp_millis() + AUTH_WINDOW_MS;
    build_auth_frame(credentials, expires)
}

fn build_auth_frame(credentials: &Credentials, expires: i64) -> Message {
    let signature = hmac_sha256_hex(
        &credentials.api_secret,
        &format!("GET/realtime{expires}"),
    );
    let frame = json!({
        "op": "auth",
        "args": [credentials.api_key, expires, signature],
    });
    Message::text(frame.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
        }
    }

    #[test]
    fn test_auth_frame_shape() {
        let frame = build_auth_frame(&credentials(), 1_700_000_010_000);
        let value: serde_json::Value =
            serde_json::from_str(frame.to_text().unwrap()).unwrap();

        assert_eq!(value["op"], "auth");
        assert_eq!(value["args"][0], "test-key");
        assert_eq!(value["args"][1], 1_700_000_010_000_i64);

        let expected =
            hmac_sha256_hex("test-secret", "GET/realtime1700000010000");
        assert_eq!(value["args"][2], expected.as_str());
    }

    #[test]
    fn test_auth_frame_expires_in_the_future() {
        let frame = auth_frame(&credentials());
        let value: serde_json::Value =
            serde_json::from_str(frame.to_text().unwrap()).unwrap();
        let expires = value["args"][1].as_i64().unwrap();
        assert!(expires > chrono::Utc::now().timestamp_millis());
    }
}
