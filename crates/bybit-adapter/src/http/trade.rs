/*
[INPUT]:  Order requests with body signature headers
[OUTPUT]: Order responses and confirmation
[POS]:    HTTP layer - trading endpoints (require body signature)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use crate::http::{BybitClient, Result};
use crate::types::{CancelOrderRequest, CreateOrderRequest, OrderRef};

impl BybitClient {
    /// Place an order
    ///
    /// POST /v5/order/create
    /// Requires: X-BAPI-* signature headers over the JSON body
    pub async fn create_order(&self, req: &CreateOrderRequest) -> Result<OrderRef> {
        self.post_signed("/v5/order/create", req).await
    }

    /// Cancel an open order by order id or order link id
    ///
    /// POST /v5/order/cancel
    /// Requires: X-BAPI-* signature headers over the JSON body
    pub async fn cancel_order(&self, req: &CancelOrderRequest) -> Result<OrderRef> {
        self.post_signed("/v5/order/cancel", req).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::http::{BybitClient, ClientConfig, Credentials};
    use crate::types::{Category, CreateOrderRequest, Side};

    #[tokio::test]
    async fn test_create_order_sends_signature_headers() {
        let server = MockServer::start().await;
        let mock_response = r#"{
            "retCode": 0,
            "retMsg": "OK",
            "result": {
                "orderId": "1321003749386327552",
                "orderLinkId": "spot-test-01"
            },
            "time": 1672211918471
        }"#;

        let _mock = Mock::given(method("POST"))
            .and(path("/v5/order/create"))
            .and(header_exists("X-BAPI-API-KEY"))
            .and(header_exists("X-BAPI-TIMESTAMP"))
            .and(header_exists("X-BAPI-SIGN"))
            .and(body_partial_json(serde_json::json!({
                "category": "linear",
                "symbol": "BTCUSDT",
                "side": "Buy",
                "orderType": "Market",
                "qty": "0.01"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(mock_response, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = BybitClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
            .with_credentials(Credentials::new("test-key", "test-secret"));

        let req = CreateOrderRequest::market(
            Category::Linear,
            "BTCUSDT",
            Side::Buy,
            "0.01".parse().unwrap(),
        );
        let order = client.create_order(&req).await.expect("create_order failed");
        assert_eq!(order.order_id, "1321003749386327552");
        assert_eq!(order.order_link_id, "spot-test-01");
    }

    #[tokio::test]
    async fn test_create_order_without_credentials() {
        let client = BybitClient::new().expect("client init");
        let req = CreateOrderRequest::market(
            Category::Linear,
            "BTCUSDT",
            Side::Buy,
            "0.01".parse().unwrap(),
        );
        let err = client.create_order(&req).await.unwrap_err();
        assert!(matches!(err, crate::http::BybitError::MissingCredentials));
    }
}
