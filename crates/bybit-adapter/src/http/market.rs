/*
[INPUT]:  Symbol identifiers and query parameters
[OUTPUT]: Market data (tickers, orderbook snapshots)
[POS]:    HTTP layer - public market data endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use crate::http::{BybitClient, Result};
use crate::types::{Category, OrderbookResult, TickersResult};

impl BybitClient {
    /// Latest ticker snapshot for one symbol, or every symbol of a category
    ///
    /// GET /v5/market/tickers?category={category}&symbol={symbol}
    pub async fn get_tickers(
        &self,
        category: Category,
        symbol: Option<&str>,
    ) -> Result<TickersResult> {
        let mut query = vec![("category", category.to_string())];
        if let Some(symbol) = symbol {
            query.push(("symbol", symbol.to_string()));
        }
        self.get_public("/v5/market/tickers", &query).await
    }

    /// Orderbook snapshot
    ///
    /// GET /v5/market/orderbook?category={category}&symbol={symbol}&limit={limit}
    pub async fn get_orderbook(
        &self,
        category: Category,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<OrderbookResult> {
        let mut query = vec![
            ("category", category.to_string()),
            ("symbol", symbol.to_string()),
        ];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.get_public("/v5/market/orderbook", &query).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::http::{BybitClient, ClientConfig};
    use crate::types::Category;

    #[tokio::test]
    async fn test_get_orderbook() {
        let server = MockServer::start().await;
        let mock_response = r#"{
            "retCode": 0,
            "retMsg": "OK",
            "result": {
                "s": "BTCUSDT",
                "b": [["16493.50", "0.006"], ["16493.00", "0.100"]],
                "a": [["16611.00", "0.029"]],
                "ts": 1672765737733,
                "u": 18521288
            },
            "time": 1672765737734
        }"#;

        let _mock = Mock::given(method("GET"))
            .and(path("/v5/market/orderbook"))
            .and(query_param("category", "spot"))
            .and(query_param("symbol", "BTCUSDT"))
            .and(query_param("limit", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(mock_response, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = BybitClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init");

        let book = client
            .get_orderbook(Category::Spot, "BTCUSDT", Some(2))
            .await
            .expect("get_orderbook failed");

        assert_eq!(book.symbol, "BTCUSDT");
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.bids[0].price(), "16493.50".parse().unwrap());
        assert_eq!(book.update_id, 18521288);
    }

    #[tokio::test]
    async fn test_get_tickers_api_error() {
        let server = MockServer::start().await;
        let mock_response = r#"{
            "retCode": 10001,
            "retMsg": "Invalid category",
            "result": {},
            "time": 1672765737734
        }"#;

        let _mock = Mock::given(method("GET"))
            .and(path("/v5/market/tickers"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(mock_response, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = BybitClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init");

        let err = client
            .get_tickers(Category::Linear, Some("BTCUSDT"))
            .await
            .unwrap_err();

        match err {
            crate::http::BybitError::Api { code, message } => {
                assert_eq!(code, 10001);
                assert_eq!(message, "Invalid category");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
