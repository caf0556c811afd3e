/*
[INPUT]:  Symbol identifier and optional API credentials
[OUTPUT]: Market data snapshots and wallet balances
[POS]:    Examples - REST endpoint queries
[UPDATE]: When adding new REST endpoints
*/

use bybit_adapter::*;

/// Example: query REST endpoints. Market data needs no credentials;
/// the wallet query runs only when keys are set.
#[tokio::main]
async fn main() {
    println!("=== Bybit REST Example ===\n");

    let mut client = match BybitClient::testnet() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created\n");

    let symbol = "BTCUSDT";

    println!("Querying tickers for {}...", symbol);
    match client.get_tickers(Category::Linear, Some(symbol)).await {
        Ok(tickers) => {
            for ticker in &tickers.list {
                println!("✓ {}: last {}", ticker.symbol, ticker.last_price);
            }
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying order book for {}...", symbol);
    match client.get_orderbook(Category::Linear, symbol, Some(25)).await {
        Ok(book) => println!(
            "✓ {} bids / {} asks at update {}",
            book.bids.len(),
            book.asks.len(),
            book.update_id
        ),
        Err(e) => println!("✗ Error: {}", e),
    }

    let api_key = std::env::var("BYBIT_API_KEY").unwrap_or_default();
    let api_secret = std::env::var("BYBIT_API_SECRET").unwrap_or_default();
    if api_key.is_empty() || api_secret.is_empty() {
        println!("\nSet BYBIT_API_KEY and BYBIT_API_SECRET to query wallet balances");
        return;
    }
    client.set_credentials(Credentials::new(api_key, api_secret));

    println!("\nQuerying wallet balance...");
    match client.get_wallet_balance(AccountType::Unified, None).await {
        Ok(balance) => {
            for account in &balance.list {
                println!(
                    "✓ {}: total equity {}",
                    account.account_type.as_str(),
                    account.total_equity
                );
            }
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ REST example complete");
}
