/*
[INPUT]:  Symbol identifier (e.g., "BTCUSDT")
[OUTPUT]: Live order book and ticker updates
[POS]:    Examples - public stream subscriptions
[UPDATE]: When the public channel API changes
*/

use bybit_adapter::*;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

/// Example: subscribe to public market-data streams (no authentication).
#[tokio::main]
async fn main() {
    println!("=== Bybit Market Stream Example ===\n");

    let ws = BybitWebSocket::new();
    let cancel = CancellationToken::new();

    let channel = match ws.public(Category::Linear, cancel.clone()).await {
        Ok(channel) => channel,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return;
        }
    };
    println!("✓ Connected to the linear public stream");

    let session = channel.clone();
    let driver = tokio::spawn(async move { session.run().await });

    let orderbook = channel
        .subscribe_orderbook(50, "BTCUSDT", |update| {
            println!(
                "orderbook {} {}: {} bids / {} asks",
                update.data.symbol,
                update.update_type,
                update.data.bids.len(),
                update.data.asks.len()
            );
            Ok(())
        })
        .await
        .expect("subscribe orderbook");
    println!("✓ Subscribed to orderbook.50.BTCUSDT");

    channel
        .subscribe_ticker("BTCUSDT", |update| {
            println!("ticker {}: last {}", update.data.symbol, update.data.last_price);
            Ok(())
        })
        .await
        .expect("subscribe ticker");
    println!("✓ Subscribed to tickers.BTCUSDT\n");

    sleep(Duration::from_secs(10)).await;

    // Drop one topic, keep the other running a little longer.
    orderbook.unsubscribe().await.expect("unsubscribe orderbook");
    println!("\n✓ Unsubscribed from the order book");
    sleep(Duration::from_secs(5)).await;

    cancel.cancel();
    match driver.await.expect("session task") {
        Ok(()) => println!("\n✓ Session closed cleanly"),
        Err(e) if e.is_closed() => println!("\n✓ Peer closed the connection"),
        Err(e) => eprintln!("\n✗ Session failed: {}", e),
    }
}
