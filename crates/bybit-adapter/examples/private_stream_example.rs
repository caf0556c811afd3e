/*
[INPUT]:  BYBIT_API_KEY / BYBIT_API_SECRET environment variables
[OUTPUT]: Live order, position, and wallet updates
[POS]:    Examples - authenticated stream subscriptions
[UPDATE]: When the private channel API changes
*/

use bybit_adapter::*;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

/// Example: subscribe to the authenticated account stream.
#[tokio::main]
async fn main() {
    println!("=== Bybit Private Stream Example ===\n");

    let api_key = std::env::var("BYBIT_API_KEY").unwrap_or_default();
    let api_secret = std::env::var("BYBIT_API_SECRET").unwrap_or_default();
    if api_key.is_empty() || api_secret.is_empty() {
        eprintln!("Set BYBIT_API_KEY and BYBIT_API_SECRET to run this example");
        return;
    }

    let ws = BybitWebSocket::testnet().with_credentials(api_key, api_secret);
    let cancel = CancellationToken::new();

    let channel = match ws.private(cancel.clone()).await {
        Ok(channel) => channel,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return;
        }
    };
    println!("✓ Connected and authenticated");

    let session = channel.clone();
    let driver = tokio::spawn(async move { session.run().await });

    channel
        .subscribe_order(|update| {
            for order in &update.data {
                println!(
                    "order {} {}: {} ({})",
                    order.symbol, order.order_id, order.order_status, order.side
                );
            }
            Ok(())
        })
        .await
        .expect("subscribe order");

    channel
        .subscribe_position(|update| {
            for position in &update.data {
                println!("position {}: size {}", position.symbol, position.size);
            }
            Ok(())
        })
        .await
        .expect("subscribe position");

    channel
        .subscribe_wallet(|update| {
            for wallet in &update.data {
                println!(
                    "wallet {}: equity {}",
                    wallet.account_type, wallet.total_equity
                );
            }
            Ok(())
        })
        .await
        .expect("subscribe wallet");
    println!("✓ Subscribed to order, position, and wallet topics\n");

    sleep(Duration::from_secs(30)).await;

    cancel.cancel();
    match driver.await.expect("session task") {
        Ok(()) => println!("\n✓ Session closed cleanly"),
        Err(e) if e.is_closed() => println!("\n✓ Peer closed the connection"),
        Err(e) => eprintln!("\n✗ Session failed: {}", e),
    }
}
