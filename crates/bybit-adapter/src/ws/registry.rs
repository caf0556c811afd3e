/*
[INPUT]:  Structured topic keys and user callbacks
[OUTPUT]: At-most-one-handler-per-key registry plus unsubscribe tokens
[POS]:    WebSocket layer - subscription state for one channel
[UPDATE]: When registration semantics or the unsubscribe contract change
*/

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use super::error::{HandlerResult, WsError};
use super::topic::Topic;

/// Callback registered for one topic key. Invoked synchronously on the
/// session's dispatch task, in socket order.
pub type Callback<T> = Box<dyn FnMut(T) -> HandlerResult + Send>;

/// Key-to-callback map for one payload type; owned by exactly one channel.
///
/// The mutex serializes subscribe/unsubscribe calls against the dispatch
/// loop, which may run on a different task.
pub(crate) struct HandlerMap<K, T> {
    inner: Arc<Mutex<HashMap<K, Callback<T>>>>,
}

impl<K, T> Clone for HandlerMap<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> HandlerMap<K, T>
where
    K: Topic + Eq + Hash,
{
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a callback; fails without mutating state when the key is
    /// already taken.
    pub(crate) async fn add(&self, key: K, callback: Callback<T>) -> Result<(), WsError> {
        let mut map = self.inner.lock().await;
        if map.contains_key(&key) {
            return Err(WsError::AlreadyRegistered { topic: key.topic() });
        }
        map.insert(key, callback);
        Ok(())
    }

    /// Unconditional delete; no-op when the key is absent.
    pub(crate) async fn remove(&self, key: &K) {
        self.inner.lock().await.remove(key);
    }

    /// Look up the callback for `key` and invoke it with `message`.
    pub(crate) async fn dispatch(&self, key: &K, message: T) -> Result<(), WsError> {
        let mut map = self.inner.lock().await;
        let callback = map
            .get_mut(key)
            .ok_or_else(|| WsError::HandlerNotFound { topic: key.topic() })?;
        callback(message).map_err(|source| WsError::Handler {
            topic: key.topic(),
            source,
        })
    }
}

/// Token returned by every subscribe call. Sends the prebuilt unsubscribe
/// control frame first, then removes the handler, so a frame already in
/// flight still finds its callback. Topics with no wire-level unsubscribe
/// carry no frame and only drop the handler.
pub struct Unsubscriber<K, T>
where
    K: Topic + Eq + Hash,
{
    key: K,
    frame: Option<Message>,
    handlers: HandlerMap<K, T>,
    outbound: mpsc::Sender<Message>,
}

impl<K, T> std::fmt::Debug for Unsubscriber<K, T>
where
    K: Topic + Eq + Hash + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscriber")
            .field("key", &self.key)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl<K, T> Unsubscriber<K, T>
where
    K: Topic + Eq + Hash,
{
    pub(crate) fn new(
        key: K,
        frame: Option<Message>,
        handlers: HandlerMap<K, T>,
        outbound: mpsc::Sender<Message>,
    ) -> Self {
        Self {
            key,
            frame,
            handlers,
            outbound,
        }
    }

    /// Stop the subscription. Removal is optimistic: no server ack is
    /// awaited.
    pub async fn unsubscribe(self) -> Result<(), WsError> {
        let topic = self.key.topic();
        if let Some(frame) = self.frame {
            self.outbound
                .send(frame)
                .await
                .map_err(|_| WsError::ChannelClosed)?;
        }
        self.handlers.remove(&self.key).await;
        debug!(topic, "unsubscribed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ws::topic::TickerKey;

    fn counting_callback(hits: Arc<AtomicUsize>) -> Callback<u64> {
        Box::new(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[tokio::test]
    async fn test_add_twice_keeps_first_handler() {
        let map: HandlerMap<TickerKey, u64> = HandlerMap::new();
        let key = TickerKey::new("BTCUSDT");
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        map.add(key.clone(), counting_callback(first.clone()))
            .await
            .unwrap();
        let err = map
            .add(key.clone(), counting_callback(second.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, WsError::AlreadyRegistered { .. }));

        map.dispatch(&key, 1).await.unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remove_allows_reregistration() {
        let map: HandlerMap<TickerKey, u64> = HandlerMap::new();
        let key = TickerKey::new("BTCUSDT");
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        map.add(key.clone(), counting_callback(first.clone()))
            .await
            .unwrap();
        map.remove(&key).await;
        map.add(key.clone(), counting_callback(second.clone()))
            .await
            .unwrap();

        map.dispatch(&key, 1).await.unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_key_fails() {
        let map: HandlerMap<TickerKey, u64> = HandlerMap::new();
        let err = map
            .dispatch(&TickerKey::new("BTCUSDT"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, WsError::HandlerNotFound { .. }));
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let map: HandlerMap<TickerKey, u64> = HandlerMap::new();
        let key = TickerKey::new("BTCUSDT");
        map.add(key.clone(), Box::new(|_| Err("handler exploded".into())))
            .await
            .unwrap();

        let err = map.dispatch(&key, 1).await.unwrap_err();
        assert!(matches!(err, WsError::Handler { .. }));
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_noop() {
        let map: HandlerMap<TickerKey, u64> = HandlerMap::new();
        map.remove(&TickerKey::new("BTCUSDT")).await;
    }

    #[tokio::test]
    async fn test_unsubscriber_sends_frame_then_removes() {
        let map: HandlerMap<TickerKey, u64> = HandlerMap::new();
        let key = TickerKey::new("BTCUSDT");
        let hits = Arc::new(AtomicUsize::new(0));
        map.add(key.clone(), counting_callback(hits)).await.unwrap();

        let (tx, mut rx) = mpsc::channel(1);
        let unsub = Unsubscriber::new(key.clone(), Some(Message::text("bye")), map.clone(), tx);
        unsub.unsubscribe().await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), Message::text("bye"));
        let err = map.dispatch(&key, 1).await.unwrap_err();
        assert!(matches!(err, WsError::HandlerNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unsubscriber_dead_queue_keeps_handler() {
        let map: HandlerMap<TickerKey, u64> = HandlerMap::new();
        let key = TickerKey::new("BTCUSDT");
        let hits = Arc::new(AtomicUsize::new(0));
        map.add(key.clone(), counting_callback(hits.clone()))
            .await
            .unwrap();

        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let unsub = Unsubscriber::new(key.clone(), Some(Message::text("bye")), map.clone(), tx);
        let err = unsub.unsubscribe().await.unwrap_err();
        assert!(matches!(err, WsError::ChannelClosed));

        map.dispatch(&key, 1).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsubscriber_without_frame_only_removes() {
        let map: HandlerMap<TickerKey, u64> = HandlerMap::new();
        let key = TickerKey::new("BTCUSDT");
        let hits = Arc::new(AtomicUsize::new(0));
        map.add(key.clone(), counting_callback(hits)).await.unwrap();

        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let unsub = Unsubscriber::new(key.clone(), None, map.clone(), tx);
        unsub.unsubscribe().await.unwrap();

        let err = map.dispatch(&key, 1).await.unwrap_err();
        assert!(matches!(err, WsError::HandlerNotFound { .. }));
    }
}
