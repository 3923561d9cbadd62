//! Poll-based change watcher for the news collection.
//!
//! The REST surface has no push channel, so the watcher periodically
//! fetches the collection, fingerprints it, and notifies subscribers when
//! the fingerprint changes. Notifications carry no payload: every
//! notification triggers a fresh listing on the subscriber's side (full
//! reload, no incremental diffing).

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, trace, warn};

use paperboard_models::{NewsItem, Session};

use crate::firestore::DocumentClient;

/// Notification that the remote collection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotification;

/// Watches the news collection for changes.
///
/// Subscribers register before the watcher task is spawned; each gets its
/// own channel and disconnected receivers are dropped on broadcast. The
/// task stops when the shutdown watch channel flips to true, so the
/// subscription handle is released on teardown instead of leaking.
pub struct ChangeWatcher {
    client: Arc<DocumentClient>,
    session: Session,
    poll_interval: Duration,
    subscribers: Arc<RwLock<Vec<Sender<ChangeNotification>>>>,
    shutdown: watch::Receiver<bool>,
}

impl ChangeWatcher {
    /// Creates a watcher polling at the given interval.
    pub fn new(
        client: Arc<DocumentClient>,
        session: Session,
        poll_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            client,
            session,
            poll_interval,
            subscribers: Arc::new(RwLock::new(Vec::new())),
            shutdown,
        }
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> Receiver<ChangeNotification> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.write() {
            subs.push(tx);
        }
        rx
    }

    /// Runs the polling loop until the shutdown signal.
    pub async fn run(mut self) {
        let mut ticker = interval(self.poll_interval);
        let mut last_fingerprint: Option<Vec<(String, i64)>> = None;

        debug!(
            poll_interval_ms = self.poll_interval.as_millis(),
            "starting change watcher"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once(&mut last_fingerprint).await;
                }
                _ = self.shutdown.changed() => {
                    if *self.shutdown.borrow() {
                        debug!("watcher received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("change watcher stopped");
    }

    /// Fetches the collection once and notifies on a changed fingerprint.
    ///
    /// A failed fetch is logged and skipped; the next tick retries
    /// naturally, which is the only retry policy this client has.
    async fn poll_once(&self, last_fingerprint: &mut Option<Vec<(String, i64)>>) {
        let items = match self.client.list_items(&self.session).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "watcher poll failed");
                return;
            }
        };

        let current = fingerprint(&items);
        let changed = match last_fingerprint {
            Some(last) => *last != current,
            // First successful poll counts as a change, mirroring the
            // immediate initial delivery of a snapshot listener.
            None => true,
        };

        if changed {
            trace!(documents = current.len(), "collection changed");
            *last_fingerprint = Some(current);
            self.notify_subscribers();
        }
    }

    /// Broadcasts to all subscribers, dropping disconnected ones.
    fn notify_subscribers(&self) {
        if let Ok(mut subs) = self.subscribers.write() {
            subs.retain(|tx| tx.send(ChangeNotification).is_ok());
        }
    }
}

/// Fingerprint of a listing: `(id, time)` pairs in order.
///
/// Adds, deletes, and any reordering all change the fingerprint; items are
/// immutable once created, so this catches every mutation the collection
/// supports.
fn fingerprint(items: &[NewsItem]) -> Vec<(String, i64)> {
    items
        .iter()
        .map(|item| (item.id.to_string(), item.created_at_millis))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use paperboard_models::Importance;

    fn test_watcher(shutdown: watch::Receiver<bool>) -> ChangeWatcher {
        // Points at a closed local port; polls fail fast without a server.
        let config = GatewayConfig::new("key", "proj")
            .with_firestore_url("http://127.0.0.1:1");
        ChangeWatcher::new(
            Arc::new(DocumentClient::new(config)),
            Session::new("tok", "ref", "a@b.c", "uid"),
            Duration::from_millis(10),
            shutdown,
        )
    }

    #[test]
    fn test_fingerprint_detects_add_and_delete() {
        let a = NewsItem::new("a", "one", Importance::Mild, 2);
        let b = NewsItem::new("b", "two", Importance::Critical, 1);

        let before = fingerprint(&[a.clone()]);
        let after_add = fingerprint(&[a.clone(), b.clone()]);
        let after_delete = fingerprint(&[b]);

        assert_ne!(before, after_add);
        assert_ne!(after_add, after_delete);
        assert_eq!(before, fingerprint(&[a]));
    }

    #[test]
    fn test_subscribers_receive_broadcast() {
        let (_tx, shutdown) = watch::channel(false);
        let watcher = test_watcher(shutdown);

        let rx1 = watcher.subscribe();
        let rx2 = watcher.subscribe();

        watcher.notify_subscribers();

        assert_eq!(rx1.try_recv().unwrap(), ChangeNotification);
        assert_eq!(rx2.try_recv().unwrap(), ChangeNotification);
        assert!(rx1.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_subscribers_are_dropped() {
        let (_tx, shutdown) = watch::channel(false);
        let watcher = test_watcher(shutdown);

        let rx = watcher.subscribe();
        drop(watcher.subscribe());

        watcher.notify_subscribers();
        assert_eq!(rx.try_recv().unwrap(), ChangeNotification);
        assert_eq!(watcher.subscribers.read().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_watcher_stops_on_shutdown() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let watcher = test_watcher(shutdown_rx);

        let handle = tokio::spawn(watcher.run());

        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown_tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(result.is_ok(), "watcher should stop after shutdown signal");
    }
}
