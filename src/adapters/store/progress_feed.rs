//! Per-user broadcast of progress identifiers written by a document store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;

use crate::domain::foundation::UserId;

const FEED_CAPACITY: usize = 64;

/// Fan-out of progress writes, one channel per user.
///
/// Publishing with no subscribers is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ProgressFeed {
    senders: Arc<Mutex<HashMap<UserId, broadcast::Sender<String>>>>,
}

impl ProgressFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, user_id: &UserId) -> broadcast::Receiver<String> {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders
            .entry(user_id.clone())
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0)
            .subscribe()
    }

    pub fn publish(&self, user_id: &UserId, identifier: &str) {
        let senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = senders.get(user_id) {
            // Err only means every receiver has been dropped.
            let _ = sender.send(identifier.to_string());
        }
    }
}
