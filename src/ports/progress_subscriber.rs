//! ProgressSubscriber port - change notifications for the progress field.

use tokio::sync::broadcast;

use crate::domain::foundation::UserId;

/// Delivers every progress identifier written to a user's document.
///
/// Identifiers are raw strings as stored; decoding (and treating unknown
/// values as `initial`) is the receiver's job.
pub trait ProgressSubscriber: Send + Sync {
    fn subscribe(&self, user_id: &UserId) -> broadcast::Receiver<String>;
}
