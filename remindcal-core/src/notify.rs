//! Notification sinks: where fired reminders deliver their messages.

use async_trait::async_trait;
use log::{error, warn};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// Receives the formatted text of every fired reminder.
///
/// Implementations are expected not to fail; delivery is never retried.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, message: String);
}

/// Cloneable handle onto a calendar's single outbound notification channel.
///
/// All clones share one sender slot, so [`ChannelSink::close`] closes the
/// channel for every reminder holding a clone. `notify` waits for channel
/// capacity, which stalls firing reminders while the consumer is not draining.
#[derive(Clone)]
pub struct ChannelSink {
    sender: Arc<Mutex<Option<mpsc::Sender<String>>>>,
}

impl ChannelSink {
    /// Create a sink and the receiving end a consumer must drain.
    /// A capacity of zero is raised to one.
    pub fn channel(capacity: usize) -> (ChannelSink, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let sink = ChannelSink {
            sender: Arc::new(Mutex::new(Some(tx))),
        };
        (sink, rx)
    }

    /// Close the channel. Returns false if it was already closed.
    ///
    /// Messages already queued, or whose send is in flight, are still
    /// received by the consumer before it observes the end of the stream.
    pub fn close(&self) -> bool {
        let mut slot = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_none() {
            warn!("notification channel already closed");
            return false;
        }
        true
    }

    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn notify(&self, message: String) {
        // Clone out of the slot so the lock is never held across the await
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match sender {
            Some(tx) => {
                if tx.send(message).await.is_err() {
                    warn!("notification consumer is gone; message dropped");
                }
            }
            None => error!("notification sent after channel close; message dropped: {message}"),
        }
    }
}

/// Sink that records every message, for tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}
