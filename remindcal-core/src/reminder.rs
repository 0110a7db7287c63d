//! One-shot reminders armed by a tokio timer.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::datetime::{format_local, normalize};
use crate::error::{CalendarError, CalendarResult};
use crate::notify::NotificationSink;

/// Maximum message length, counted in characters rather than bytes.
pub const MAX_MESSAGE_LEN: usize = 100;

/// A single scheduled notification.
///
/// A reminder is created unarmed. [`Reminder::start`] arms it; when the timer
/// elapses the notification sink is called once and `sent` becomes true.
/// Only `message`, `at` and `sent` are persisted: a loaded reminder has no
/// sink until [`Reminder::attach`] and no timer until it is started again.
#[derive(Serialize, Deserialize)]
pub struct Reminder {
    message: String,
    at: DateTime<Utc>,
    #[serde(with = "sent_flag")]
    sent: Arc<AtomicBool>,
    #[serde(skip)]
    timer: Option<JoinHandle<()>>,
    #[serde(skip)]
    notify: Option<Arc<dyn NotificationSink>>,
}

impl Reminder {
    pub fn new(
        message: &str,
        at: DateTime<Utc>,
        notify: Arc<dyn NotificationSink>,
    ) -> CalendarResult<Self> {
        let message = validate_message(message)?;
        let at = normalize(at);
        validate_at(at)?;

        Ok(Reminder {
            message,
            at,
            sent: Arc::new(AtomicBool::new(false)),
            timer: None,
            notify: Some(notify),
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn is_sent(&self) -> bool {
        self.sent.load(Ordering::Acquire)
    }

    /// True while a timer is pending for this reminder.
    pub fn is_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Inject the sink a loaded reminder should notify. Does not arm it.
    pub fn attach(&mut self, notify: Arc<dyn NotificationSink>) {
        self.notify = Some(notify);
    }

    /// Arm the reminder, replacing any pending timer.
    ///
    /// An `at` that is already due fires right away. `at` is not re-validated
    /// here. Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        self.stop();

        let delay = (self.at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        let firing = self.firing();

        debug!("arming reminder \"{}\" in {}s", self.message, delay.as_secs());
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Delivery runs detached: stop() after this point does not cancel it
            tokio::spawn(firing.run());
        }));
    }

    /// Fire now. Only the first call (timer or manual) reaches the sink.
    pub async fn send(&self) {
        self.firing().run().await;
    }

    /// Cancel the pending timer, if any. Safe on unarmed or fired reminders.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn firing(&self) -> Firing {
        Firing {
            text: format!(
                "Reminder: \"{}\" - \"{}\"",
                self.message,
                format_local(self.at)
            ),
            sent: Arc::clone(&self.sent),
            notify: self.notify.clone(),
        }
    }
}

impl Drop for Reminder {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reminder")
            .field("message", &self.message)
            .field("at", &self.at)
            .field("sent", &self.is_sent())
            .field("armed", &self.is_armed())
            .finish()
    }
}

/// Everything a timer task needs to deliver, detached from the owning reminder.
struct Firing {
    text: String,
    sent: Arc<AtomicBool>,
    notify: Option<Arc<dyn NotificationSink>>,
}

impl Firing {
    async fn run(self) {
        if self
            .sent
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        if let Some(notify) = self.notify {
            notify.notify(self.text).await;
        }
    }
}

fn validate_message(message: &str) -> CalendarResult<String> {
    let message = message.trim();
    if message.is_empty() {
        return Err(CalendarError::EmptyMessage);
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(CalendarError::MessageTooLong {
            max: MAX_MESSAGE_LEN,
        });
    }
    Ok(message.to_string())
}

/// The default `DateTime<Utc>` (the Unix epoch) stands for "no time given".
fn validate_at(at: DateTime<Utc>) -> CalendarResult<()> {
    if at == DateTime::<Utc>::default() {
        return Err(CalendarError::ZeroTime);
    }
    if at <= Utc::now() {
        return Err(CalendarError::PastTime);
    }
    Ok(())
}

mod sent_flag {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    pub fn serialize<S: Serializer>(flag: &Arc<AtomicBool>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bool(flag.load(Ordering::Acquire))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Arc<AtomicBool>, D::Error> {
        Ok(Arc::new(AtomicBool::new(bool::deserialize(d)?)))
    }
}
