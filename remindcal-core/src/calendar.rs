//! The calendar: a keyed set of events plus one outbound notification channel.

use chrono::Utc;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::UNCHANGED;
use crate::datetime::format_local;
use crate::error::{CalendarError, CalendarResult};
use crate::event::Event;
use crate::notify::{ChannelSink, NotificationSink};
use crate::storage::Store;

/// Aggregate root for events and their reminders.
///
/// Every reminder set through the calendar notifies the calendar's own
/// [`ChannelSink`]. Whoever runs the calendar must drain the receiver from
/// [`Calendar::take_notifications`], otherwise firing reminders wait forever
/// once the channel buffer is full.
pub struct Calendar {
    events: HashMap<String, Event>,
    store: Arc<dyn Store>,
    sink: ChannelSink,
    notifications: Option<mpsc::Receiver<String>>,
    pretty_json: bool,
}

impl Calendar {
    pub fn new(store: Arc<dyn Store>, notification_buffer: usize) -> Self {
        let (sink, notifications) = ChannelSink::channel(notification_buffer);
        Calendar {
            events: HashMap::new(),
            store,
            sink,
            notifications: Some(notifications),
            pretty_json: true,
        }
    }

    pub fn with_pretty_json(mut self, pretty_json: bool) -> Self {
        self.pretty_json = pretty_json;
        self
    }

    /// Hand out the receiving end of the notification channel (once).
    pub fn take_notifications(&mut self) -> Option<mpsc::Receiver<String>> {
        self.notifications.take()
    }

    // PERSISTENCE:

    /// Serialize every event (id -> event) and hand the bytes to the store.
    pub fn save(&self) -> CalendarResult<()> {
        let data = if self.pretty_json {
            serde_json::to_vec_pretty(&self.events)
        } else {
            serde_json::to_vec(&self.events)
        }
        .map_err(|e| CalendarError::Serialization(e.to_string()))?;

        self.store.save(&data)
    }

    /// Replace the current events with the stored ones.
    ///
    /// Loaded reminders get this calendar's sink but are not armed; see
    /// [`Calendar::rearm_pending`].
    pub fn load(&mut self) -> CalendarResult<()> {
        let data = self.store.load()?;
        let loaded: HashMap<String, Event> = if data.iter().all(u8::is_ascii_whitespace) {
            HashMap::new()
        } else {
            serde_json::from_slice(&data).map_err(|e| CalendarError::Serialization(e.to_string()))?
        };

        self.stop_all_reminders();
        let notify = self.notifier();
        self.events = loaded
            .into_values()
            .map(|mut event| {
                if let Some(reminder) = event.reminder_mut() {
                    reminder.attach(Arc::clone(&notify));
                }
                (event.id().to_string(), event)
            })
            .collect();

        info!("Loaded {} events", self.events.len());
        Ok(())
    }

    /// Arm every loaded reminder that has not been sent and is still ahead.
    /// Returns how many were armed.
    pub fn rearm_pending(&mut self) -> usize {
        let now = Utc::now();
        let mut armed = 0;
        for event in self.events.values_mut() {
            if let Some(reminder) = event.reminder_mut() {
                if !reminder.is_sent() && !reminder.is_armed() && reminder.at() > now {
                    reminder.start();
                    armed += 1;
                }
            }
        }
        if armed > 0 {
            info!("Re-armed {armed} reminders");
        }
        armed
    }

    // EVENTS:

    pub fn add_event(&mut self, title: &str, date: &str, priority: &str) -> CalendarResult<&Event> {
        let event = Event::new(title, date, priority)?;
        let id = event.id().to_string();
        Ok(self.events.entry(id).or_insert(event))
    }

    /// Snapshot of all events, earliest first.
    pub fn events(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.values().collect();
        events.sort_by(|a, b| a.start_at().cmp(&b.start_at()).then(a.id().cmp(b.id())));
        events
    }

    pub fn event(&self, id: &str) -> CalendarResult<&Event> {
        self.events
            .get(id)
            .ok_or_else(|| CalendarError::EventNotFound(id.to_string()))
    }

    fn event_mut(&mut self, id: &str) -> CalendarResult<&mut Event> {
        self.events
            .get_mut(id)
            .ok_or_else(|| CalendarError::EventNotFound(id.to_string()))
    }

    /// Remove an event, stopping its reminder first.
    pub fn delete_event(&mut self, id: &str) -> CalendarResult<Event> {
        self.event_mut(id)?.remove_reminder();
        self.events
            .remove(id)
            .ok_or_else(|| CalendarError::EventNotFound(id.to_string()))
    }

    /// Edit an event; [`UNCHANGED`] in any field keeps its current value.
    /// Returns the old and the new title.
    pub fn edit_event(
        &mut self,
        id: &str,
        title: &str,
        date: &str,
        priority: &str,
    ) -> CalendarResult<(String, String)> {
        let event = self.event_mut(id)?;
        let old_title = event.title().to_string();

        let title = if title == UNCHANGED { old_title.clone() } else { title.to_string() };
        let date = if date == UNCHANGED {
            format_local(event.start_at())
        } else {
            date.to_string()
        };
        let priority = if priority == UNCHANGED {
            event.priority().as_str().to_string()
        } else {
            priority.to_string()
        };

        event.update(&title, &date, &priority)?;
        Ok((old_title, event.title().to_string()))
    }

    // REMINDERS:

    /// Attach and arm a reminder on an event; see [`Event::add_reminder`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn set_event_reminder(&mut self, id: &str, message: &str, at: &str) -> CalendarResult<()> {
        let notify = self.notifier();
        self.event_mut(id)?.add_reminder(message, at, notify)
    }

    pub fn cancel_event_reminder(&mut self, id: &str) -> CalendarResult<()> {
        let event = self.event_mut(id)?;
        if !event.has_reminder() {
            return Err(CalendarError::ReminderNotFound(id.to_string()));
        }
        event.remove_reminder();
        Ok(())
    }

    pub fn stop_all_reminders(&mut self) {
        for event in self.events.values_mut() {
            if let Some(reminder) = event.reminder_mut() {
                reminder.stop();
            }
        }
        debug!("Stopped all reminders");
    }

    // NOTIFICATIONS:

    /// Put a message on the notification channel, waiting for buffer space.
    pub async fn notify(&self, message: String) {
        self.sink.notify(message).await;
    }

    /// Stop every reminder, then close the notification channel.
    /// Returns false if the channel was already closed.
    pub fn close(&mut self) -> bool {
        self.stop_all_reminders();
        let closed = self.sink.close();
        if closed {
            info!("Notification channel closed");
        }
        closed
    }

    fn notifier(&self) -> Arc<dyn NotificationSink> {
        Arc::new(self.sink.clone())
    }
}
