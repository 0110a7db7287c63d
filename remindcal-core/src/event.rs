//! Calendar events and their single optional reminder.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{error, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use crate::datetime::{normalize, parse_duration, parse_local};
use crate::error::{CalendarError, CalendarResult};
use crate::notify::NotificationSink;
use crate::reminder::Reminder;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[а-яА-Яa-zA-Z0-9 ,.]{3,50}$").expect("valid title regex"));

/// Event priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(CalendarError::InvalidPriority(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A calendar entry. Fields are only ever replaced as a fully validated set.
#[derive(Debug, Serialize, Deserialize)]
pub struct Event {
    id: String,
    title: String,
    start_at: DateTime<Utc>,
    priority: Priority,
    #[serde(default)]
    reminder: Option<Reminder>,
}

/// Validated field values, built before anything on an `Event` is touched.
struct Fields {
    title: String,
    start_at: DateTime<Utc>,
    priority: Priority,
}

impl Fields {
    /// Checks title, then date, then priority; the first failure wins.
    fn validate(title: &str, date: &str, priority: &str) -> CalendarResult<Self> {
        let title = title.trim();
        if !is_valid_title(title) {
            return Err(CalendarError::InvalidTitle);
        }

        let start_at = normalize(parse_local(date)?);
        let priority = priority.parse()?;

        Ok(Fields {
            title: title.to_string(),
            start_at,
            priority,
        })
    }
}

impl Event {
    pub fn new(title: &str, date: &str, priority: &str) -> CalendarResult<Self> {
        let fields = Fields::validate(title, date, priority).inspect_err(|e| {
            error!("Failed to create event: {e}");
        })?;

        let event = Event {
            id: uuid::Uuid::new_v4().to_string(),
            title: fields.title,
            start_at: fields.start_at,
            priority: fields.priority,
            reminder: None,
        };
        info!("Created event id={} title={}", event.id, event.title);
        Ok(event)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_at(&self) -> DateTime<Utc> {
        self.start_at
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn reminder(&self) -> Option<&Reminder> {
        self.reminder.as_ref()
    }

    pub(crate) fn reminder_mut(&mut self) -> Option<&mut Reminder> {
        self.reminder.as_mut()
    }

    pub fn has_reminder(&self) -> bool {
        self.reminder.is_some()
    }

    /// Replace title, start and priority. On error the event is unchanged.
    /// The id and reminder are kept as they are.
    pub fn update(&mut self, title: &str, date: &str, priority: &str) -> CalendarResult<()> {
        let fields = Fields::validate(title, date, priority).inspect_err(|e| {
            error!("Failed to update event id={}: {e}", self.id);
        })?;

        self.title = fields.title;
        self.start_at = fields.start_at;
        self.priority = fields.priority;
        info!("Updated event id={} title={}", self.id, self.title);
        Ok(())
    }

    /// Attach and arm a reminder, replacing any existing one.
    ///
    /// `at` is either a duration from now (`10m`, `1h50m30s`) or an absolute
    /// local date/time.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since arming spawns the timer task.
    pub fn add_reminder(
        &mut self,
        message: &str,
        at: &str,
        notify: Arc<dyn NotificationSink>,
    ) -> CalendarResult<()> {
        let reminder = resolve_reminder_time(at)
            .and_then(|at| Reminder::new(message, at, notify))
            .inspect_err(|e| {
                error!("Failed to add reminder to event id={}: {e}", self.id);
            })?;

        self.remove_reminder();
        let reminder = self.reminder.insert(reminder);
        reminder.start();
        info!(
            "Added reminder to event id={} message={}",
            self.id,
            reminder.message()
        );
        Ok(())
    }

    /// Stop and drop the reminder, if there is one.
    pub fn remove_reminder(&mut self) {
        if let Some(mut reminder) = self.reminder.take() {
            reminder.stop();
            info!("Stopped reminder for event id={}", self.id);
        }
    }
}

fn is_valid_title(title: &str) -> bool {
    TITLE_RE.is_match(title)
}

fn resolve_reminder_time(at: &str) -> CalendarResult<DateTime<Utc>> {
    let at = at.trim();
    if at.is_empty() {
        return Err(CalendarError::EmptyReminderTime);
    }

    let fire_at = match parse_duration(at) {
        Some(duration) => {
            let duration = ChronoDuration::from_std(duration?)
                .map_err(|_| CalendarError::InvalidDate)?;
            Utc::now()
                .checked_add_signed(duration)
                .ok_or(CalendarError::InvalidDate)?
        }
        None => parse_local(at)?,
    };

    Ok(normalize(fire_at))
}
