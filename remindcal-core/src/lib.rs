//! Core types for remindcal.
//!
//! This crate owns the event/reminder lifecycle:
//! - `Event` and `Priority` for calendar entries
//! - `Reminder` for one-shot, timer-driven notifications
//! - `Calendar` as the aggregate that funnels every fired reminder into one
//!   notification channel
//! - `storage` for the byte-level persistence boundary

pub mod calendar;
pub mod config;
pub mod datetime;
pub mod error;
pub mod event;
pub mod notify;
pub mod reminder;
pub mod storage;

pub use calendar::Calendar;
pub use error::{CalendarError, CalendarResult};
pub use event::{Event, Priority};
pub use notify::{ChannelSink, NotificationSink};
pub use reminder::Reminder;
pub use storage::{FileStore, MemoryStore, Store};

/// Field value meaning "keep the current value" in edit operations.
pub const UNCHANGED: &str = "_";
