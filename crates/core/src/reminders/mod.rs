//! Contribution reminders.
//!
//! - `schedule` - Quarterly reminder instants
//! - `message` - Reminder mail rendering
//! - `service` - Reminder runs over the unpaid active members

pub mod error;
pub mod message;
pub mod schedule;
pub mod service;

pub use error::ReminderError;
pub use message::render_reminder;
pub use schedule::{next_reminder_at, until_next_reminder};
pub use service::{ReminderService, ReminderSummary};
