//! Reminder push adapters.

mod http_reminder_push;
mod recording_reminder_push;

pub use http_reminder_push::HttpReminderPush;
pub use recording_reminder_push::RecordingReminderPush;
