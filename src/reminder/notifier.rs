use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::info;

/// The daily nudge shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    pub at: NaiveDateTime,
}

impl Reminder {
    pub fn daily(at: NaiveDateTime) -> Self {
        Self {
            title: "每日打卡".into(),
            body: "今天戒了么?".into(),
            at,
        }
    }
}

/// Delivery channel for reminders. Delivery is best effort, an error only gets logged.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    fn notify(&mut self, reminder: &Reminder) -> Result<()>;
}

/// Prints reminders and records them in the log. When the service runs detached stdout goes
/// nowhere, so the log is what's left.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, reminder: &Reminder) -> Result<()> {
        info!("Reminder at {}: {} {}", reminder.at, reminder.title, reminder.body);
        println!(
            "{}\t{}\t{}",
            reminder.at.format("%Y-%m-%d %H:%M"),
            reminder.title,
            reminder.body
        );
        Ok(())
    }
}
