use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDateTime;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    store::{
        kv::KeyValueStore,
        reminder_time::{load_reminder_time, ReminderTime},
    },
    utils::{clock::Clock, time::next_occurrence},
};

use super::notifier::{Notifier, Reminder};

/// Upper bound for a single sleep. The reminder time is re-read after every wake-up, so this is
/// how long a change made through the cli may take to be noticed.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Fires one [Reminder] a day at the stored reminder time. Only reads the reminder keys, habit
/// data is never touched.
pub struct ReminderService<S> {
    storage: S,
    notifier: Box<dyn Notifier>,
    shutdown: CancellationToken,
    refresh_interval: Duration,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> ReminderService<S> {
    pub fn new(
        storage: S,
        notifier: Box<dyn Notifier>,
        shutdown: CancellationToken,
        refresh_interval: Duration,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            notifier,
            shutdown,
            refresh_interval,
            clock,
        }
    }

    fn reminder_time(&self) -> ReminderTime {
        load_reminder_time(&self.storage).unwrap_or_else(|e| {
            warn!("Can't read reminder time, using default {e:?}");
            ReminderTime::default()
        })
    }

    /// Notifies if an occurrence of `time` lies in `(previous, now]`. Several missed days (the
    /// machine was asleep) still produce a single reminder.
    fn fire_due(&mut self, previous: NaiveDateTime, now: NaiveDateTime, time: ReminderTime) {
        let due = next_occurrence(previous, time.as_time());
        if due > now {
            return;
        }

        match self.notifier.notify(&Reminder::daily(due)) {
            Ok(_) => info!("Delivered reminder for {due}"),
            Err(e) => error!("Failed to deliver reminder for {due}: {e:?}"),
        }
    }

    /// Executes the reminder loop until shutdown is requested.
    pub async fn run(mut self) -> Result<()> {
        let mut previous = self.clock.local_time();
        info!("Reminder service started at {previous}");

        loop {
            let time = self.reminder_time();
            let now = self.clock.local_time();
            self.fire_due(previous, now, time);
            previous = now;

            let until_next = (next_occurrence(now, time.as_time()) - now)
                .to_std()
                .unwrap_or(Duration::ZERO);
            let wait = until_next.min(self.refresh_interval);
            debug!("Next reminder at {time}, sleeping for {wait:?}");

            select! {
                _ = self.shutdown.cancelled() => break,
                _ = self.clock.sleep(wait) => {},
            }
        }

        info!("Reminder service stopped");
        Ok(())
    }
}
