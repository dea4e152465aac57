use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Represents an entity responsible for providing dates across application. Habit logic only ever
/// asks it for [Clock::today], so tests can pin the calendar day without touching the system
/// clock.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;

    /// Wall clock time in the user's timezone.
    fn local_time(&self) -> NaiveDateTime {
        self.time().with_timezone(&Local).naive_local()
    }

    /// Current calendar day in the user's timezone.
    fn today(&self) -> NaiveDate {
        self.local_time().date()
    }

    async fn sleep(&self, duration: Duration);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock frozen on a single local date-time, moved by hand in tests that cross day boundaries.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: NaiveDateTime,
}

#[cfg(test)]
impl FixedClock {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            now: date.and_time(chrono::NaiveTime::MIN),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Clock for FixedClock {
    fn time(&self) -> DateTime<Utc> {
        self.now.and_utc()
    }

    fn local_time(&self) -> NaiveDateTime {
        self.now
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
