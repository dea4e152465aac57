use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, Result};
use chrono::NaiveTime;
use tracing::warn;

use super::kv::KeyValueStore;

pub const HOUR_KEY: &str = "notificationHour";
pub const MINUTE_KEY: &str = "notificationMinute";

/// Time of day at which the daily reminder goes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderTime {
    hour: u32,
    minute: u32,
}

impl Default for ReminderTime {
    fn default() -> Self {
        Self { hour: 9, minute: 0 }
    }
}

impl ReminderTime {
    pub fn new_opt(hour: u32, minute: u32) -> Option<ReminderTime> {
        if hour < 24 && minute < 60 {
            Some(ReminderTime { hour, minute })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn as_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .expect("Reminder time is validated on creation")
    }
}

impl Display for ReminderTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReminderTime {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| anyhow!("Expected time as HH:MM, got {s}"))?;
        let hour = hour.parse::<u32>()?;
        let minute = minute.parse::<u32>()?;
        ReminderTime::new_opt(hour, minute).ok_or_else(|| anyhow!("{s} is not a valid time of day"))
    }
}

/// Reads the reminder time. Each half falls back to its default on its own, same as when only
/// one of the keys was ever written.
pub fn load_reminder_time(storage: &impl KeyValueStore) -> Result<ReminderTime> {
    let default = ReminderTime::default();
    let hour = read_component(storage, HOUR_KEY, 24)?.unwrap_or(default.hour);
    let minute = read_component(storage, MINUTE_KEY, 60)?.unwrap_or(default.minute);
    Ok(ReminderTime { hour, minute })
}

fn read_component(storage: &impl KeyValueStore, key: &str, limit: u32) -> Result<Option<u32>> {
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };
    match raw.trim().parse::<u32>() {
        Ok(v) if v < limit => Ok(Some(v)),
        _ => {
            warn!("Ignoring invalid {key} value {raw:?}");
            Ok(None)
        }
    }
}

pub fn save_reminder_time(storage: &mut impl KeyValueStore, time: ReminderTime) -> Result<()> {
    storage.set(HOUR_KEY, &time.hour.to_string())?;
    storage.set(MINUTE_KEY, &time.minute.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::store::kv::{KeyValueStore, MemoryKeyValueStore};

    use super::{load_reminder_time, save_reminder_time, ReminderTime, HOUR_KEY, MINUTE_KEY};

    #[test]
    fn defaults_to_nine_in_the_morning() -> Result<()> {
        let time = load_reminder_time(&MemoryKeyValueStore::new())?;
        assert_eq!(time, ReminderTime::new_opt(9, 0).unwrap());
        assert_eq!(time.to_string(), "09:00");
        Ok(())
    }

    #[test]
    fn saved_time_is_read_back() -> Result<()> {
        let mut storage = MemoryKeyValueStore::new();
        save_reminder_time(&mut storage, ReminderTime::new_opt(21, 5).unwrap())?;

        assert_eq!(storage.get(HOUR_KEY)?.as_deref(), Some("21"));
        assert_eq!(storage.get(MINUTE_KEY)?.as_deref(), Some("5"));
        assert_eq!(load_reminder_time(&storage)?.to_string(), "21:05");
        Ok(())
    }

    #[test]
    fn components_fall_back_independently() -> Result<()> {
        let mut storage = MemoryKeyValueStore::new();
        storage.set(HOUR_KEY, "22")?;
        storage.set(MINUTE_KEY, "seventy")?;

        let time = load_reminder_time(&storage)?;
        assert_eq!((time.hour(), time.minute()), (22, 0));
        Ok(())
    }

    #[test]
    fn parsing_validates_range() {
        assert_eq!(
            "7:30".parse::<ReminderTime>().ok(),
            ReminderTime::new_opt(7, 30)
        );
        assert!("24:00".parse::<ReminderTime>().is_err());
        assert!("12:60".parse::<ReminderTime>().is_err());
        assert!("noon".parse::<ReminderTime>().is_err());
    }
}
