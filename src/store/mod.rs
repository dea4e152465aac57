//!  Storage is organized through [kv::KeyValueStore].
//!  The basic idea is:
//!   - Everything is a string value under a fixed key, like browser local storage.
//!   - The whole habit collection lives under [habit_store::HABITS_KEY] and is rewritten on
//!     every change.
//!   - Reminder time is kept as two separate scalar values.

pub mod entities;
pub mod habit_store;
pub mod kv;
pub mod reminder_time;
