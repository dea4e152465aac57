//! Terminal habit tracker. Add the habits you want to quit, check in once a day and keep the
//! streak going. A small background service reminds you to check in.
//!

pub mod cli;
pub mod error;
pub mod reminder;
pub mod store;
pub mod streak;
pub mod tracker;
pub mod utils;
