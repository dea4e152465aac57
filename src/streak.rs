//! Daily check-in rules.
//!
//! A habit is either [CheckState::Checkable] or [CheckState::CheckedToday]. The state is never
//! stored, it is derived from `last_checked` and the current day every time it's needed, so a new
//! calendar day makes every habit checkable again without any timer.
//!
//! A local date that lies on or before `last_checked` (the user moved west, the system clock was
//! corrected) counts as already checked in. That keeps `last_checked` the latest entry of
//! `check_ins` and no day is ever checked in twice.

use chrono::NaiveDate;
use tracing::trace;

use crate::store::entities::Habit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checkable,
    CheckedToday,
}

/// Returned when a habit was already checked in on the given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyCheckedIn;

pub struct StreakEngine;

impl StreakEngine {
    pub fn status(habit: &Habit, today: NaiveDate) -> CheckState {
        match habit.last_checked {
            Some(last) if last >= today => CheckState::CheckedToday,
            _ if habit.check_ins.contains(&today) => CheckState::CheckedToday,
            _ => CheckState::Checkable,
        }
    }

    /// Produces the habit as it looks after checking in on `today`. The input is left untouched,
    /// persisting the result is up to the caller.
    ///
    /// Only `last_checked` decides whether the streak continues. A check-in yesterday (or no
    /// check-in ever) extends it, any longer gap restarts it at 1.
    pub fn check_in(habit: &Habit, today: NaiveDate) -> Result<Habit, AlreadyCheckedIn> {
        if Self::status(habit, today) == CheckState::CheckedToday {
            return Err(AlreadyCheckedIn);
        }

        let continues = match habit.last_checked {
            None => true,
            Some(last) => today.pred_opt() == Some(last),
        };
        let streak = if continues { habit.streak.saturating_add(1) } else { 1 };
        trace!(
            "Checking in {} on {today}: last {:?}, streak {} -> {streak}",
            habit.name,
            habit.last_checked,
            habit.streak
        );

        let mut updated = habit.clone();
        updated.check_ins.push(today);
        updated.last_checked = Some(today);
        updated.streak = streak;
        Ok(updated)
    }
}
