use tracing::{info, instrument};

use crate::{
    error::HabitError,
    store::{
        entities::{Habit, HabitId},
        habit_store::HabitStore,
        kv::KeyValueStore,
    },
    streak::{AlreadyCheckedIn, CheckState, StreakEngine},
    utils::clock::Clock,
};

/// Habit names offered without typing.
pub const PRESET_TAGS: [&str; 15] = [
    "烟", "酒", "赌", "熬", "糖", "氪", "废", "色", "辣", "盐", "懒", "抖", "购", "戏", "拖",
];

/// Everything the presentation layer is allowed to do with habits. Each call either returns the
/// new state or a [HabitError]; by the time a mutating call returns the change is persisted.
pub struct HabitTracker<S, C> {
    store: HabitStore<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> HabitTracker<S, C> {
    pub fn open(storage: S, clock: C) -> Self {
        Self {
            store: HabitStore::open(storage),
            clock,
        }
    }

    pub fn list_habits(&self) -> &[Habit] {
        self.store.habits()
    }

    pub fn add_habit(&mut self, name: &str) -> Result<Habit, HabitError> {
        self.store.add(name)
    }

    #[instrument(skip(self))]
    pub fn check_in(&mut self, id: &HabitId) -> Result<Habit, HabitError> {
        let habit = self
            .store
            .find(id)
            .ok_or_else(|| HabitError::NotFound(id.clone()))?;
        let today = self.clock.today();

        let updated = StreakEngine::check_in(habit, today)
            .map_err(|AlreadyCheckedIn| HabitError::AlreadyCheckedIn(habit.name.clone()))?;
        self.store.replace(updated.clone())?;

        info!(
            "Checked in {} on {today}, streak {}",
            updated.name, updated.streak
        );
        Ok(updated)
    }

    pub fn delete_habit(&mut self, id: &HabitId) -> Result<Option<Habit>, HabitError> {
        self.store.remove(id)
    }

    pub fn status(&self, habit: &Habit) -> CheckState {
        StreakEngine::status(habit, self.clock.today())
    }

    /// Looks a habit up by its id first, then by its exact name.
    pub fn resolve(&self, key: &str) -> Option<HabitId> {
        let habits = self.store.habits();
        habits
            .iter()
            .find(|v| v.id.as_str() == key)
            .or_else(|| habits.iter().find(|v| v.name == key.trim()))
            .map(|v| v.id.clone())
    }

    #[cfg(test)]
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        self.store.storage()
    }
}
