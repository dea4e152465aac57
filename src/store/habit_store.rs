use anyhow::Result;
use tracing::{debug, info, warn};

use crate::error::HabitError;

use super::{
    entities::{Habit, HabitId},
    kv::KeyValueStore,
};

/// Key holding the whole serialized collection.
pub const HABITS_KEY: &str = "habits";

/// Owns the habit collection and mirrors every change into a [KeyValueStore].
///
/// The collection is always written as a whole. A mutation is first persisted and only then
/// applied in memory, so a failed write leaves both sides untouched.
pub struct HabitStore<S> {
    storage: S,
    habits: Vec<Habit>,
}

impl<S: KeyValueStore> HabitStore<S> {
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            habits: vec![],
        };
        store.habits = store.load();
        store
    }

    /// Reads the persisted collection. Missing or malformed data is treated as an empty
    /// collection, the user should never be locked out by a broken store.
    pub fn load(&self) -> Vec<Habit> {
        match self.read_habits() {
            Ok(habits) => {
                debug!("Loaded {} habits", habits.len());
                habits
            }
            Err(e) => {
                warn!("Failed to load habits, starting with an empty collection: {e}");
                vec![]
            }
        }
    }

    fn read_habits(&self) -> Result<Vec<Habit>, HabitError> {
        let Some(raw) = self.storage.get(HABITS_KEY)? else {
            return Ok(vec![]);
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Serializes and persists `habits`, replacing whatever was stored before.
    pub fn save(&mut self, habits: &[Habit]) -> Result<()> {
        let serialized = serde_json::to_string(habits)?;
        self.storage.set(HABITS_KEY, &serialized)
    }

    fn commit(&mut self, habits: Vec<Habit>) -> Result<(), HabitError> {
        self.save(&habits)?;
        self.habits = habits;
        Ok(())
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn find(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|v| &v.id == id)
    }

    pub fn add(&mut self, name: &str) -> Result<Habit, HabitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HabitError::InvalidName);
        }
        if self.habits.iter().any(|v| v.name == name) {
            return Err(HabitError::DuplicateName(name.to_owned()));
        }

        let habit = Habit::new(name);
        let mut habits = self.habits.clone();
        habits.push(habit.clone());
        self.commit(habits)?;

        info!("Added habit {} ({})", habit.name, habit.id);
        Ok(habit)
    }

    /// Swaps the stored habit carrying the same id for `habit`.
    pub fn replace(&mut self, habit: Habit) -> Result<(), HabitError> {
        let Some(position) = self.habits.iter().position(|v| v.id == habit.id) else {
            return Err(HabitError::NotFound(habit.id));
        };

        let mut habits = self.habits.clone();
        habits[position] = habit;
        self.commit(habits)
    }

    /// Removing an unknown id is not an error, the collection is simply written back unchanged.
    pub fn remove(&mut self, id: &HabitId) -> Result<Option<Habit>, HabitError> {
        let mut habits = self.habits.clone();
        let removed = habits
            .iter()
            .position(|v| &v.id == id)
            .map(|position| habits.remove(position));
        self.commit(habits)?;

        match &removed {
            Some(habit) => info!("Removed habit {} ({})", habit.name, habit.id),
            None => debug!("Nothing to remove for {id}"),
        }
        Ok(removed)
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};

    use crate::{
        error::HabitError,
        store::{
            entities::HabitId,
            kv::{KeyValueStore, MemoryKeyValueStore, MockKeyValueStore},
        },
        utils::logging::TEST_LOGGING,
    };

    use super::{HabitStore, HABITS_KEY};

    const STORED: &str = r#"[{"id":"1717000000000","name":"烟","streak":2,"lastChecked":"2024-06-02","checkIns":["2024-06-01","2024-06-02"]},{"id":"1717000000001","name":"熬","streak":0,"lastChecked":null,"checkIns":[]}]"#;

    fn stored_store() -> Result<MemoryKeyValueStore> {
        let mut storage = MemoryKeyValueStore::new();
        storage.set(HABITS_KEY, STORED)?;
        Ok(storage)
    }

    #[test]
    fn empty_storage_loads_nothing() {
        let store = HabitStore::open(MemoryKeyValueStore::new());
        assert!(store.habits().is_empty());
    }

    #[test]
    fn malformed_collection_loads_as_empty() -> Result<()> {
        *TEST_LOGGING;
        let mut storage = MemoryKeyValueStore::new();
        storage.set(HABITS_KEY, r#"[{"id":"1","name":"烟""#)?;

        let store = HabitStore::open(storage);
        assert!(store.habits().is_empty());
        Ok(())
    }

    #[test]
    fn unreadable_storage_loads_as_empty() {
        *TEST_LOGGING;
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get()
            .returning(|_| Err(anyhow!("disk is gone")));

        let store = HabitStore::open(storage);
        assert!(store.habits().is_empty());
    }

    #[test]
    fn saving_a_loaded_collection_is_byte_identical() -> Result<()> {
        let mut store = HabitStore::open(stored_store()?);
        let loaded = store.load();
        store.save(&loaded)?;

        assert_eq!(store.storage().get(HABITS_KEY)?.as_deref(), Some(STORED));
        Ok(())
    }

    #[test]
    fn add_appends_and_persists() -> Result<()> {
        let mut store = HabitStore::open(stored_store()?);
        let habit = store.add("  拖 ")?;

        assert_eq!(habit.name, "拖");
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.last_checked, None);
        assert!(habit.check_ins.is_empty());
        assert_eq!(store.habits().len(), 3);
        assert_eq!(store.habits().last(), Some(&habit));

        let reloaded = HabitStore::open(store.storage().clone());
        assert_eq!(reloaded.habits(), store.habits());
        Ok(())
    }

    #[test]
    fn add_rejects_blank_names() -> Result<()> {
        let mut store = HabitStore::open(MemoryKeyValueStore::new());
        assert!(matches!(store.add("   "), Err(HabitError::InvalidName)));
        assert!(matches!(store.add(""), Err(HabitError::InvalidName)));
        assert!(store.habits().is_empty());
        assert_eq!(store.storage().get(HABITS_KEY)?, None);
        Ok(())
    }

    #[test]
    fn add_rejects_duplicates_after_trimming() -> Result<()> {
        let mut store = HabitStore::open(stored_store()?);
        let result = store.add(" 烟");
        assert!(matches!(result, Err(HabitError::DuplicateName(name)) if name == "烟"));
        assert_eq!(store.habits().len(), 2);
        assert_eq!(store.storage().get(HABITS_KEY)?.as_deref(), Some(STORED));
        Ok(())
    }

    #[test]
    fn names_are_case_sensitive() -> Result<()> {
        let mut store = HabitStore::open(MemoryKeyValueStore::new());
        store.add("Sugar")?;
        store.add("sugar")?;
        assert_eq!(store.habits().len(), 2);
        Ok(())
    }

    #[test]
    fn failed_write_keeps_collection() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .returning(|_, _| Err(anyhow!("read-only file system")));

        let mut store = HabitStore::open(storage);
        let result = store.add("酒");
        assert!(matches!(result, Err(HabitError::Storage(_))));
        assert!(store.habits().is_empty());
    }

    #[test]
    fn remove_deletes_matching_habit() -> Result<()> {
        let mut store = HabitStore::open(stored_store()?);
        let removed = store.remove(&HabitId::from("1717000000000"))?;

        assert_eq!(removed.map(|v| v.name), Some("烟".to_owned()));
        assert_eq!(store.habits().len(), 1);
        assert_eq!(HabitStore::open(store.storage().clone()).habits().len(), 1);
        Ok(())
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() -> Result<()> {
        let mut store = HabitStore::open(stored_store()?);
        let removed = store.remove(&HabitId::from("missing"))?;

        assert_eq!(removed, None);
        assert_eq!(store.storage().get(HABITS_KEY)?.as_deref(), Some(STORED));
        Ok(())
    }
}
