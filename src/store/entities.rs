use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque habit identifier. Collections written by older versions use millisecond timestamps,
/// so any string is accepted when loading.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HabitId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Display for HabitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The struct used for storing a habit on the disk. Field names and order follow the layout of
/// the `habits` key, so that a stored collection survives a load/save cycle byte for byte.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub streak: u32,
    pub last_checked: Option<NaiveDate>,
    #[serde(default)]
    pub check_ins: Vec<NaiveDate>,
}

impl Habit {
    /// A habit that was never checked in.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: HabitId::generate(),
            name: name.into(),
            streak: 0,
            last_checked: None,
            check_ins: vec![],
        }
    }

    #[cfg(test)]
    pub fn with_id(self, id: HabitId) -> Self {
        Self { id, ..self }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Habit, HabitId};

    #[test]
    fn habit_serializes_in_stored_layout() -> anyhow::Result<()> {
        let mut habit = Habit::new("烟").with_id(HabitId::from("1717171717171"));
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        habit.streak = 1;
        habit.last_checked = Some(day);
        habit.check_ins.push(day);

        assert_eq!(
            serde_json::to_string(&habit)?,
            r#"{"id":"1717171717171","name":"烟","streak":1,"lastChecked":"2024-06-01","checkIns":["2024-06-01"]}"#
        );
        Ok(())
    }

    #[test]
    fn fresh_habit_has_no_history() -> anyhow::Result<()> {
        let habit = Habit::new("酒").with_id(HabitId::from("a"));
        assert_eq!(
            serde_json::to_string(&habit)?,
            r#"{"id":"a","name":"酒","streak":0,"lastChecked":null,"checkIns":[]}"#
        );
        Ok(())
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(HabitId::generate(), HabitId::generate());
    }
}
