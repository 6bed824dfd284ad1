use crate::errors::AppError;
use crate::models::{Habit, HabitId};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::{env, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub const HABIT_KEY: &str = "HABIT_KEY";

pub fn resolve_data_path() -> PathBuf {
    match env::var("HABIT_DATA_PATH") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from("data/habits.json"),
    }
}

/// Medium holding the serialized habit collection.
#[derive(Debug, Clone)]
pub enum Storage {
    File(PathBuf),
    Memory(Arc<Mutex<HashMap<String, String>>>),
}

impl Storage {
    pub fn memory() -> Self {
        Storage::Memory(Arc::default())
    }

    async fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        match self {
            Storage::File(path) => match fs::read_to_string(path).await {
                Ok(text) => Ok(Some(text)),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            },
            Storage::Memory(slots) => {
                let value = lock(slots).get(key).cloned();
                Ok(value)
            }
        }
    }

    async fn write(&self, key: &str, payload: String) -> Result<(), AppError> {
        match self {
            Storage::File(path) => {
                fs::write(path, payload).await?;
            }
            Storage::Memory(slots) => {
                lock(slots).insert(key.to_string(), payload);
            }
        }
        Ok(())
    }
}

fn lock(slots: &Mutex<HashMap<String, String>>) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Contents of the stored collection. Entries that could not be used as a
/// `Habit` are kept verbatim in `retained` and written back on every save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredHabits {
    pub habits: Vec<Habit>,
    pub retained: Vec<Value>,
}

impl StoredHabits {
    /// Ids carried by retained entries that fit a `HabitId`.
    pub fn retained_ids(&self) -> impl Iterator<Item = HabitId> + '_ {
        self.retained
            .iter()
            .filter_map(|entry| entry.get("id")?.as_u64())
            .filter_map(|id| HabitId::try_from(id).ok())
    }
}

/// Never fails: anything unreadable yields an empty (or partial) collection.
pub async fn load_habits(storage: &Storage) -> StoredHabits {
    let text = match storage.read(HABIT_KEY).await {
        Ok(Some(text)) => text,
        Ok(None) => return StoredHabits::default(),
        Err(err) => {
            error!("failed to read habits: {}", err.message);
            return StoredHabits::default();
        }
    };
    parse_habits(&text)
}

pub fn parse_habits(text: &str) -> StoredHabits {
    let entries = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            warn!("stored habits are not an array (found {}), starting empty", kind(&other));
            return StoredHabits::default();
        }
        Err(err) => {
            error!("failed to parse stored habits: {err}");
            return StoredHabits::default();
        }
    };

    let mut seen = BTreeSet::new();
    let mut stored = StoredHabits::default();
    for (position, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Habit>(entry.clone()) {
            Ok(habit) if seen.insert(habit.id) => stored.habits.push(habit),
            Ok(habit) => {
                warn!(position, id = habit.id, "keeping habit with duplicate id aside");
                stored.retained.push(entry);
            }
            Err(err) => {
                warn!(position, "keeping malformed habit aside: {err}");
                stored.retained.push(entry);
            }
        }
    }
    stored
}

/// Overwrites the stored collection with `habits` followed by `retained`.
pub async fn persist_habits(storage: &Storage, habits: &[Habit], retained: &[Value]) -> Result<(), AppError> {
    let mut entries = Vec::with_capacity(habits.len() + retained.len());
    for habit in habits {
        entries.push(serde_json::to_value(habit).map_err(AppError::internal)?);
    }
    entries.extend(retained.iter().cloned());

    let payload = serde_json::to_string_pretty(&entries).map_err(AppError::internal)?;
    storage.write(HABIT_KEY, payload).await
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
