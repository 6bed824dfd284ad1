use serde::{Deserialize, Serialize};
use std::fmt;

pub type HabitId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub target: Target,
    pub icon: String,
    #[serde(default)]
    pub days: Vec<Day>,
}

/// Day-count goal for 100% progress. Stored data may carry it either as a
/// JSON number or as the string typed into the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Number(f64),
    Text(String),
}

impl Target {
    pub fn days(&self) -> Option<f64> {
        let value = match self {
            Target::Number(value) => *value,
            Target::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Number(value) => write!(f, "{value}"),
            Target::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Target::Text(value.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    #[serde(default)]
    pub name: String,
    pub target: Option<Target>,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct LogDayRequest {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitSummary {
    #[serde(flatten)]
    pub habit: Habit,
    pub progress: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub habits: Vec<HabitSummary>,
    pub active_habit_id: Option<HabitId>,
    pub notice: Option<String>,
}
