use crate::errors::StoreError;
use crate::models::{Day, Habit, HabitId, Target};

/// Authoritative in-memory habit collection plus the current selection.
///
/// Every mutation replaces the affected habit's day sequence with a freshly
/// built one, so a `Habit` cloned out earlier never observes later changes.
#[derive(Debug, Clone, Default)]
pub struct HabitStore {
    habits: Vec<Habit>,
    active: Option<HabitId>,
    reserved: Option<HabitId>,
}

impl HabitStore {
    pub fn new(habits: Vec<Habit>) -> Self {
        let active = habits.first().map(|habit| habit.id);
        Self {
            habits,
            active,
            reserved: None,
        }
    }

    /// Marks an id as taken by stored data the store does not own, so new
    /// habits are numbered past it.
    pub fn reserve_id(&mut self, id: HabitId) {
        self.reserved = self.reserved.max(Some(id));
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn active_id(&self) -> Option<HabitId> {
        self.active
    }

    pub fn active_habit(&self) -> Option<&Habit> {
        self.active.and_then(|id| self.habit(id))
    }

    /// One past the largest id seen, or `None` once `HabitId::MAX` is taken.
    pub fn next_id(&self) -> Option<HabitId> {
        self.habits
            .iter()
            .map(|habit| habit.id)
            .chain(self.reserved)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    pub fn create_habit(&mut self, name: &str, target: Target, icon: &str) -> Result<Habit, StoreError> {
        let name = required("name", name)?;
        let icon = required("icon", icon)?;
        if !target.days().is_some_and(|days| days > 0.0) {
            return Err(StoreError::Validation { field: "target" });
        }
        let target = match target {
            Target::Text(text) => Target::Text(text.trim().to_string()),
            number => number,
        };

        let id = self.next_id().ok_or(StoreError::IdExhausted)?;
        let habit = Habit {
            id,
            name,
            target,
            icon,
            days: Vec::new(),
        };
        self.habits.push(habit.clone());
        self.active = Some(habit.id);
        Ok(habit)
    }

    pub fn log_day(&mut self, id: HabitId, comment: &str) -> Result<Habit, StoreError> {
        let comment = required("comment", comment)?;
        let habit = self.habit_mut(id)?;
        habit.days = habit
            .days
            .iter()
            .cloned()
            .chain(std::iter::once(Day { comment }))
            .collect();
        Ok(habit.clone())
    }

    pub fn remove_day(&mut self, id: HabitId, index: usize) -> Result<Habit, StoreError> {
        let habit = self.habit_mut(id)?;
        let len = habit.days.len();
        if index >= len {
            return Err(StoreError::Index { index, len });
        }
        habit.days = habit
            .days
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, day)| day.clone())
            .collect();
        Ok(habit.clone())
    }

    pub fn set_active_habit(&mut self, id: HabitId) -> Result<Habit, StoreError> {
        let habit = self.habit(id).cloned().ok_or(StoreError::NotFound(id))?;
        self.active = Some(id);
        Ok(habit)
    }

    fn habit_mut(&mut self, id: HabitId) -> Result<&mut Habit, StoreError> {
        self.habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

/// Percentage of `target` reached by `days` logged entries, capped at 100.
/// Zero, negative or non-numeric targets report 0.
pub fn progress(days: usize, target: &Target) -> u8 {
    match target.days() {
        Some(goal) if goal > 0.0 => (days as f64 / goal * 100.0).round().min(100.0) as u8,
        _ => 0,
    }
}

fn required(field: &'static str, value: &str) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::Validation { field });
    }
    Ok(value.to_string())
}
