use crate::catalog;
use crate::models::{AppData, DayUpdate, Friend, Habit};
use crate::stats;
use chrono::{NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("habit name must not be empty")]
    EmptyName,

    #[error("habit already exists: {0}")]
    DuplicateHabit(String),

    #[error("habit not found: {0}")]
    HabitNotFound(String),

    #[error("habit is in the trash: {0}")]
    HabitDeleted(String),

    #[error("friend code must not be empty")]
    EmptyFriendCode,
}

/// Persisted records; each mutation touches exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Habits,
    Logs,
    Friends,
    Profile,
}

/// In-memory owner of the app state. Mutations only change memory; the
/// caller persists the record a mutation reports as touched.
#[derive(Debug, Default)]
pub struct HabitStore {
    data: AppData,
}

impl HabitStore {
    pub fn new(data: AppData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn active_habits(&self) -> Vec<Habit> {
        self.data
            .habits
            .iter()
            .filter(|habit| habit.is_active())
            .cloned()
            .collect()
    }

    pub fn trash(&self) -> Vec<Habit> {
        self.data
            .habits
            .iter()
            .filter(|habit| habit.is_deleted)
            .cloned()
            .collect()
    }

    /// Free-text entry; names may repeat.
    pub fn add_habit(&mut self, name: &str) -> Result<Habit, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        Ok(self.push_habit(name))
    }

    /// Entry from the recommendation list; rejects a name already active.
    pub fn add_recommended(&mut self, name: &str) -> Result<Habit, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self
            .data
            .habits
            .iter()
            .any(|habit| habit.is_active() && habit.name == name)
        {
            return Err(StoreError::DuplicateHabit(name.to_string()));
        }
        Ok(self.push_habit(name))
    }

    pub fn soft_delete(&mut self, id: &str) -> Result<Habit, StoreError> {
        self.set_deleted(id, true)
    }

    pub fn restore(&mut self, id: &str) -> Result<Habit, StoreError> {
        self.set_deleted(id, false)
    }

    /// Removes the habit record for good. Log entries are left alone.
    pub fn purge(&mut self, id: &str) -> Result<Habit, StoreError> {
        let pos = self
            .data
            .habits
            .iter()
            .position(|habit| habit.id == id)
            .ok_or_else(|| StoreError::HabitNotFound(id.to_string()))?;
        Ok(self.data.habits.remove(pos))
    }

    /// Flips one habit's completion on `date` and evaluates the streak
    /// against the updated log.
    pub fn toggle(
        &mut self,
        date: NaiveDate,
        habit_id: &str,
        today: NaiveDate,
    ) -> Result<DayUpdate, StoreError> {
        match self.data.habits.iter().find(|habit| habit.id == habit_id) {
            None => return Err(StoreError::HabitNotFound(habit_id.to_string())),
            Some(habit) if habit.is_deleted => {
                return Err(StoreError::HabitDeleted(habit_id.to_string()));
            }
            Some(_) => {}
        }

        let day = self.data.logs.entry(stats::date_key(date)).or_default();
        if let Some(pos) = day.iter().position(|id| id == habit_id) {
            day.remove(pos);
        } else {
            day.push(habit_id.to_string());
        }

        Ok(self.day_update(date, today))
    }

    /// Marks every active habit done on `date`, replacing that day's entry.
    pub fn complete_all(&mut self, date: NaiveDate, today: NaiveDate) -> DayUpdate {
        let ids = self
            .data
            .habits
            .iter()
            .filter(|habit| habit.is_active())
            .map(|habit| habit.id.clone())
            .collect();
        self.data.logs.insert(stats::date_key(date), ids);
        self.day_update(date, today)
    }

    pub fn add_friend(&mut self, code: &str) -> Result<Friend, StoreError> {
        if code.trim().is_empty() {
            return Err(StoreError::EmptyFriendCode);
        }
        let friend = catalog::mock_friend();
        self.data.friends.push(friend.clone());
        Ok(friend)
    }

    /// Makes sure a share code exists. Returns true when one was created.
    pub fn ensure_user_code(&mut self) -> bool {
        if !self.data.profile.user_code.is_empty() {
            return false;
        }
        self.data.profile.user_code = catalog::generate_user_code();
        true
    }

    fn push_habit(&mut self, name: &str) -> Habit {
        let habit = Habit::new(
            catalog::generate_id(),
            name.to_string(),
            Utc::now().timestamp_millis(),
        );
        self.data.habits.push(habit.clone());
        habit
    }

    fn set_deleted(&mut self, id: &str, deleted: bool) -> Result<Habit, StoreError> {
        let habit = self
            .data
            .habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or_else(|| StoreError::HabitNotFound(id.to_string()))?;
        habit.is_deleted = deleted;
        Ok(habit.clone())
    }

    fn day_update(&self, date: NaiveDate, today: NaiveDate) -> DayUpdate {
        let summary = stats::day_summary(&self.data.habits, &self.data.logs, date, today);
        // Milestones only apply to today.
        let streak = if date == today {
            stats::streak(&self.data.habits, &self.data.logs, today)
        } else {
            0
        };
        DayUpdate {
            summary,
            streak,
            milestone: stats::milestone_for(streak),
        }
    }
}
