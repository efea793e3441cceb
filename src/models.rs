use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date key (`YYYY-MM-DD`) to the ids of the habits completed that day.
pub type DailyLog = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: i64,
    #[serde(default)]
    pub is_deleted: bool,
}

fn default_category() -> String {
    "General".to_string()
}

fn default_color() -> String {
    "teal".to_string()
}

impl Habit {
    pub fn new(id: String, name: String, created_at: i64) -> Self {
        Self {
            id,
            name,
            category: default_category(),
            color: default_color(),
            created_at,
            is_deleted: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub score: u8,
    pub status_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_code: String,
}

/// Everything the app persists, one field per stored record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppData {
    pub habits: Vec<Habit>,
    pub logs: DailyLog,
    pub friends: Vec<Friend>,
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub goal: u32,
    pub completed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopHabit {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorstWeekday {
    /// 0 = Sunday .. 6 = Saturday
    pub index: u8,
    pub name: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub weekly_rate: u32,
    pub top_habits: Vec<TopHabit>,
    pub worst_weekday: Option<WorstWeekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub score: u8,
    pub status_message: String,
    pub is_me: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    SevenDays,
    ThirtyDays,
}

impl Milestone {
    pub fn days(self) -> u32 {
        match self {
            Milestone::SevenDays => 7,
            Milestone::ThirtyDays => 30,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub is_today: bool,
    pub completed: Vec<String>,
    pub active_count: usize,
    pub percentage: f64,
    pub quote: Quote,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayUpdate {
    #[serde(flatten)]
    pub summary: DaySummary,
    pub streak: u32,
    pub milestone: Option<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub has_data: bool,
    pub is_today: bool,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Empty slots before the 1st, Sunday first.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendedGroup {
    pub category: &'static str,
    pub items: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
pub struct NewHabitRequest {
    pub name: String,
    #[serde(default)]
    pub recommended: bool,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub habit_id: String,
}

#[derive(Debug, Deserialize)]
pub struct NewFriendRequest {
    pub code: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RangeQuery {
    #[serde(default)]
    pub range: TimeRange,
}

#[derive(Debug, Deserialize)]
pub struct HabitForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub date: String,
}
