use crate::errors::AppError;
use crate::models::AppData;
use crate::store::Record;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

impl Record {
    pub fn file_name(self) -> &'static str {
        match self {
            Record::Habits => "habits.json",
            Record::Logs => "logs.json",
            Record::Friends => "friends.json",
            Record::Profile => "profile.json",
        }
    }
}

pub fn record_path(dir: &Path, record: Record) -> PathBuf {
    dir.join(record.file_name())
}

/// Loads every record from `dir`. Missing or unreadable records come back
/// empty.
pub async fn load_data(dir: &Path) -> AppData {
    AppData {
        habits: load_record(&record_path(dir, Record::Habits)).await,
        logs: load_record(&record_path(dir, Record::Logs)).await,
        friends: load_record(&record_path(dir, Record::Friends)).await,
        profile: load_record(&record_path(dir, Record::Profile)).await,
    }
}

async fn load_record<T: DeserializeOwned + Default>(path: &Path) -> T {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            T::default()
        }
    }
}

pub async fn persist_record(dir: &Path, record: Record, data: &AppData) -> Result<(), AppError> {
    let path = record_path(dir, record);
    match record {
        Record::Habits => write_json(&path, &data.habits).await,
        Record::Logs => write_json(&path, &data.logs).await,
        Record::Friends => write_json(&path, &data.friends).await,
        Record::Profile => write_json(&path, &data.profile).await,
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(value).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(|err| {
        error!("failed to write {}: {err}", path.display());
        AppError::internal(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Friend, Habit, Profile};

    fn temp_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("habit_orb_{tag}_{}_{}", std::process::id(), nanos));
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    fn sample() -> AppData {
        let mut deleted = Habit::new("h2".into(), "stretch".into(), 1_700_000_000_001);
        deleted.is_deleted = true;
        let mut data = AppData {
            habits: vec![
                Habit::new("h1".into(), "water".into(), 1_700_000_000_000),
                deleted,
            ],
            friends: vec![Friend {
                id: "bot1".into(),
                name: "Nova".into(),
                avatar: "👽".into(),
                score: 75,
                status_message: "Focusing...".into(),
            }],
            profile: Profile {
                user_code: "AB12CD".into(),
            },
            ..AppData::default()
        };
        data.logs
            .insert("2024-01-10".into(), vec!["h1".into(), "h2".into()]);
        data
    }

    #[tokio::test]
    async fn records_round_trip() {
        let dir = temp_dir("roundtrip");
        let data = sample();
        for record in [Record::Habits, Record::Logs, Record::Friends, Record::Profile] {
            persist_record(&dir, record, &data).await.unwrap();
        }

        assert_eq!(load_data(&dir).await, data);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn missing_and_corrupt_records_fall_back_to_empty() {
        let dir = temp_dir("fallback");
        std::fs::write(record_path(&dir, Record::Logs), b"{not json").unwrap();

        let data = load_data(&dir).await;
        assert_eq!(data, AppData::default());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn only_the_touched_record_is_written() {
        let dir = temp_dir("touched");
        persist_record(&dir, Record::Friends, &sample()).await.unwrap();

        assert!(record_path(&dir, Record::Friends).exists());
        assert!(!record_path(&dir, Record::Habits).exists());
        assert!(!record_path(&dir, Record::Logs).exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn habit_json_uses_camel_case_and_optional_delete_flag() {
        let habit: Habit =
            serde_json::from_str(r#"{"id":"x","name":"read","createdAt":5}"#).unwrap();
        assert!(!habit.is_deleted);
        assert_eq!(habit.color, "teal");

        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["createdAt"], 5);
        assert_eq!(json["isDeleted"], false);
    }
}
