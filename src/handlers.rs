use crate::catalog::RECOMMENDED_HABITS;
use crate::errors::AppError;
use crate::models::{
    CalendarMonth, ChartPoint, DateQuery, DaySummary, DayUpdate, Friend, Habit, HabitForm,
    Insights, LeaderboardEntry, NewFriendRequest, NewHabitRequest, Profile, RangeQuery,
    RecommendedGroup, ToggleForm, ToggleRequest,
};
use crate::state::AppState;
use crate::stats;
use crate::storage::persist_record;
use crate::store::{HabitStore, Record, StoreError};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Datelike, Duration, NaiveDate};
use tracing::{info, warn};

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Html<String>, AppError> {
    let today = stats::today();
    let date = match query.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => today,
    };
    let store = state.store.lock().await;
    Ok(Html(render_index(store.data(), date, today)))
}

pub async fn add_habit_form(
    State(state): State<AppState>,
    Form(form): Form<HabitForm>,
) -> Result<Redirect, AppError> {
    let habit = mutate(&state, Record::Habits, |store| store.add_habit(&form.name)).await?;
    info!("habit added: {} ({})", habit.name, habit.id);
    Ok(Redirect::to("/"))
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect, AppError> {
    let date = parse_date(&form.date)?;
    let update = apply_toggle(&state, date, &id).await?;
    Ok(Redirect::to(&format!("/?date={}", update.summary.date)))
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let store = state.store.lock().await;
    Json(store.active_habits())
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabitRequest>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let habit = mutate(&state, Record::Habits, |store| {
        if payload.recommended {
            store.add_recommended(&payload.name)
        } else {
            store.add_habit(&payload.name)
        }
    })
    .await?;
    info!("habit added: {} ({})", habit.name, habit.id);
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn list_trash(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let store = state.store.lock().await;
    Json(store.trash())
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    let habit = mutate(&state, Record::Habits, |store| store.soft_delete(&id)).await?;
    info!("habit moved to trash: {}", habit.id);
    Ok(Json(habit))
}

pub async fn restore_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    let habit = mutate(&state, Record::Habits, |store| store.restore(&id)).await?;
    info!("habit restored: {}", habit.id);
    Ok(Json(habit))
}

pub async fn purge_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let habit = mutate(&state, Record::Habits, |store| store.purge(&id)).await?;
    info!("habit permanently deleted: {}", habit.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DaySummary>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(summary_for(&state, date).await))
}

pub async fn shift_day(
    State(state): State<AppState>,
    Path((date, delta)): Path<(String, i64)>,
) -> Result<Json<DaySummary>, AppError> {
    let date = parse_date(&date)?;
    let shifted = Duration::try_days(delta)
        .and_then(|offset| date.checked_add_signed(offset))
        .filter(|shifted| (0..=9999).contains(&shifted.year()))
        .ok_or_else(|| AppError::bad_request("date shift out of range"))?;
    Ok(Json(summary_for(&state, shifted).await))
}

pub async fn toggle_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<DayUpdate>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(apply_toggle(&state, date, payload.habit_id.trim()).await?))
}

pub async fn complete_all(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayUpdate>, AppError> {
    let date = parse_date(&date)?;
    let today = stats::today();
    let update = mutate(&state, Record::Logs, |store| Ok(store.complete_all(date, today))).await?;
    log_update(&update);
    Ok(Json(update))
}

pub async fn calendar(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<CalendarMonth>, AppError> {
    let store = state.store.lock().await;
    let data = store.data();
    stats::calendar_month(&data.habits, &data.logs, year, month, stats::today())
        .map(Json)
        .ok_or_else(|| AppError::bad_request("invalid year or month"))
}

pub async fn chart(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Json<Vec<ChartPoint>> {
    let store = state.store.lock().await;
    let data = store.data();
    Json(stats::chart_series(&data.habits, &data.logs, query.range))
}

pub async fn insights(State(state): State<AppState>) -> Json<Insights> {
    let store = state.store.lock().await;
    let data = store.data();
    Json(stats::insights(&data.habits, &data.logs))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let selected = match query.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => stats::today(),
    };
    let store = state.store.lock().await;
    let data = store.data();
    Ok(Json(stats::leaderboard(
        &data.friends,
        &data.habits,
        &data.logs,
        selected,
    )))
}

pub async fn list_friends(State(state): State<AppState>) -> Json<Vec<Friend>> {
    let store = state.store.lock().await;
    Json(store.data().friends.clone())
}

pub async fn add_friend(
    State(state): State<AppState>,
    Json(payload): Json<NewFriendRequest>,
) -> Result<(StatusCode, Json<Friend>), AppError> {
    let friend = mutate(&state, Record::Friends, |store| store.add_friend(&payload.code)).await?;
    info!("friend added: {} ({})", friend.name, friend.id);
    Ok((StatusCode::CREATED, Json(friend)))
}

pub async fn profile(State(state): State<AppState>) -> Json<Profile> {
    let store = state.store.lock().await;
    Json(store.data().profile.clone())
}

pub async fn recommendations() -> Json<&'static [RecommendedGroup]> {
    Json(RECOMMENDED_HABITS)
}

/// Applies one store action and, if accepted, writes the record it touched.
async fn mutate<T>(
    state: &AppState,
    record: Record,
    action: impl FnOnce(&mut HabitStore) -> Result<T, StoreError>,
) -> Result<T, AppError> {
    let mut store = state.store.lock().await;
    let value = action(&mut *store).map_err(|err| {
        warn!("rejected change to {}: {err}", record.file_name());
        AppError::from(err)
    })?;
    persist_record(&state.data_dir, record, store.data()).await?;
    Ok(value)
}

async fn apply_toggle(state: &AppState, date: NaiveDate, id: &str) -> Result<DayUpdate, AppError> {
    let today = stats::today();
    let update = mutate(state, Record::Logs, |store| store.toggle(date, id, today)).await?;
    log_update(&update);
    Ok(update)
}

async fn summary_for(state: &AppState, date: NaiveDate) -> DaySummary {
    let store = state.store.lock().await;
    let data = store.data();
    stats::day_summary(&data.habits, &data.logs, date, stats::today())
}

fn log_update(update: &DayUpdate) {
    info!(
        "{} now at {:.0}% ({} done)",
        update.summary.date,
        update.summary.percentage,
        update.summary.completed.len()
    );
    if let Some(milestone) = update.milestone {
        info!("streak milestone reached: {} days", milestone.days());
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    stats::parse_date(value)
        .ok_or_else(|| AppError::bad_request(format!("invalid date '{value}', expected YYYY-MM-DD")))
}
