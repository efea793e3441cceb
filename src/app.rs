use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits", post(handlers::add_habit_form))
        .route("/habits/:id/toggle", post(handlers::toggle_form))
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route("/api/habits/:id", delete(handlers::purge_habit))
        .route("/api/habits/:id/delete", post(handlers::delete_habit))
        .route("/api/habits/:id/restore", post(handlers::restore_habit))
        .route("/api/trash", get(handlers::list_trash))
        .route("/api/days/:date", get(handlers::get_day))
        .route("/api/days/:date/toggle", post(handlers::toggle_day))
        .route("/api/days/:date/complete-all", post(handlers::complete_all))
        .route("/api/days/:date/shift/:delta", get(handlers::shift_day))
        .route("/api/calendar/:year/:month", get(handlers::calendar))
        .route("/api/chart", get(handlers::chart))
        .route("/api/insights", get(handlers::insights))
        .route("/api/leaderboard", get(handlers::leaderboard))
        .route("/api/friends", get(handlers::list_friends).post(handlers::add_friend))
        .route("/api/profile", get(handlers::profile))
        .route("/api/recommendations", get(handlers::recommendations))
        .with_state(state)
}
