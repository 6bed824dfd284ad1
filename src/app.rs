use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits", post(handlers::create_habit))
        .route("/habits/:id/select", post(handlers::select_habit))
        .route("/habits/:id/days/:index/delete", post(handlers::remove_day))
        .route("/days", post(handlers::log_day))
        .route("/popup/toggle", post(handlers::toggle_popup))
        .route("/api/habits", get(handlers::get_habits).post(handlers::api_create_habit))
        .route("/api/habits/:id/active", put(handlers::api_select_habit))
        .route("/api/habits/:id/days", post(handlers::api_log_day))
        .route("/api/habits/:id/days/:index", delete(handlers::api_remove_day))
        .with_state(state)
}
