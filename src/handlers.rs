use crate::controller::{Controller, Origin, Outcome};
use crate::errors::AppError;
use crate::models::{CreateHabitRequest, HabitId, LogDayRequest, StateResponse};
use crate::state::AppState;
use crate::validate::FormFields;
use crate::view::Action;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let controller = state.controller.lock().await;
    Html(controller.page())
}

pub async fn create_habit(State(state): State<AppState>, Form(fields): Form<FormFields>) -> Redirect {
    let mut controller = state.controller.lock().await;
    controller.submit_habit(&fields).await;
    back_to_page(&controller)
}

pub async fn log_day(State(state): State<AppState>, Form(fields): Form<FormFields>) -> Redirect {
    let mut controller = state.controller.lock().await;
    controller.submit_day(&fields).await;
    back_to_page(&controller)
}

pub async fn select_habit(State(state): State<AppState>, Path(id): Path<HabitId>) -> Redirect {
    dispatch(&state, Action::SelectHabit(id)).await
}

pub async fn remove_day(
    State(state): State<AppState>,
    Path((habit, index)): Path<(HabitId, usize)>,
) -> Redirect {
    dispatch(&state, Action::RemoveDay { habit, index }).await
}

pub async fn toggle_popup(State(state): State<AppState>) -> Redirect {
    dispatch(&state, Action::TogglePopup).await
}

pub async fn get_habits(State(state): State<AppState>) -> Json<StateResponse> {
    let controller = state.controller.lock().await;
    Json(controller.snapshot())
}

pub async fn api_create_habit(
    State(state): State<AppState>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<StateResponse>), AppError> {
    let fields = FormFields::from([
        ("name".to_string(), payload.name),
        ("icon".to_string(), payload.icon),
        (
            "target".to_string(),
            payload.target.map(|target| target.to_string()).unwrap_or_default(),
        ),
    ]);

    let mut controller = state.controller.lock().await;
    let outcome = controller.create_habit(Origin::Api, &fields).await;
    let body = to_response(&controller, outcome)?;
    Ok((StatusCode::CREATED, body))
}

pub async fn api_select_habit(
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
) -> Result<Json<StateResponse>, AppError> {
    let mut controller = state.controller.lock().await;
    let outcome = controller.select(id);
    to_response(&controller, outcome)
}

pub async fn api_log_day(
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
    Json(payload): Json<LogDayRequest>,
) -> Result<Json<StateResponse>, AppError> {
    let fields = FormFields::from([("comment".to_string(), payload.comment)]);
    let mut controller = state.controller.lock().await;
    let outcome = controller.log_day(Origin::Api, id, &fields).await;
    to_response(&controller, outcome)
}

pub async fn api_remove_day(
    State(state): State<AppState>,
    Path((id, index)): Path<(HabitId, usize)>,
) -> Result<Json<StateResponse>, AppError> {
    let mut controller = state.controller.lock().await;
    let outcome = controller.remove_day(id, index).await;
    to_response(&controller, outcome)
}

async fn dispatch(state: &AppState, action: Action) -> Redirect {
    let mut controller = state.controller.lock().await;
    controller.dispatch(action).await;
    back_to_page(&controller)
}

fn back_to_page(controller: &Controller) -> Redirect {
    match controller.location() {
        Some(fragment) => Redirect::to(&format!("/{fragment}")),
        None => Redirect::to("/"),
    }
}

fn to_response(controller: &Controller, outcome: Outcome) -> Result<Json<StateResponse>, AppError> {
    match outcome {
        Outcome::Applied(_) | Outcome::PopupToggled(_) => Ok(Json(controller.snapshot())),
        Outcome::Invalid(invalid) => Err(AppError::invalid_fields(&invalid.fields)),
        Outcome::Ignored(err) => Err(err.into()),
    }
}
