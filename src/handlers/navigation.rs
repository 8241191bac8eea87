use axum::{extract::State, Json};
use validator::Validate;

use crate::date_key::DateKey;
use crate::dto::{NavigationResponse, SelectDateRequest, StepDateRequest};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::session::Session;
use crate::AppState;

fn snapshot(session: &Session) -> NavigationResponse {
    let selected = session.selected_date();
    NavigationResponse {
        selected_date: selected,
        today: session.today(),
        is_today: session.is_today(selected),
        is_future: session.is_future(selected),
    }
}

pub async fn get_navigation(State(state): State<AppState>) -> Json<NavigationResponse> {
    let session = state.session.lock().await;
    Json(snapshot(&session))
}

pub async fn select_date(
    State(state): State<AppState>,
    AppJson(body): AppJson<SelectDateRequest>,
) -> AppResult<Json<NavigationResponse>> {
    let date = DateKey::parse(&body.date)?;
    let mut session = state.session.lock().await;
    session.select_date(date);
    Ok(Json(snapshot(&session)))
}

pub async fn step_date(
    State(state): State<AppState>,
    AppJson(body): AppJson<StepDateRequest>,
) -> AppResult<Json<NavigationResponse>> {
    body.validate()?;

    let mut session = state.session.lock().await;
    session.step_selected_date(body.days);
    Ok(Json(snapshot(&session)))
}

/// Sent when the day view regains focus.
pub async fn return_to_today(State(state): State<AppState>) -> Json<NavigationResponse> {
    let mut session = state.session.lock().await;
    session.return_to_today();
    Json(snapshot(&session))
}
