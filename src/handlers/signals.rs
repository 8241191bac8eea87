use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::session::{SignalKind, Signals};
use crate::AppState;

pub async fn get_signals(State(state): State<AppState>) -> Json<Signals> {
    Json(state.session.lock().await.signals().clone())
}

pub async fn clear_signal(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<StatusCode> {
    let kind: SignalKind = kind.parse().map_err(AppError::NotFound)?;
    state.session.lock().await.clear_signal(kind);
    Ok(StatusCode::NO_CONTENT)
}
