use axum::{extract::State, Json};

use crate::dto::ThemeResponse;
use crate::AppState;

pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    let theme = state.session.lock().await.theme();
    Json(ThemeResponse::from(theme))
}

pub async fn toggle_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    let theme = state.session.lock().await.toggle_theme();
    tracing::debug!(%theme, "Theme toggled");
    Json(ThemeResponse::from(theme))
}
