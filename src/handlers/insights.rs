use axum::{extract::State, Json};

use crate::dto::{AnalyticsResponse, BadgesResponse, StreakResponse};
use crate::error::AppResult;
use crate::models::mood::is_logged_on;
use crate::AppState;

pub async fn get_streak(State(state): State<AppState>) -> AppResult<Json<StreakResponse>> {
    let session = state.session.lock().await;
    Ok(Json(StreakResponse {
        streak: session.streak(),
        logged_today: is_logged_on(session.entries(), session.today()),
    }))
}

pub async fn get_badges(State(state): State<AppState>) -> AppResult<Json<BadgesResponse>> {
    let session = state.session.lock().await;
    Ok(Json(BadgesResponse::from(session.badges())))
}

pub async fn get_analytics(State(state): State<AppState>) -> AppResult<Json<AnalyticsResponse>> {
    let analytics = state.session.lock().await.analytics();
    Ok(Json(AnalyticsResponse::from(&analytics)))
}
