use axum::{extract::State, Json};
use chrono::Utc;
use validator::Validate;

use crate::dto::{ProfileResponse, UpdateProfileRequest};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::profile::UserProfile;
use crate::AppState;

pub async fn get_profile(State(state): State<AppState>) -> AppResult<Json<ProfileResponse>> {
    let session = state.session.lock().await;
    Ok(Json(ProfileResponse {
        profile: session.profile().cloned(),
    }))
}

/// Renaming keeps the original creation time. The name is trimmed before
/// its length is checked.
pub async fn update_profile(
    State(state): State<AppState>,
    AppJson(body): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let body = UpdateProfileRequest {
        name: body.name.trim().to_string(),
    };
    body.validate()?;

    let mut session = state.session.lock().await;
    let created_at = session
        .profile()
        .map(|p| p.created_at)
        .unwrap_or_else(Utc::now);
    let profile = UserProfile {
        name: body.name,
        created_at,
    };
    session.update_profile(profile.clone());

    Ok(Json(ProfileResponse {
        profile: Some(profile),
    }))
}
