use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::date_key::DateKey;
use crate::dto::{EntryResponse, RecentQuery, SaveEntryRequest};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::models::mood::DatedEntry;
use crate::services::calendar::recent_entries;
use crate::session::SaveOutcome;
use crate::AppState;

const MAX_RECENT: usize = 366;

/// Logs today's mood. Saving again on the same day replaces the entry.
pub async fn save_entry(
    State(state): State<AppState>,
    AppJson(body): AppJson<SaveEntryRequest>,
) -> AppResult<Json<SaveOutcome>> {
    body.validate()?;

    let outcome = state.session.lock().await.save_entry(body.mood, body.note);
    Ok(Json(outcome))
}

/// Full history in date order, or the newest `limit` entries first.
pub async fn list_entries(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecentQuery>,
) -> AppResult<Json<Vec<DatedEntry>>> {
    let session = state.session.lock().await;

    let entries = match query.limit {
        Some(limit) => recent_entries(session.entries(), limit.min(MAX_RECENT)),
        None => session
            .entries()
            .iter()
            .map(|(date, entry)| DatedEntry {
                date: *date,
                entry: entry.clone(),
            })
            .collect(),
    };
    Ok(Json(entries))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<EntryResponse>> {
    let date = DateKey::parse(&date)?;
    let session = state.session.lock().await;

    let entry = session
        .entry(date)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No entry for {date}")))?;

    Ok(Json(EntryResponse {
        date,
        entry,
        is_today: session.is_today(date),
        is_future: session.is_future(date),
    }))
}
