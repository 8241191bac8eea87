use axum::{extract::State, Json};

use crate::dto::{SearchQuery, SearchResponse};
use crate::error::AppResult;
use crate::extract::AppQuery;
use crate::AppState;

/// Queries shorter than two characters return nothing rather than an error.
pub async fn search(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let results = state.session.lock().await.search(&query.q);
    Ok(Json(SearchResponse {
        query: query.q,
        results,
    }))
}
