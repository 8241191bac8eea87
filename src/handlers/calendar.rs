use axum::{extract::State, Json};

use crate::date_key::DateKey;
use crate::dto::{MonthQuery, WeekQuery, YearQuery};
use crate::error::AppResult;
use crate::extract::AppQuery;
use crate::services::calendar::{month_view, week_view, year_view, DayCell, MonthView, YearView};
use crate::AppState;

pub async fn get_week(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WeekQuery>,
) -> AppResult<Json<Vec<DayCell>>> {
    let session = state.session.lock().await;
    let today = session.today();
    let anchor = match query.date.as_deref() {
        Some(raw) => DateKey::parse(raw)?,
        None => today,
    };
    Ok(Json(week_view(session.entries(), anchor, today)))
}

pub async fn get_month(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MonthQuery>,
) -> AppResult<Json<MonthView>> {
    let session = state.session.lock().await;
    let today = session.today();
    let (this_year, this_month, _) = today.parts();

    let view = month_view(
        session.entries(),
        query.year.unwrap_or(this_year),
        query.month.unwrap_or(this_month),
        today,
    )?;
    Ok(Json(view))
}

pub async fn get_year(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<YearQuery>,
) -> AppResult<Json<YearView>> {
    let session = state.session.lock().await;
    let today = session.today();
    let year = query.year.unwrap_or(today.parts().0);
    Ok(Json(year_view(session.entries(), year, today)?))
}
