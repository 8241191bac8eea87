use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod date_key;
pub mod db;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;
pub mod store;

use config::Config;
use session::Session;
use store::Store;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(session: Session, store: Arc<dyn Store>, config: Arc<Config>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            store,
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Entries
        .route(
            "/api/entries",
            get(handlers::entries::list_entries).post(handlers::entries::save_entry),
        )
        .route("/api/entries/:date", get(handlers::entries::get_entry))
        // Insights
        .route("/api/streak", get(handlers::insights::get_streak))
        .route("/api/badges", get(handlers::insights::get_badges))
        .route("/api/analytics", get(handlers::insights::get_analytics))
        .route("/api/search", get(handlers::search::search))
        // Calendar
        .route("/api/calendar/week", get(handlers::calendar::get_week))
        .route("/api/calendar/month", get(handlers::calendar::get_month))
        .route("/api/calendar/year", get(handlers::calendar::get_year))
        // Profile & theme
        .route(
            "/api/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route("/api/theme", get(handlers::theme::get_theme))
        .route("/api/theme/toggle", post(handlers::theme::toggle_theme))
        // Navigation
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route(
            "/api/navigation/select",
            post(handlers::navigation::select_date),
        )
        .route("/api/navigation/step", post(handlers::navigation::step_date))
        .route(
            "/api/navigation/return-to-today",
            post(handlers::navigation::return_to_today),
        )
        // Signals
        .route("/api/signals", get(handlers::signals::get_signals))
        .route(
            "/api/signals/:kind",
            delete(handlers::signals::clear_signal),
        );

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
