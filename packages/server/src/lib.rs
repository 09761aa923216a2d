#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web service for the water report map.
//!
//! Accepts report submissions and serves the readings data file that the
//! map loads: `GET /{title}/json` returns `[{lat, lng, water}, ...]` for
//! reports submitted within the configured window (three days by default).
//! Reports are kept in memory only.

mod handlers;
pub mod store;

use std::sync::RwLock;

use actix_web::{App, HttpServer, middleware, web};

pub use store::ReportStore;

/// Default report collection title.
pub const DEFAULT_TITLE: &str = "WaterReport";

/// Default number of days of reports served.
pub const DEFAULT_WINDOW_DAYS: i64 = 3;

/// Longest accepted report window, in days.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Parses a `REPORT_WINDOW_DAYS` value, falling back to
/// [`DEFAULT_WINDOW_DAYS`] when it is missing, unparsable or outside
/// `1..=MAX_WINDOW_DAYS`.
fn parse_window_days(value: Option<&str>) -> i64 {
    value
        .and_then(|d| d.trim().parse().ok())
        .filter(|d| (1..=MAX_WINDOW_DAYS).contains(d))
        .unwrap_or(DEFAULT_WINDOW_DAYS)
}

/// Service settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Collection `/` redirects to (`REPORT_TITLE`).
    pub title: String,
    /// How many days of reports are served (`REPORT_WINDOW_DAYS`).
    pub window_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            title: DEFAULT_TITLE.to_string(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `REPORT_TITLE` and `REPORT_WINDOW_DAYS`,
    /// falling back to defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            title: std::env::var("REPORT_TITLE").unwrap_or(defaults.title),
            window_days: parse_window_days(std::env::var("REPORT_WINDOW_DAYS").ok().as_deref()),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Submitted reports.
    pub store: RwLock<ReportStore>,
    /// Service settings.
    pub config: ServerConfig,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            store: RwLock::new(ReportStore::new()),
            config,
        }
    }
}

/// Registers all routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/api/health", web::get().to(handlers::health))
        .route("/{title}/json", web::get().to(handlers::reports_json))
        .route("/{title}/", web::get().to(handlers::report_page))
        .route("/{title}/", web::post().to(handlers::submit_report));
}

/// Starts the report service.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let bind = (config.bind_addr.clone(), config.port);
    log::info!(
        "Starting server on {}:{} (serving '{}', {} day window)",
        bind.0,
        bind.1,
        config.title,
        config.window_days
    );

    let state = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
