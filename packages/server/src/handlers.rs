//! HTTP handler functions for the water report service.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Duration, Utc};
use water_report_readings_models::ReadingRecord;
use water_report_server_models::{
    ApiError, ApiHealth, ApiReportPage, PageQueryParams, ReportForm,
};

use crate::AppState;

/// Oldest report date still served. A window too large to subtract reaches
/// back to the earliest representable date.
fn window_start(state: &AppState) -> DateTime<Utc> {
    Duration::try_days(state.config.window_days)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn recent_readings(
    state: &AppState,
    title: &str,
    since: DateTime<Utc>,
) -> Result<Vec<ReadingRecord>, HttpResponse> {
    let store = state.store.read().map_err(|_| {
        log::error!("Report store lock poisoned");
        HttpResponse::InternalServerError().json(ApiError {
            error: "Report store unavailable".to_string(),
        })
    })?;

    Ok(store
        .recent(title, since)
        .into_iter()
        .map(water_report_readings_models::Report::to_reading)
        .collect())
}

fn page(state: &AppState, title: &str, error: Option<String>) -> HttpResponse {
    let start_date = window_start(state);
    match recent_readings(state, title, start_date) {
        Ok(reports) => HttpResponse::Ok().json(ApiReportPage {
            title: title.to_string(),
            start_date,
            reports,
            error,
        }),
        Err(resp) => resp,
    }
}

/// `GET /`
///
/// Redirects to the default collection's page.
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/{}/", state.config.title)))
        .finish()
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /{title}/json`
///
/// The readings data file for a collection.
pub async fn reports_json(state: web::Data<AppState>, title: web::Path<String>) -> HttpResponse {
    match recent_readings(&state, &title, window_start(&state)) {
        Ok(readings) => HttpResponse::Ok().json(readings),
        Err(resp) => resp,
    }
}

/// `GET /{title}/`
pub async fn report_page(
    state: web::Data<AppState>,
    title: web::Path<String>,
    params: web::Query<PageQueryParams>,
) -> HttpResponse {
    page(&state, &title, params.into_inner().error)
}

/// `POST /{title}/`
///
/// Stores a submitted report and returns the refreshed page.
pub async fn submit_report(
    state: web::Data<AppState>,
    title: web::Path<String>,
    form: web::Form<ReportForm>,
) -> HttpResponse {
    let report = match form.into_inner().into_report(&title, Utc::now()) {
        Ok(report) => report,
        Err(e) => {
            log::warn!("Rejected report for '{title}': {e}");
            return HttpResponse::BadRequest().json(ApiError {
                error: e.to_string(),
            });
        }
    };

    match state.store.write() {
        Ok(mut store) => {
            log::info!(
                "Stored report for '{title}' at ({}, {}) water={}",
                report.latitude,
                report.longitude,
                report.water
            );
            store.insert(report);
            let pruned = store.prune(window_start(&state));
            if pruned > 0 {
                log::debug!("Pruned {pruned} expired reports");
            }
        }
        Err(_) => {
            log::error!("Report store lock poisoned");
            return HttpResponse::InternalServerError().json(ApiError {
                error: "Report store unavailable".to_string(),
            });
        }
    }

    page(&state, &title, None)
}
