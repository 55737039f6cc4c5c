use actix_web::{web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Deserialize;

use crate::{auth::admin_validator, db, error::ApiError, state::AppState};

const DEFAULT_WINDOW_DAYS: i64 = 30;
const MAX_WINDOW_DAYS: i64 = 36500;

#[derive(Deserialize)]
struct WindowQuery {
    days: Option<i64>,
}

impl WindowQuery {
    fn days(&self) -> Result<i64, ApiError> {
        let days = self.days.unwrap_or(DEFAULT_WINDOW_DAYS);
        if !(1..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(ApiError::Validation(format!(
                "days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }
        Ok(days)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/analytics")
            .wrap(HttpAuthentication::basic(admin_validator))
            .service(web::resource("/revenue").route(web::get().to(revenue)))
            .service(web::resource("/services").route(web::get().to(service_usage)))
            .service(web::resource("/occupancy").route(web::get().to(occupancy))),
    );
}

async fn revenue(
    state: web::Data<AppState>,
    query: web::Query<WindowQuery>,
) -> Result<HttpResponse, ApiError> {
    let points = db::analytics::revenue_by_day(&state.db, query.days()?).await?;
    Ok(HttpResponse::Ok().json(points))
}

async fn service_usage(
    state: web::Data<AppState>,
    query: web::Query<WindowQuery>,
) -> Result<HttpResponse, ApiError> {
    let usage = db::analytics::service_usage(&state.db, query.days()?).await?;
    Ok(HttpResponse::Ok().json(usage))
}

async fn occupancy(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let counts = db::analytics::room_occupancy(&state.db).await?;
    Ok(HttpResponse::Ok().json(counts))
}
