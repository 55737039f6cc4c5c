use actix_web::{web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Deserialize;
use serde_json::json;

use crate::{auth::admin_validator, db, error::ApiError, state::AppState};

#[derive(Deserialize)]
struct StaffPayload {
    full_name: String,
    specialty: Option<String>,
    email: String,
    phone: Option<String>,
}

#[derive(Deserialize)]
struct AssignPayload {
    service_id: i64,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/staff")
            .wrap(HttpAuthentication::basic(admin_validator))
            .service(
                web::resource("/")
                    .route(web::get().to(list_staff))
                    .route(web::post().to(create_staff)),
            )
            .service(
                web::resource("/{id}/services")
                    .route(web::get().to(list_assignments))
                    .route(web::post().to(assign_service)),
            ),
    );
}

async fn list_staff(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let staff = db::catalog::list_staff(&state.db).await?;
    Ok(HttpResponse::Ok().json(staff))
}

async fn create_staff(
    state: web::Data<AppState>,
    payload: web::Json<StaffPayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let id = db::catalog::create_staff(
        &state.db,
        &payload.full_name,
        payload.specialty.as_deref(),
        &payload.email,
        payload.phone.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({ "id": id, "message": "Staff member created successfully" })))
}

async fn assign_service(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<AssignPayload>,
) -> Result<HttpResponse, ApiError> {
    let staff_id = path.into_inner();

    if db::catalog::get_staff_by_id(&state.db, staff_id).await?.is_none() {
        return Err(ApiError::NotFound("Staff"));
    }
    if db::catalog::get_service_by_id(&state.db, payload.service_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Service"));
    }

    db::catalog::assign_service(&state.db, staff_id, payload.service_id).await?;
    Ok(HttpResponse::Created().json(json!({ "message": "Service assigned" })))
}

async fn list_assignments(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let staff_id = path.into_inner();
    if db::catalog::get_staff_by_id(&state.db, staff_id).await?.is_none() {
        return Err(ApiError::NotFound("Staff"));
    }
    let services = db::catalog::services_for_staff(&state.db, staff_id).await?;
    Ok(HttpResponse::Ok().json(services))
}
