use actix_web::{web, HttpResponse};
use actix_web_httpauth::extractors::basic::BasicAuth;
use serde::Deserialize;
use serde_json::json;

use crate::{auth::require_admin, db, error::ApiError, state::AppState};

#[derive(Deserialize)]
struct ServiceFilter {
    status: Option<String>,
}

#[derive(Deserialize)]
struct ServicePayload {
    name: String,
    description: Option<String>,
    price: f64,
    category_id: Option<i64>,
}

#[derive(Deserialize)]
struct StatusPayload {
    status: String,
}

#[derive(Deserialize)]
struct CategoryPayload {
    name: String,
    description: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/services/")
            .route(web::get().to(list_services))
            .route(web::post().to(create_service)),
    )
    .service(web::resource("/services/{id}").route(web::put().to(update_service_status)))
    .service(
        web::resource("/categories/")
            .route(web::get().to(list_categories))
            .route(web::post().to(create_category)),
    );
}

async fn list_services(
    state: web::Data<AppState>,
    query: web::Query<ServiceFilter>,
) -> Result<HttpResponse, ApiError> {
    let services = db::catalog::list_services(&state.db, query.status.as_deref()).await?;
    Ok(HttpResponse::Ok().json(services))
}

async fn create_service(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    payload: web::Json<ServicePayload>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&state.db, &credentials).await?;
    let payload = payload.into_inner();

    if let Some(category_id) = payload.category_id {
        if db::catalog::get_category_by_id(&state.db, category_id)
            .await?
            .is_none()
        {
            return Err(ApiError::NotFound("Category"));
        }
    }

    let id = db::catalog::create_service(
        &state.db,
        payload.category_id,
        &payload.name,
        payload.description.as_deref(),
        payload.price,
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({ "id": id, "message": "Service created successfully" })))
}

async fn update_service_status(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    path: web::Path<i64>,
    payload: web::Json<StatusPayload>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&state.db, &credentials).await?;
    let service_id = path.into_inner();

    let updated = db::catalog::set_service_status(&state.db, service_id, &payload.status).await?;
    if !updated {
        return Err(ApiError::NotFound("Service"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Service updated successfully" })))
}

async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categories = db::catalog::list_categories(&state.db).await?;
    Ok(HttpResponse::Ok().json(categories))
}

async fn create_category(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    payload: web::Json<CategoryPayload>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&state.db, &credentials).await?;
    let payload = payload.into_inner();

    let id =
        db::catalog::create_category(&state.db, &payload.name, payload.description.as_deref())
            .await?;

    Ok(HttpResponse::Created().json(json!({ "id": id, "message": "Category created successfully" })))
}
