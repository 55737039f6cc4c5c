use actix_web::{web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Deserialize;
use serde_json::json;

use crate::{auth::admin_validator, db, error::ApiError, state::AppState};

#[derive(Deserialize)]
struct RoomPayload {
    room_number: String,
    room_type: String,
    price_per_night: f64,
}

#[derive(Deserialize)]
struct StatusPayload {
    status: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rooms")
            .wrap(HttpAuthentication::basic(admin_validator))
            .service(
                web::resource("/")
                    .route(web::get().to(list_rooms))
                    .route(web::post().to(create_room)),
            )
            .service(web::resource("/{id}/status").route(web::put().to(update_room_status))),
    );
}

async fn list_rooms(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rooms = db::rooms::list_rooms(&state.db).await?;
    Ok(HttpResponse::Ok().json(rooms))
}

async fn create_room(
    state: web::Data<AppState>,
    payload: web::Json<RoomPayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let id = db::rooms::create_room(
        &state.db,
        &payload.room_number,
        &payload.room_type,
        payload.price_per_night,
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({ "id": id, "message": "Room created successfully" })))
}

/// The status vocabulary (available/occupied/maintenance) is conventional,
/// not enforced; any string is written as-is.
async fn update_room_status(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<StatusPayload>,
) -> Result<HttpResponse, ApiError> {
    let room_id = path.into_inner();
    let updated = db::rooms::set_room_status(&state.db, room_id, &payload.status).await?;
    if !updated {
        return Err(ApiError::NotFound("Room"));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Room updated successfully" })))
}
