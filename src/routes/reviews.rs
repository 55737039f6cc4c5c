use actix_web::{web, HttpResponse};
use actix_web_httpauth::extractors::basic::BasicAuth;
use serde::Deserialize;
use serde_json::json;

use crate::{auth::require_user, db, error::ApiError, state::AppState};

#[derive(Deserialize)]
struct ReviewPayload {
    booking_id: i64,
    rating: i64,
    comment: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/reviews/")
            .route(web::get().to(list_reviews))
            .route(web::post().to(create_review)),
    );
}

async fn create_review(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    payload: web::Json<ReviewPayload>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&state.db, &credentials).await?;
    let payload = payload.into_inner();

    // Rating bounds live here, not in the schema.
    if !(1..=5).contains(&payload.rating) {
        return Err(ApiError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    if db::bookings::get_booking_by_id(&state.db, payload.booking_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Booking"));
    }

    let id = db::bookings::create_review(
        &state.db,
        payload.booking_id,
        user.id,
        payload.rating,
        payload.comment.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({ "id": id, "message": "Review created successfully" })))
}

async fn list_reviews(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let reviews = db::bookings::list_reviews(&state.db).await?;
    Ok(HttpResponse::Ok().json(reviews))
}
