use actix_web::{web, HttpResponse};
use actix_web_httpauth::extractors::basic::BasicAuth;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::{require_admin, require_user, AuthUser},
    db,
    error::ApiError,
    models::{BookingRow, STATUS_PENDING},
    state::AppState,
};

#[derive(Deserialize)]
struct BookingPayload {
    service_id: i64,
    date: String,
    time: Option<String>,
    room_id: Option<i64>,
    staff_id: Option<i64>,
}

#[derive(Deserialize)]
struct StatusPayload {
    status: String,
}

#[derive(Deserialize)]
struct LineItemPayload {
    product_id: i64,
    quantity: Option<i64>,
}

#[derive(Deserialize)]
struct PaymentPayload {
    amount: f64,
    status: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/bookings/")
            .route(web::get().to(list_bookings))
            .route(web::post().to(create_booking)),
    )
    .service(web::resource("/bookings/{id}").route(web::put().to(update_booking_status)))
    .service(
        web::resource("/bookings/{id}/products")
            .route(web::get().to(list_line_items))
            .route(web::post().to(add_line_item)),
    )
    .service(
        web::resource("/bookings/{id}/payments")
            .route(web::get().to(list_payments))
            .route(web::post().to(record_payment)),
    );
}

async fn create_booking(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    payload: web::Json<BookingPayload>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&state.db, &credentials).await?;
    let payload = payload.into_inner();

    if db::catalog::get_service_by_id(&state.db, payload.service_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Service"));
    }
    if let Some(room_id) = payload.room_id {
        if db::rooms::get_room_by_id(&state.db, room_id).await?.is_none() {
            return Err(ApiError::NotFound("Room"));
        }
    }
    if let Some(staff_id) = payload.staff_id {
        if db::catalog::get_staff_by_id(&state.db, staff_id).await?.is_none() {
            return Err(ApiError::NotFound("Staff"));
        }
    }

    let id = db::bookings::create_booking(
        &state.db,
        user.id,
        Some(payload.service_id),
        payload.room_id,
        payload.staff_id,
        &payload.date,
        payload.time.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "id": id,
        "service_id": payload.service_id,
        "room_id": payload.room_id,
        "staff_id": payload.staff_id,
        "date": payload.date,
        "time": payload.time,
        "status": STATUS_PENDING,
        "message": "Booking created successfully",
    })))
}

/// Admins see every booking; everyone else sees only their own.
async fn list_bookings(
    state: web::Data<AppState>,
    credentials: BasicAuth,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&state.db, &credentials).await?;
    let owner = if user.is_admin { None } else { Some(user.id) };
    let bookings = db::bookings::list_bookings(&state.db, owner).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

async fn update_booking_status(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    path: web::Path<i64>,
    payload: web::Json<StatusPayload>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&state.db, &credentials).await?;
    let booking_id = path.into_inner();

    let updated = db::bookings::set_booking_status(&state.db, booking_id, &payload.status).await?;
    if !updated {
        return Err(ApiError::NotFound("Booking"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Booking updated successfully" })))
}

/// Loads the booking and checks the caller may touch it (owner or admin).
async fn owned_booking(
    state: &AppState,
    user: &AuthUser,
    booking_id: i64,
) -> Result<BookingRow, ApiError> {
    let booking = db::bookings::get_booking_by_id(&state.db, booking_id)
        .await?
        .ok_or(ApiError::NotFound("Booking"))?;
    if !user.is_admin && booking.user_id != user.id {
        return Err(ApiError::Forbidden);
    }
    Ok(booking)
}

async fn add_line_item(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    path: web::Path<i64>,
    payload: web::Json<LineItemPayload>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&state.db, &credentials).await?;
    let booking = owned_booking(&state, &user, path.into_inner()).await?;
    let payload = payload.into_inner();

    if db::catalog::get_product_by_id(&state.db, payload.product_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Product"));
    }

    db::bookings::add_booking_product(
        &state.db,
        booking.id,
        payload.product_id,
        payload.quantity.unwrap_or(1),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Product added to booking" })))
}

async fn list_line_items(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&state.db, &credentials).await?;
    let booking = owned_booking(&state, &user, path.into_inner()).await?;
    let items = db::bookings::products_for_booking(&state.db, booking.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

async fn record_payment(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    path: web::Path<i64>,
    payload: web::Json<PaymentPayload>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&state.db, &credentials).await?;
    let booking_id = path.into_inner();
    let payload = payload.into_inner();

    if db::bookings::get_booking_by_id(&state.db, booking_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Booking"));
    }

    let id = db::bookings::create_payment(
        &state.db,
        booking_id,
        payload.amount,
        payload.status.as_deref().unwrap_or("completed"),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({ "id": id, "message": "Payment recorded" })))
}

async fn list_payments(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&state.db, &credentials).await?;
    let payments = db::bookings::payments_for_booking(&state.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payments))
}
