use actix_web::{web, HttpResponse};
use actix_web_httpauth::extractors::basic::BasicAuth;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::{hash_password, require_user},
    db,
    error::ApiError,
    state::AppState,
};

#[derive(Deserialize)]
struct RegisterPayload {
    email: String,
    password: String,
    full_name: String,
}

#[derive(Deserialize)]
struct CustomerPayload {
    phone: Option<String>,
    address: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users/").route(web::post().to(register)))
        .service(web::resource("/token").route(web::post().to(token)))
        .service(web::resource("/users/me").route(web::get().to(me)))
        .service(
            web::resource("/customers/me")
                .route(web::get().to(customer_profile))
                .route(web::put().to(save_customer_profile)),
        );
}

fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterPayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    if !valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password is required".to_string()));
    }

    if db::users::get_user_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash =
        hash_password(&payload.password).map_err(|_| ApiError::Internal("password hash failed"))?;

    // Unique-key backstop in case of a concurrent registration.
    db::users::create_user(&state.db, &payload.email, &password_hash, &payload.full_name).await?;

    Ok(HttpResponse::Created().json(json!({ "message": "User created successfully" })))
}

/// Login alias. Credentials ride on the Basic header; the response is the
/// caller's own record with the hash stripped and the admin flag attached.
async fn token(
    state: web::Data<AppState>,
    credentials: BasicAuth,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&state.db, &credentials).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn me(state: web::Data<AppState>, credentials: BasicAuth) -> Result<HttpResponse, ApiError> {
    let user = require_user(&state.db, &credentials).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn customer_profile(
    state: web::Data<AppState>,
    credentials: BasicAuth,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&state.db, &credentials).await?;
    let profile = db::users::get_customer_by_user(&state.db, user.id)
        .await?
        .ok_or(ApiError::NotFound("Customer profile"))?;
    Ok(HttpResponse::Ok().json(profile))
}

async fn save_customer_profile(
    state: web::Data<AppState>,
    credentials: BasicAuth,
    payload: web::Json<CustomerPayload>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&state.db, &credentials).await?;
    let payload = payload.into_inner();
    db::users::upsert_customer(
        &state.db,
        user.id,
        payload.phone.as_deref(),
        payload.address.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Profile saved" })))
}
