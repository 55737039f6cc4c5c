use actix_web::{web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Deserialize;
use serde_json::json;

use crate::{auth::admin_validator, db, error::ApiError, state::AppState};

#[derive(Deserialize)]
struct ProductPayload {
    name: String,
    price: f64,
    stock: Option<i64>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .wrap(HttpAuthentication::basic(admin_validator))
            .service(
                web::resource("/")
                    .route(web::get().to(list_products))
                    .route(web::post().to(create_product)),
            ),
    );
}

async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let products = db::catalog::list_products(&state.db).await?;
    Ok(HttpResponse::Ok().json(products))
}

async fn create_product(
    state: web::Data<AppState>,
    payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let id = db::catalog::create_product(
        &state.db,
        &payload.name,
        payload.price,
        payload.stock.unwrap_or(0),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({ "id": id, "message": "Product created successfully" })))
}
