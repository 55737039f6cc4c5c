use actix_web::{web, HttpResponse};

pub mod analytics;
pub mod bookings;
pub mod products;
pub mod reviews;
pub mod rooms;
pub mod services;
pub mod staff;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    users::configure(cfg);
    services::configure(cfg);
    bookings::configure(cfg);
    staff::configure(cfg);
    rooms::configure(cfg);
    products::configure(cfg);
    reviews::configure(cfg);
    analytics::configure(cfg);
    cfg.service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}
