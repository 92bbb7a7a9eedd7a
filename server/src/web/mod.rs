// server/src/web/mod.rs

pub mod extractors;
pub mod handlers;
pub mod routes;

pub use routes::configure_app_routes;

use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

/// `200 OK` envelope: `{"success": true, "data": ...}`.
pub fn ok_data<T: Serialize>(data: T) -> HttpResponse {
  HttpResponse::Ok().json(json!({"success": true, "data": data}))
}

/// `201 Created` envelope.
pub fn created_data<T: Serialize>(data: T) -> HttpResponse {
  HttpResponse::Created().json(json!({"success": true, "data": data}))
}

/// `200 OK` envelope carrying only a message.
pub fn ok_message(message: &str) -> HttpResponse {
  HttpResponse::Ok().json(json!({"success": true, "message": message}))
}
