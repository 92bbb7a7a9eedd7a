// server/src/web/handlers/catalog_handlers.rs

//! CRUD over the purchasable catalogs: service offerings and hosting
//! packages. Reads are public; writes are admin-only.

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{HostingPackage, Service, ServicePackage};
use crate::state::AppState;
use crate::web::extractors::AdminUser;
use crate::web::{created_data, ok_data, ok_message};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
  pub service_title: String,
  pub service_icon: String,
  #[serde(default)]
  pub packages: Vec<ServicePackage>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HostingPackagePayload {
  pub name: String,
  pub description: String,
  pub price: Decimal,
  #[serde(default)]
  pub features: Vec<String>,
}

// --- Services ---

#[instrument(name = "handler::list_services", skip(app_state))]
pub async fn list_services_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let services = sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY created_at DESC")
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(ok_data(services))
}

#[instrument(name = "handler::get_service", skip(app_state))]
pub async fn get_service_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
    .bind(path.into_inner())
    .fetch_optional(&app_state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Service not found.".to_string()))?;
  Ok(ok_data(service))
}

#[instrument(name = "handler::create_service", skip(app_state, _admin, req_payload))]
pub async fn create_service_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  req_payload: web::Json<ServicePayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  if p.service_title.trim().is_empty() {
    return Err(AppError::Validation("Service title is required.".to_string()));
  }

  let service = sqlx::query_as::<_, Service>(
    "INSERT INTO services (service_title, service_icon, packages) \
     VALUES ($1, $2, $3) \
     RETURNING *",
  )
  .bind(&p.service_title)
  .bind(&p.service_icon)
  .bind(Json(p.packages))
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(created_data(service))
}

#[instrument(name = "handler::update_service", skip(app_state, _admin, req_payload))]
pub async fn update_service_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<ServicePayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  let service = sqlx::query_as::<_, Service>(
    "UPDATE services \
     SET service_title = $2, service_icon = $3, packages = $4, updated_at = now() \
     WHERE id = $1 \
     RETURNING *",
  )
  .bind(path.into_inner())
  .bind(&p.service_title)
  .bind(&p.service_icon)
  .bind(Json(p.packages))
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound("Service not found.".to_string()))?;

  Ok(ok_data(service))
}

#[instrument(name = "handler::delete_service", skip(app_state, _admin))]
pub async fn delete_service_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let deleted = sqlx::query("DELETE FROM services WHERE id = $1")
    .bind(path.into_inner())
    .execute(&app_state.db_pool)
    .await?;
  if deleted.rows_affected() == 0 {
    return Err(AppError::NotFound("Service not found.".to_string()));
  }
  Ok(ok_message("Service deleted."))
}

// --- Hosting Packages ---

#[instrument(name = "handler::list_hosting_packages", skip(app_state))]
pub async fn list_hosting_packages_handler(
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let packages =
    sqlx::query_as::<_, HostingPackage>("SELECT * FROM hosting_packages ORDER BY price")
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(ok_data(packages))
}

#[instrument(name = "handler::get_hosting_package", skip(app_state))]
pub async fn get_hosting_package_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let package = sqlx::query_as::<_, HostingPackage>("SELECT * FROM hosting_packages WHERE id = $1")
    .bind(path.into_inner())
    .fetch_optional(&app_state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Hosting package not found.".to_string()))?;
  Ok(ok_data(package))
}

#[instrument(name = "handler::create_hosting_package", skip(app_state, _admin, req_payload))]
pub async fn create_hosting_package_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  req_payload: web::Json<HostingPackagePayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  if p.name.trim().is_empty() {
    return Err(AppError::Validation("Package name is required.".to_string()));
  }
  if p.price <= Decimal::ZERO {
    return Err(AppError::Validation("Package price must be positive.".to_string()));
  }

  let package = sqlx::query_as::<_, HostingPackage>(
    "INSERT INTO hosting_packages (name, description, price, features) \
     VALUES ($1, $2, $3, $4) \
     RETURNING *",
  )
  .bind(&p.name)
  .bind(&p.description)
  .bind(p.price)
  .bind(Json(p.features))
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(created_data(package))
}

#[instrument(name = "handler::update_hosting_package", skip(app_state, _admin, req_payload))]
pub async fn update_hosting_package_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<HostingPackagePayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  let package = sqlx::query_as::<_, HostingPackage>(
    "UPDATE hosting_packages \
     SET name = $2, description = $3, price = $4, features = $5, updated_at = now() \
     WHERE id = $1 \
     RETURNING *",
  )
  .bind(path.into_inner())
  .bind(&p.name)
  .bind(&p.description)
  .bind(p.price)
  .bind(Json(p.features))
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound("Hosting package not found.".to_string()))?;

  Ok(ok_data(package))
}

#[instrument(name = "handler::delete_hosting_package", skip(app_state, _admin))]
pub async fn delete_hosting_package_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let deleted = sqlx::query("DELETE FROM hosting_packages WHERE id = $1")
    .bind(path.into_inner())
    .execute(&app_state.db_pool)
    .await?;
  if deleted.rows_affected() == 0 {
    return Err(AppError::NotFound("Hosting package not found.".to_string()));
  }
  Ok(ok_message("Hosting package deleted."))
}
