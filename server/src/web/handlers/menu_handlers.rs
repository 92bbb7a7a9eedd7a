// server/src/web/handlers/menu_handlers.rs

//! Navigation menus, roles, and role->menu permission grants.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::types::Json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Menu, MenuGrant, Role, RolePermission, SubMenu};
use crate::state::AppState;
use crate::web::extractors::AdminUser;
use crate::web::{created_data, ok_data, ok_message};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MenuPayload {
  pub title: String,
  pub path: String,
  #[serde(default)]
  pub position: i32,
  #[serde(default)]
  pub sub_menus: Vec<SubMenuPayload>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubMenuPayload {
  #[serde(default)]
  pub id: Option<Uuid>,
  pub title: String,
  pub path: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPayload {
  pub menus_access: Vec<MenuGrant>,
}

fn materialize_sub_menus(payload: Vec<SubMenuPayload>) -> Vec<SubMenu> {
  payload
    .into_iter()
    .map(|s| SubMenu {
      id: s.id.unwrap_or_else(Uuid::new_v4),
      title: s.title,
      path: s.path,
    })
    .collect()
}

// --- Menus ---

#[instrument(name = "handler::list_menus", skip(app_state))]
pub async fn list_menus_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let menus = sqlx::query_as::<_, Menu>("SELECT * FROM menus ORDER BY position, title")
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(ok_data(menus))
}

#[instrument(name = "handler::create_menu", skip(app_state, _admin, req_payload))]
pub async fn create_menu_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  req_payload: web::Json<MenuPayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  if p.title.trim().is_empty() {
    return Err(AppError::Validation("Menu title is required.".to_string()));
  }

  let menu = sqlx::query_as::<_, Menu>(
    "INSERT INTO menus (title, path, position, sub_menus) \
     VALUES ($1, $2, $3, $4) \
     RETURNING *",
  )
  .bind(&p.title)
  .bind(&p.path)
  .bind(p.position)
  .bind(Json(materialize_sub_menus(p.sub_menus)))
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(created_data(menu))
}

#[instrument(name = "handler::update_menu", skip(app_state, _admin, req_payload))]
pub async fn update_menu_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<MenuPayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  let menu = sqlx::query_as::<_, Menu>(
    "UPDATE menus \
     SET title = $2, path = $3, position = $4, sub_menus = $5, updated_at = now() \
     WHERE id = $1 \
     RETURNING *",
  )
  .bind(path.into_inner())
  .bind(&p.title)
  .bind(&p.path)
  .bind(p.position)
  .bind(Json(materialize_sub_menus(p.sub_menus)))
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound("Menu not found.".to_string()))?;

  Ok(ok_data(menu))
}

#[instrument(name = "handler::delete_menu", skip(app_state, _admin))]
pub async fn delete_menu_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let deleted = sqlx::query("DELETE FROM menus WHERE id = $1")
    .bind(path.into_inner())
    .execute(&app_state.db_pool)
    .await?;
  if deleted.rows_affected() == 0 {
    return Err(AppError::NotFound("Menu not found.".to_string()));
  }
  Ok(ok_message("Menu deleted."))
}

// --- Roles ---

#[instrument(name = "handler::list_roles", skip(app_state, _admin))]
pub async fn list_roles_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY name")
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(ok_data(roles))
}

// --- Permissions ---

#[instrument(name = "handler::list_permissions", skip(app_state, _admin))]
pub async fn list_permissions_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let permissions =
    sqlx::query_as::<_, RolePermission>("SELECT * FROM role_permissions ORDER BY updated_at DESC")
      .fetch_all(&app_state.db_pool)
      .await?;
  Ok(ok_data(permissions))
}

#[instrument(name = "handler::get_permission", skip(app_state, _admin))]
pub async fn get_permission_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let permission =
    sqlx::query_as::<_, RolePermission>("SELECT * FROM role_permissions WHERE role_id = $1")
      .bind(path.into_inner())
      .fetch_optional(&app_state.db_pool)
      .await?
      .ok_or_else(|| AppError::NotFound("No permissions recorded for this role.".to_string()))?;
  Ok(ok_data(permission))
}

/// Upsert-by-role: replaces the role's entire `menus_access` array (full
/// replace, not merge). Idempotent on identical input.
#[instrument(name = "handler::upsert_permission", skip(app_state, _admin, req_payload))]
pub async fn upsert_permission_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<PermissionPayload>,
) -> Result<HttpResponse, AppError> {
  let role_id = path.into_inner();
  let p = req_payload.into_inner();

  let role_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE id = $1)")
    .bind(role_id)
    .fetch_one(&app_state.db_pool)
    .await?;
  if !role_exists {
    return Err(AppError::NotFound("Role not found.".to_string()));
  }

  // Every referenced menu must exist before anything is written.
  let menu_ids: Vec<Uuid> = p.menus_access.iter().map(|g| g.menu_id).collect();
  if !menu_ids.is_empty() {
    let known: i64 = sqlx::query_scalar("SELECT count(*) FROM menus WHERE id = ANY($1)")
      .bind(&menu_ids)
      .fetch_one(&app_state.db_pool)
      .await?;
    if known != menu_ids.len() as i64 {
      return Err(AppError::Validation(
        "Permission grant references unknown menu ids.".to_string(),
      ));
    }
  }

  let permission = sqlx::query_as::<_, RolePermission>(
    "INSERT INTO role_permissions (role_id, menus_access) \
     VALUES ($1, $2) \
     ON CONFLICT (role_id) \
     DO UPDATE SET menus_access = EXCLUDED.menus_access, updated_at = now() \
     RETURNING *",
  )
  .bind(role_id)
  .bind(Json(p.menus_access))
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(role_id = %role_id, "Role permissions replaced.");
  Ok(ok_data(permission))
}
