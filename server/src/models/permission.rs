// server/src/models/permission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMenuGrant {
  pub sub_menu_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuGrant {
  pub menu_id: Uuid,
  #[serde(default)]
  pub sub_menus: Vec<SubMenuGrant>,
}

/// Which navigation nodes a role may see. One row per role
/// (upsert-by-role, full replace of `menus_access`).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RolePermission {
  pub id: Uuid,
  pub role_id: Uuid,
  pub menus_access: Json<Vec<MenuGrant>>,
  pub updated_at: DateTime<Utc>,
}
