// server/src/models/menu.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A navigation child node, stored inline on its menu as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMenu {
  pub id: Uuid,
  pub title: String,
  pub path: String,
}

/// A top-level navigation node.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
  pub id: Uuid,
  pub title: String,
  pub path: String,
  pub position: i32,
  pub sub_menus: Json<Vec<SubMenu>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
