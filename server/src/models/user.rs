// server/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// The fixed role set. Matches the `role_name` enum in schema.sql.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "role_name", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
  Admin,
  Manager,
  User,
}

impl RoleName {
  pub fn as_str(&self) -> &'static str {
    match self {
      RoleName::Admin => "admin",
      RoleName::Manager => "manager",
      RoleName::User => "user",
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Role {
  pub id: Uuid,
  pub name: RoleName,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub fullname: String,
  /// Stored lowercased; uniqueness enforced by the store.
  pub email: String,
  #[serde(skip_serializing)] // Never send the password hash to a client.
  pub password_hash: String,
  pub phone: String,
  pub company_name: Option<String>,
  pub address: Option<String>,
  pub city: Option<String>,
  pub country: Option<String>,
  pub role_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
