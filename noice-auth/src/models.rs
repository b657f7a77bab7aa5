use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{pending_registrations, users};

// --- Users ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = users)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub provider: String,
    pub avatar: Option<String>,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub reset_code: Option<String>,
    #[serde(skip_serializing)]
    pub reset_code_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub provider: String,
    pub is_verified: bool,
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChanges {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub password_hash: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// --- Pending Registrations ---

#[derive(Debug, Queryable, Identifiable)]
#[diesel(table_name = pending_registrations)]
pub struct PendingRegistration {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pending_registrations)]
pub struct NewPendingRegistration {
    pub email: String,
    pub code: String,
    pub name: String,
    pub password_hash: String,
    pub expires_at: DateTime<Utc>,
}
