use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                       // surrogate key
    pub username: String,               // unique by convention only, no index
    #[serde(skip_serializing)]
    pub password_hash: String,          // Argon2 hash, not exposed in JSON
    pub last_activity: String,          // label of the most recent action
    pub last_activity_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}
