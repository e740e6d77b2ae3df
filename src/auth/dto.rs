use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo::User;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Envelope data for signup and login responses.
#[derive(Debug, Serialize)]
pub struct AuthData {
    pub username: String,
}

/// Timestamped label of the most recent user action.
#[derive(Debug, Serialize)]
pub struct LastActivity {
    pub activity: String,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

/// Envelope data for the profile response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub username: String,
    pub last_activity: LastActivity,
}

impl From<User> for ProfileData {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            last_activity: LastActivity {
                activity: user.last_activity,
                time: user.last_activity_at,
            },
        }
    }
}
