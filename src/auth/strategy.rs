use sqlx::PgPool;
use tracing::warn;

use crate::auth::password::verify_password;
use crate::auth::repo::User;

/// Why a credential check failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User {0} doesn't exist ! Signup first !")]
    UnknownUser(String),
    #[error("Incorrect Password !")]
    WrongPassword,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Local credential check: look the user up by username and compare the
/// submitted password against the stored hash.
pub async fn verify_credentials(
    db: &PgPool,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = User::find_by_username(db, username)
        .await?
        .ok_or_else(|| {
            warn!(username = %username, "login unknown username");
            AuthError::UnknownUser(username.to_string())
        })?;

    if !verify_password(password, &user.password_hash)? {
        warn!(username = %username, "login invalid password");
        return Err(AuthError::WrongPassword);
    }

    Ok(user)
}
