pub use crate::auth::repo_types::User;
use sqlx::PgPool;

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, last_activity, last_activity_at, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with a hashed password and an initial activity label.
    pub async fn create(
        db: &PgPool,
        username: &str,
        password_hash: &str,
        activity: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, last_activity)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, last_activity, last_activity_at, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(activity)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Stamp the user's last activity with a new label and the current time.
    /// Returns the updated record, or `None` if the user no longer exists.
    pub async fn touch_activity(
        db: &PgPool,
        username: &str,
        activity: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET last_activity = $2, last_activity_at = now()
            WHERE username = $1
            RETURNING id, username, password_hash, last_activity, last_activity_at, created_at
            "#,
        )
        .bind(username)
        .bind(activity)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}
