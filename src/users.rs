/// User registry lookups
///
/// Login only needs "what is the password for this username". The answer
/// comes either from the configured user list or from the `users` table.

use sqlx::PgPool;

use crate::configuration::UserCredential;
use crate::error::AppError;

pub enum UserDirectory {
    Static(Vec<UserCredential>),
    Postgres(PgPool),
}

impl UserDirectory {
    /// Stored password for `username`, if such a user exists.
    pub async fn find_password(&self, username: &str) -> Result<Option<String>, AppError> {
        match self {
            UserDirectory::Static(users) => Ok(users
                .iter()
                .find(|user| user.username == username)
                .map(|user| user.password.clone())),
            UserDirectory::Postgres(pool) => {
                let password = sqlx::query_scalar::<_, String>(
                    "SELECT password FROM users WHERE username = $1 AND deleted_at IS NULL",
                )
                .bind(username)
                .fetch_optional(pool)
                .await?;
                Ok(password)
            }
        }
    }
}

/// Insert configured users that are not in the `users` table yet.
pub async fn seed_users(pool: &PgPool, users: &[UserCredential]) -> Result<(), AppError> {
    for user in users {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, created_at, updated_at)
            VALUES ($1, $2, now(), now())
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(username = %user.username, "Seeded user");
        }
    }

    Ok(())
}
