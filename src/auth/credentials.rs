/// Credential Validation
///
/// Plain, case-sensitive equality against the stored password. No hashing,
/// lockout or rate limiting.

use crate::users::UserDirectory;

/// True only when `username` exists and its password equals `password`.
///
/// A failed lookup is logged and treated as a mismatch.
pub async fn validate_credentials(
    directory: &UserDirectory,
    username: &str,
    password: &str,
) -> bool {
    match directory.find_password(username).await {
        Ok(Some(stored)) => stored == password,
        Ok(None) => false,
        Err(e) => {
            tracing::error!(error = %e, "User lookup failed during login");
            false
        }
    }
}
