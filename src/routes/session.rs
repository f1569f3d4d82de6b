/// Session Routes
///
/// Issues and revokes bearer tokens.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{validate_credentials, BearerToken, TokenStore};
use crate::error::{AppError, AuthError, ValidationError};
use crate::users::UserDirectory;

/// Login payload. Absent fields decode as empty and are reported by the
/// required-field check.
#[derive(Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/login
///
/// # Errors
/// - 400: Body is not a JSON object, or username/password is empty
/// - 401: Unknown user or wrong password
/// - 405: Any method other than POST (via the resource default service)
pub async fn login(
    form: web::Json<LoginRequest>,
    users: web::Data<UserDirectory>,
    tokens: web::Data<TokenStore>,
) -> Result<HttpResponse, AppError> {
    if form.username.is_empty() || form.password.is_empty() {
        return Err(ValidationError::MissingCredentials.into());
    }

    if !validate_credentials(&users, &form.username, &form.password).await {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = tokens.generate();
    tokens.add(&token);

    tracing::info!(username = %form.username, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

/// POST /api/logout
///
/// Revokes the presented token. Succeeds whether or not the token was live.
///
/// # Errors
/// - 401: Missing or malformed `Authorization` header
/// - 405: Any method other than POST
pub async fn logout(
    token: BearerToken,
    tokens: web::Data<TokenStore>,
) -> Result<HttpResponse, AppError> {
    tokens.remove(token.as_str());

    tracing::info!("Session revoked");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}
