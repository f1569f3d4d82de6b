/// Bearer Header Parsing
///
/// The single place the `Authorization: Bearer <token>` shape is checked.
/// Used by the session middleware and by the logout endpoint.

use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::{AppError, AuthError};

const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerError {
    MissingHeader,
    MalformedHeader,
}

impl From<BearerError> for AuthError {
    fn from(err: BearerError) -> Self {
        match err {
            BearerError::MissingHeader => AuthError::MissingHeader,
            BearerError::MalformedHeader => AuthError::MalformedHeader,
        }
    }
}

impl From<BearerError> for AppError {
    fn from(err: BearerError) -> Self {
        AppError::Auth(err.into())
    }
}

/// Pull the token out of an `Authorization` header.
///
/// The value is split on single spaces and must be exactly `Bearer <token>`.
/// An empty header counts as missing.
pub fn extract_bearer_token(headers: &header::HeaderMap) -> Result<String, BearerError> {
    let value = match headers.get(header::AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(BearerError::MissingHeader),
    };

    let value = value.to_str().map_err(|_| BearerError::MalformedHeader)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if *scheme == BEARER_SCHEME => Ok((*token).to_string()),
        _ => Err(BearerError::MalformedHeader),
    }
}

/// Extractor for handlers that need the presented token but not its validity
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for BearerToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            extract_bearer_token(req.headers())
                .map(BearerToken)
                .map_err(AppError::from),
        )
    }
}
