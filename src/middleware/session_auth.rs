/// Session Authentication Middleware
///
/// Guards protected routes with the session token store. Per request:
/// 1. CORS headers go on whatever response is produced
/// 2. `OPTIONS` preflights are answered here with an empty 200
/// 3. The `Authorization: Bearer <token>` header must be present and well formed
/// 4. The token must be live in the store
///
/// Only when all checks pass is the wrapped service called.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpResponse, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use super::cors::apply_cors_headers;
use crate::auth::{extract_bearer_token, TokenStore};
use crate::error::{AppError, AuthError};

pub struct SessionAuth {
    tokens: web::Data<TokenStore>,
}

impl SessionAuth {
    pub fn new(tokens: web::Data<TokenStore>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(SessionAuthService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct SessionAuthService<S> {
    service: Rc<S>,
    tokens: web::Data<TokenStore>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() == Method::OPTIONS {
            let mut response = HttpResponse::Ok().finish();
            apply_cors_headers(response.headers_mut());
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        let token = match extract_bearer_token(req.headers()) {
            Ok(token) => token,
            Err(e) => return reject(req, e.into()),
        };

        if !self.tokens.validate(&token) {
            return reject(req, AuthError::InvalidToken);
        }

        tracing::debug!(path = %req.path(), "Session token accepted");

        let service = self.service.clone();
        Box::pin(async move {
            let mut res = service.call(req).await?;
            apply_cors_headers(res.headers_mut());
            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B: 'static>(
    req: ServiceRequest,
    reason: AuthError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
    let mut response = AppError::Auth(reason).error_response();
    apply_cors_headers(response.headers_mut());
    Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
}
