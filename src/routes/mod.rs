mod films;
mod session;

pub use films::{create_film, delete_film, get_film, list_films, update_film};
pub use session::{login, logout, LoginRequest, LoginResponse, MessageResponse};

use actix_web::{http::Method, web, HttpResponse};

use crate::auth::TokenStore;
use crate::error::{json_error_handler, method_not_allowed, path_error_handler};
use crate::middleware::{cors_headers, preflight_response, SessionAuth};

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Register the API: public health and session endpoints, then the film
/// routes behind the session guard.
pub fn configure(cfg: &mut web::ServiceConfig, tokens: web::Data<TokenStore>) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .route("/health_check", web::get().to(health_check))
        .service(
            web::resource("/api/login")
                .wrap(cors_headers())
                .route(web::post().to(login))
                .route(web::method(Method::OPTIONS).to(preflight_response))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/api/logout")
                .wrap(cors_headers())
                .route(web::post().to(logout))
                .route(web::method(Method::OPTIONS).to(preflight_response))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::scope("/api/films")
                .wrap(SessionAuth::new(tokens))
                .service(
                    web::resource("")
                        .route(web::get().to(list_films))
                        .route(web::post().to(create_film))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(get_film))
                        .route(web::put().to(update_film))
                        .route(web::delete().to(delete_film))
                        .default_service(web::to(method_not_allowed)),
                ),
        );
}
