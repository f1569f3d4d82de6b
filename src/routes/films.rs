/// Film Routes
///
/// CRUD over the catalog. Mounted under the session guard, so every handler
/// here runs only for requests carrying a live token.

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::films::{FilmRepository, FilmRequest};

fn film_not_found() -> AppError {
    AppError::NotFound("Film not found".to_string())
}

/// GET /api/films
pub async fn list_films(films: web::Data<FilmRepository>) -> Result<HttpResponse, AppError> {
    let films = films.list().await?;
    Ok(HttpResponse::Ok().json(films))
}

/// GET /api/films/{id}
pub async fn get_film(
    path: web::Path<i32>,
    films: web::Data<FilmRepository>,
) -> Result<HttpResponse, AppError> {
    let film = films
        .get(path.into_inner())
        .await?
        .ok_or_else(film_not_found)?;
    Ok(HttpResponse::Ok().json(film))
}

/// POST /api/films
///
/// # Errors
/// - 400: Invalid JSON, or title/director/year missing
pub async fn create_film(
    form: web::Json<FilmRequest>,
    films: web::Data<FilmRepository>,
) -> Result<HttpResponse, AppError> {
    form.validate()?;

    let film = films.create(&form).await?;
    tracing::info!(film_id = film.id, "Film created");

    Ok(HttpResponse::Created().json(film))
}

/// PUT /api/films/{id}
///
/// # Errors
/// - 400: Non-numeric id, invalid JSON, or required fields missing
/// - 404: No film with this id
pub async fn update_film(
    path: web::Path<i32>,
    form: web::Json<FilmRequest>,
    films: web::Data<FilmRepository>,
) -> Result<HttpResponse, AppError> {
    form.validate()?;

    let id = path.into_inner();
    let film = films.update(id, &form).await?.ok_or_else(film_not_found)?;
    tracing::info!(film_id = id, "Film updated");

    Ok(HttpResponse::Ok().json(film))
}

/// DELETE /api/films/{id}
///
/// # Errors
/// - 400: Non-numeric id
/// - 404: No film with this id
pub async fn delete_film(
    path: web::Path<i32>,
    films: web::Data<FilmRepository>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !films.delete(id).await? {
        return Err(film_not_found());
    }
    tracing::info!(film_id = id, "Film deleted");

    Ok(HttpResponse::NoContent().finish())
}
