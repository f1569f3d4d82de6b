/// Film storage
///
/// `InMemory` keeps the catalog in process and starts from the sample films.
/// `Postgres` works against the `films` table; deletes are soft
/// (`deleted_at` is set) and every read skips soft-deleted rows.

use chrono::Utc;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::model::{sample_films, Film, FilmRequest};
use crate::error::AppError;

pub enum FilmRepository {
    InMemory(InMemoryFilms),
    Postgres(PgPool),
}

impl FilmRepository {
    pub fn in_memory() -> Self {
        FilmRepository::InMemory(InMemoryFilms::seeded())
    }

    pub async fn list(&self) -> Result<Vec<Film>, AppError> {
        match self {
            FilmRepository::InMemory(films) => Ok(films.list()),
            FilmRepository::Postgres(pool) => {
                let films = sqlx::query_as::<_, Film>(
                    r#"
                    SELECT id, title, director, year, genre, created_at, updated_at
                    FROM films
                    WHERE deleted_at IS NULL
                    ORDER BY id
                    "#,
                )
                .fetch_all(pool)
                .await?;
                Ok(films)
            }
        }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Film>, AppError> {
        match self {
            FilmRepository::InMemory(films) => Ok(films.get(id)),
            FilmRepository::Postgres(pool) => {
                let film = sqlx::query_as::<_, Film>(
                    r#"
                    SELECT id, title, director, year, genre, created_at, updated_at
                    FROM films
                    WHERE id = $1 AND deleted_at IS NULL
                    "#,
                )
                .bind(id)
                .fetch_optional(pool)
                .await?;
                Ok(film)
            }
        }
    }

    pub async fn create(&self, request: &FilmRequest) -> Result<Film, AppError> {
        match self {
            FilmRepository::InMemory(films) => Ok(films.create(request)),
            FilmRepository::Postgres(pool) => {
                let film = sqlx::query_as::<_, Film>(
                    r#"
                    INSERT INTO films (title, director, year, genre, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $5)
                    RETURNING id, title, director, year, genre, created_at, updated_at
                    "#,
                )
                .bind(&request.title)
                .bind(&request.director)
                .bind(request.year)
                .bind(&request.genre)
                .bind(Utc::now())
                .fetch_one(pool)
                .await?;
                Ok(film)
            }
        }
    }

    /// Replace every editable field. `None` when no such film.
    pub async fn update(&self, id: i32, request: &FilmRequest) -> Result<Option<Film>, AppError> {
        match self {
            FilmRepository::InMemory(films) => Ok(films.update(id, request)),
            FilmRepository::Postgres(pool) => {
                let film = sqlx::query_as::<_, Film>(
                    r#"
                    UPDATE films
                    SET title = $2, director = $3, year = $4, genre = $5, updated_at = $6
                    WHERE id = $1 AND deleted_at IS NULL
                    RETURNING id, title, director, year, genre, created_at, updated_at
                    "#,
                )
                .bind(id)
                .bind(&request.title)
                .bind(&request.director)
                .bind(request.year)
                .bind(&request.genre)
                .bind(Utc::now())
                .fetch_optional(pool)
                .await?;
                Ok(film)
            }
        }
    }

    /// `false` when no such film.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        match self {
            FilmRepository::InMemory(films) => Ok(films.delete(id)),
            FilmRepository::Postgres(pool) => {
                let result = sqlx::query(
                    "UPDATE films SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL",
                )
                .bind(id)
                .bind(Utc::now())
                .execute(pool)
                .await?;
                Ok(result.rows_affected() > 0)
            }
        }
    }
}

/// Insert the sample films when the table holds no live rows.
pub async fn seed_films(pool: &PgPool) -> Result<(), AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM films WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        tracing::info!(count, "Film catalog already populated, skipping seed");
        return Ok(());
    }

    let repository = FilmRepository::Postgres(pool.clone());
    let samples = sample_films();
    for film in &samples {
        repository.create(film).await?;
    }

    tracing::info!(count = samples.len(), "Seeded film catalog");
    Ok(())
}

struct FilmTable {
    films: BTreeMap<i32, Film>,
    next_id: i32,
}

pub struct InMemoryFilms {
    table: RwLock<FilmTable>,
}

impl Default for InMemoryFilms {
    fn default() -> Self {
        Self::empty()
    }
}

impl InMemoryFilms {
    pub fn empty() -> Self {
        Self {
            table: RwLock::new(FilmTable {
                films: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn seeded() -> Self {
        let store = Self::empty();
        for film in sample_films() {
            store.create(&film);
        }
        store
    }

    fn list(&self) -> Vec<Film> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.films.values().cloned().collect()
    }

    fn get(&self, id: i32) -> Option<Film> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.films.get(&id).cloned()
    }

    fn create(&self, request: &FilmRequest) -> Film {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        let film = Film {
            id: table.next_id,
            title: request.title.clone(),
            director: request.director.clone(),
            year: request.year,
            genre: request.genre.clone(),
            created_at: now,
            updated_at: now,
        };
        table.films.insert(film.id, film.clone());
        table.next_id += 1;
        film
    }

    fn update(&self, id: i32, request: &FilmRequest) -> Option<Film> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let film = table.films.get_mut(&id)?;
        film.title = request.title.clone();
        film.director = request.director.clone();
        film.year = request.year;
        film.genre = request.genre.clone();
        film.updated_at = Utc::now();
        Some(film.clone())
    }

    fn delete(&self, id: i32) -> bool {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.films.remove(&id).is_some()
    }
}
