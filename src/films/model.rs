use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Film {
    pub id: i32,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub genre: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload. Absent fields decode as empty so the required
/// field check reports them instead of the JSON decoder.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilmRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub genre: String,
}

impl FilmRequest {
    pub fn new(title: &str, director: &str, year: i32, genre: &str) -> Self {
        Self {
            title: title.to_string(),
            director: director.to_string(),
            year,
            genre: genre.to_string(),
        }
    }

    /// Title, director and a non-zero year are mandatory; genre is optional.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() || self.director.is_empty() || self.year == 0 {
            return Err(ValidationError::MissingFilmFields);
        }
        Ok(())
    }
}

/// Catalog contents for a fresh store
pub fn sample_films() -> Vec<FilmRequest> {
    vec![
        FilmRequest::new("The Shawshank Redemption", "Frank Darabont", 1994, "Drama"),
        FilmRequest::new("The Godfather", "Francis Ford Coppola", 1972, "Crime"),
        FilmRequest::new("The Dark Knight", "Christopher Nolan", 2008, "Action"),
        FilmRequest::new("Pulp Fiction", "Quentin Tarantino", 1994, "Crime"),
        FilmRequest::new("Forrest Gump", "Robert Zemeckis", 1994, "Drama"),
    ]
}
