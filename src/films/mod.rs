/// Film catalog
///
/// Record types and the storage backends behind the protected `/api/films`
/// routes.

mod model;
mod repository;

pub use model::sample_films;
pub use model::Film;
pub use model::FilmRequest;
pub use repository::seed_films;
pub use repository::FilmRepository;
pub use repository::InMemoryFilms;
