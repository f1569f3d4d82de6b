use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use std::path::PathBuf;

use crate::auth::TokenStore;
use crate::configuration::{DatabaseSettings, Settings, StorageBackend};
use crate::error::AppError;
use crate::films::{seed_films, FilmRepository};
use crate::logger::RequestTrace;
use crate::routes;
use crate::users::{seed_users, UserDirectory};

/// Everything the request handlers share, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub tokens: web::Data<TokenStore>,
    pub users: web::Data<UserDirectory>,
    pub films: web::Data<FilmRepository>,
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(tokens: TokenStore, users: UserDirectory, films: FilmRepository) -> Self {
        Self {
            tokens: web::Data::new(tokens),
            users: web::Data::new(users),
            films: web::Data::new(films),
            static_dir: None,
        }
    }

    pub fn with_static_dir(mut self, dir: PathBuf) -> Self {
        self.static_dir = Some(dir);
        self
    }

    /// Build the user registry and film repository for the configured backend.
    /// The token store always starts empty.
    pub async fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let (users, films) = match settings.storage.backend {
            StorageBackend::Memory => {
                tracing::info!(users = settings.users.len(), "Using in-memory storage");
                (
                    UserDirectory::Static(settings.users.clone()),
                    FilmRepository::in_memory(),
                )
            }
            StorageBackend::Postgres => {
                let database = settings
                    .require_database()
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                let pool = connect_database(database).await?;
                seed_users(&pool, &settings.users).await?;
                seed_films(&pool).await?;
                (
                    UserDirectory::Postgres(pool.clone()),
                    FilmRepository::Postgres(pool),
                )
            }
        };

        Ok(Self::new(TokenStore::new(), users, films)
            .with_static_dir(settings.application.static_dir.clone()))
    }
}

/// Connect to Postgres and apply pending migrations.
pub async fn connect_database(settings: &DatabaseSettings) -> Result<PgPool, AppError> {
    tracing::info!(host = %settings.host, database = %settings.database_name, "Connecting to database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.connection_string())
        .await?;

    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to migrate database: {}", e)))?;

    Ok(pool)
}

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let server = HttpServer::new(move || {
        let tokens = state.tokens.clone();
        let app = App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(RequestTrace)
            // Shared state
            .app_data(state.tokens.clone())
            .app_data(state.users.clone())
            .app_data(state.films.clone())
            .configure(|cfg| routes::configure(cfg, tokens));

        // Static file serving (must be last to not override API routes)
        match &state.static_dir {
            Some(dir) => app.service(fs::Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .listen(listener)?
    .run();

    Ok(server)
}
