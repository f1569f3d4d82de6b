//! Storage tests against a real Postgres server.
//!
//! Each test creates its own database named by a fresh UUID on the server
//! from `configuration.yaml` and runs the migrations into it. When nothing
//! listens at that address the tests return early without asserting.

use std::net::TcpListener;

use chrono::{DateTime, Utc};
use film_api::auth::validate_credentials;
use film_api::configuration::{get_configuration, DatabaseSettings, Settings, StorageBackend};
use film_api::films::{sample_films, seed_films, FilmRepository, FilmRequest};
use film_api::startup::{run, AppState};
use film_api::users::{seed_users, UserDirectory};
use serde_json::Value;
use sqlx::{Connection, Executor, PgConnection, PgPool};

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub client: reqwest::Client,
}

/// Settings pointing at a new, uniquely named database with the postgres backend selected
fn test_settings() -> Settings {
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.storage.backend = StorageBackend::Postgres;
    configuration
        .database
        .as_mut()
        .expect("configuration.yaml has no database section")
        .database_name = uuid::Uuid::new_v4().to_string();
    configuration
}

/// Create and migrate the database named in `config`.
/// `None` when the Postgres server cannot be reached at all.
pub async fn configure_database(config: &DatabaseSettings) -> Option<PgPool> {
    // Create database
    let mut connection = match PgConnection::connect(&config.connection_string_without_db()).await {
        Ok(connection) => connection,
        Err(sqlx::Error::Io(e)) => {
            eprintln!("Postgres unreachable at {}:{} ({}), skipping", config.host, config.port, e);
            return None;
        }
        Err(e) => panic!("Failed to connect to Postgres: {}", e),
    };
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");
    // Migrate database
    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    Some(connection_pool)
}

async fn test_database() -> Option<PgPool> {
    let settings = test_settings();
    configure_database(settings.require_database().expect("database settings")).await
}

/// Boot the server through the same startup path as `main` with the postgres backend
async fn spawn_app() -> Option<TestApp> {
    let settings = test_settings();
    let db_pool = configure_database(settings.require_database().expect("database settings")).await?;

    let state = AppState::from_settings(&settings)
        .await
        .expect("Failed to initialise storage");

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let server = run(listener, state).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    Some(TestApp {
        address: format!("http://127.0.0.1:{}", port),
        db_pool,
        client: reqwest::Client::new(),
    })
}

async fn live_film_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM films WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await
        .expect("Failed to count films")
}

// --- Repository ---

#[tokio::test]
async fn soft_deleted_film_is_hidden_but_kept_in_table() {
    let Some(pool) = test_database().await else { return };
    let films = FilmRepository::Postgres(pool.clone());

    let created = films
        .create(&FilmRequest::new("Heat", "Michael Mann", 1995, "Crime"))
        .await
        .expect("Failed to create film");
    assert_eq!(created.title, "Heat");

    let updated = films
        .update(created.id, &FilmRequest::new("Heat", "Michael Mann", 1995, "Thriller"))
        .await
        .expect("Failed to update film")
        .expect("Film should exist");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.genre, "Thriller");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(films.get(created.id).await.unwrap(), Some(updated));

    assert!(films.delete(created.id).await.expect("Failed to delete film"));

    assert!(films.get(created.id).await.unwrap().is_none());
    assert!(films.list().await.unwrap().iter().all(|film| film.id != created.id));
    assert!(!films.delete(created.id).await.unwrap());
    assert!(films
        .update(created.id, &FilmRequest::new("Heat", "Michael Mann", 1995, "Crime"))
        .await
        .unwrap()
        .is_none());

    let deleted_at: Option<DateTime<Utc>> =
        sqlx::query_scalar::<_, Option<DateTime<Utc>>>("SELECT deleted_at FROM films WHERE id = $1")
            .bind(created.id)
            .fetch_one(&pool)
            .await
            .expect("Soft-deleted row should still be in the table");
    assert!(deleted_at.is_some());
}

#[tokio::test]
async fn missing_film_is_none_not_an_error() {
    let Some(pool) = test_database().await else { return };
    let films = FilmRepository::Postgres(pool);

    assert!(films.get(999).await.unwrap().is_none());
    assert!(!films.delete(999).await.unwrap());
    assert!(films.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn seed_films_runs_once() {
    let Some(pool) = test_database().await else { return };

    seed_films(&pool).await.expect("First seed failed");
    seed_films(&pool).await.expect("Second seed failed");
    assert_eq!(live_film_count(&pool).await, 5);

    let titles: Vec<String> = FilmRepository::Postgres(pool.clone())
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|film| film.title)
        .collect();
    let expected: Vec<String> = sample_films().into_iter().map(|film| film.title).collect();
    assert_eq!(titles, expected);

    // A partly emptied catalog is not topped up again
    assert!(FilmRepository::Postgres(pool.clone()).delete(1).await.unwrap());
    seed_films(&pool).await.expect("Third seed failed");
    assert_eq!(live_film_count(&pool).await, 4);
}

#[tokio::test]
async fn seed_users_is_idempotent_and_lookup_skips_deleted_users() {
    let Some(pool) = test_database().await else { return };
    let users = test_settings().users;
    assert!(!users.is_empty(), "configuration.yaml should list users");

    seed_users(&pool, &users).await.expect("First seed failed");
    seed_users(&pool, &users).await.expect("Second seed failed");

    let count: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, users.len() as i64);

    let directory = UserDirectory::Postgres(pool.clone());
    assert_eq!(
        directory.find_password("admin").await.unwrap().as_deref(),
        Some("admin123")
    );
    assert!(validate_credentials(&directory, "admin", "admin123").await);
    assert!(!validate_credentials(&directory, "admin", "Admin123").await);

    sqlx::query("UPDATE users SET deleted_at = now() WHERE username = $1")
        .bind("admin")
        .execute(&pool)
        .await
        .unwrap();

    assert!(directory.find_password("admin").await.unwrap().is_none());
    assert!(!validate_credentials(&directory, "admin", "admin123").await);

    // Re-seeding does not revive a deleted user
    seed_users(&pool, &users).await.expect("Third seed failed");
    assert!(directory.find_password("admin").await.unwrap().is_none());
}

// --- HTTP over the postgres backend ---

#[tokio::test]
async fn login_and_film_deletion_against_postgres() {
    let Some(app) = spawn_app().await else { return };

    let response = app
        .client
        .post(&format!("{}/api/login", app.address))
        .json(&serde_json::json!({"username": "admin", "password": "admin123"}))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    let bearer = format!("Bearer {}", body["token"].as_str().expect("token missing"));

    let response = app
        .client
        .get(&format!("{}/api/films", app.address))
        .header("Authorization", &bearer)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let films: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert_eq!(films.len(), 5);

    let response = app
        .client
        .delete(&format!("{}/api/films/1", app.address))
        .header("Authorization", &bearer)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(204, response.status().as_u16());

    let response = app
        .client
        .get(&format!("{}/api/films/1", app.address))
        .header("Authorization", &bearer)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());

    assert_eq!(live_film_count(&app.db_pool).await, 4);
    let total: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM films")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(total, 5);
}
