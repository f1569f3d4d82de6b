use std::net::TcpListener;
use std::path::PathBuf;

use film_api::auth::TokenStore;
use film_api::configuration::UserCredential;
use film_api::films::FilmRepository;
use film_api::startup::{run, AppState};
use film_api::users::UserDirectory;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(&self.url("/api/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Log in as the default admin and return the issued token
    pub async fn admin_token(&self) -> String {
        let response = self.login("admin", "admin123").await;
        assert_eq!(200, response.status().as_u16());
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().expect("token missing").to_string()
    }
}

/// Start the server on a random port with in-memory storage and the demo users.
pub fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let users = UserDirectory::Static(vec![
        UserCredential::new("admin", "admin123"),
        UserCredential::new("user1", "password123"),
        UserCredential::new("demo", "demo456"),
    ]);
    let state = AppState::new(TokenStore::new(), users, FilmRepository::in_memory())
        .with_static_dir(PathBuf::from("public"));

    let server = run(listener, state).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    }
}
