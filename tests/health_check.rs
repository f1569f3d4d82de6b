//! Integration tests for the public surface

mod common;

use common::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app();

    let response = app
        .client
        .get(&app.url("/health_check"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = spawn_app();

    let response = app
        .client
        .get(&app.url("/health_check"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn index_page_is_served() {
    let app = spawn_app();

    let response = app
        .client
        .get(&app.address)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    assert!(response.text().await.unwrap().contains("Film API"));
}
