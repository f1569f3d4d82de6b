use std::net::TcpListener;
use film_api::configuration::get_configuration;
use film_api::startup::{run, AppState};
use film_api::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error"
            ));
        }
    };

    let state = AppState::from_settings(&configuration).await.map_err(|e| {
        tracing::error!("Failed to initialise storage: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, "Storage initialisation error")
    })?;

    let address = configuration.application.address();
    tracing::info!("Binding server to address: {}", address);

    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: http://{}", address);
    tracing::info!("Session endpoints: POST /api/login, POST /api/logout");
    tracing::info!(
        "Protected endpoints: GET|POST /api/films, GET|PUT|DELETE /api/films/{{id}}"
    );

    let server = run(listener, state)?;
    tracing::info!("Server started successfully");

    server.await
}
