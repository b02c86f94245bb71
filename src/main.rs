use dotenvy::dotenv;
use hostelhub::router::init_router;
use hostelhub::state::init_app_state;
use hostelhub_config::ServerConfig;
use hostelhub_observability::init_tracing;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server configuration");
            std::process::exit(1);
        }
    };

    let state = match init_app_state().await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to initialize application state");
            std::process::exit(1);
        }
    };
    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, address = %address, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    tracing::info!(address = %address, "Server running");
    tracing::info!("OpenAPI document available at /api-docs/openapi.json");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
