use std::sync::Arc;

use shopkeeper_ai::HostedModelClient;
use shopkeeper_api::app::services::AppServices;
use shopkeeper_store::InMemoryStore;

#[tokio::main]
async fn main() {
    shopkeeper_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let model = match (
        std::env::var("MODEL_ENDPOINT"),
        std::env::var("MODEL_API_KEY"),
    ) {
        (Ok(endpoint), Ok(api_key)) => Some(Arc::new(HostedModelClient::new(endpoint, api_key))
            as Arc<dyn shopkeeper_ai::ModelClient>),
        _ => {
            tracing::warn!("MODEL_ENDPOINT/MODEL_API_KEY not set; AI routes disabled");
            None
        }
    };

    let services = AppServices::new(Arc::new(InMemoryStore::new()), model);
    let app = shopkeeper_api::app::build_app(jwt_secret, services);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
