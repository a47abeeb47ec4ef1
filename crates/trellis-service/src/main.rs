use std::env;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod state;

use state::AppState;
use trellis_store::FormStore;
use trellis_store::memory::MemoryFormStore;
use trellis_store::s3::S3FormStore;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store: Arc<dyn FormStore> = match env::var("TRELLIS_STORE").as_deref() {
        Ok("s3") => {
            let bucket = env::var("TRELLIS_BUCKET").unwrap_or_else(|_| "trellis".to_string());
            tracing::info!(%bucket, "using S3 form store");
            Arc::new(S3FormStore::from_env(bucket).await)
        }
        _ => {
            tracing::info!("using in-memory form store");
            Arc::new(MemoryFormStore::new())
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/", get(routes::list_forms).post(routes::create_form))
        .route("/stats/categories", get(routes::category_stats))
        .route(
            "/{id}",
            get(routes::get_form)
                .put(routes::update_form)
                .delete(routes::delete_form),
        )
        .route("/{id}/archive", patch(routes::toggle_archive))
        .route("/{id}/duplicate", post(routes::duplicate_form))
        .route("/{id}/use", patch(routes::increment_usage))
        .layer(cors)
        .with_state(AppState { store });

    let addr = env::var("TRELLIS_ADDR").unwrap_or_else(|_| "0.0.0.0:4004".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "assessment form service listening");
    axum::serve(listener, app).await?;
    Ok(())
}
