//! # Pantry Server
//!
//! HTTP surface of the dish catalog plus the chat search stream.
//!
//!
//!
//! # Layout
//! - `catalog` owns every entity and all derivation rules, this crate only translates HTTP
//! - One [`state::State`] per process, built empty at start-up and shared behind an `Arc`
//! - Nothing is persisted, a restart starts from an empty catalog
//!
//!
//!
//! # Routes
//!
//! | Path | Methods |
//! |---|---|
//! | `/api/ingredients`, `/api/ingredients/{id}` | GET POST / GET PATCH DELETE |
//! | `/api/dishes`, `/api/dishes/{id}` | GET POST / GET PATCH DELETE |
//! | `/api/dishes/{id}/recipes`, `/vendors`, `/stats` | GET |
//! | `/api/recipes`, `/api/recipes/{id}` | GET POST / GET PATCH DELETE |
//! | `/api/vendors`, `/api/vendors/{id}` | GET POST / GET PATCH DELETE |
//! | `/api/dish-vendors`, `/{dish_id}`, `/{dish_id}/{vendor_id}` | POST / GET / DELETE |
//! | `/api/*/search?q=` | GET |
//! | `/api/chat?q=` | GET, server-sent events |
//!
//!
//!
//! # Environment
//! - `RUST_PORT`: listen port, default 8080
//! - `CHAT_TOKEN_INTERVAL_MS`: delay between streamed chat tokens, default 120
//! - `CORS_MAX_AGE_SECS`: preflight cache, default 3600
//! - `RUST_LOG`: tracing filter
use anyhow::Result;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{delete, get, post},
};

#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal, signal::ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod chat;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use chat::chat_handler;
use config::Config;
use routes::*;
use state::{SharedState, State};

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config);

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(state.config.cors_max_age);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", get(chat_handler))
        .route(
            "/api/ingredients",
            get(list_ingredients).post(create_ingredient),
        )
        .route("/api/ingredients/search", get(search_ingredients))
        .route(
            "/api/ingredients/{id}",
            get(get_ingredient)
                .patch(update_ingredient)
                .delete(delete_ingredient),
        )
        .route("/api/dishes", get(list_dishes).post(create_dish))
        .route("/api/dishes/search", get(search_dishes))
        .route(
            "/api/dishes/{id}",
            get(get_dish).patch(update_dish).delete(delete_dish),
        )
        .route("/api/dishes/{id}/recipes", get(dish_recipes))
        .route("/api/dishes/{id}/vendors", get(dish_vendors))
        .route("/api/dishes/{id}/stats", get(dish_stats))
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route("/api/recipes/search", get(search_recipes))
        .route(
            "/api/recipes/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route("/api/vendors", get(list_vendors).post(create_vendor))
        .route("/api/vendors/search", get(search_vendors))
        .route(
            "/api/vendors/{id}",
            get(get_vendor).patch(update_vendor).delete(delete_vendor),
        )
        .route("/api/dish-vendors", post(create_dish_vendor))
        .route("/api/dish-vendors/{dish_id}", get(list_dish_vendors))
        .route(
            "/api/dish-vendors/{dish_id}/{vendor_id}",
            delete(delete_dish_vendor),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
