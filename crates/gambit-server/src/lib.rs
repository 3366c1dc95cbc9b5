//! HTTP relay server for Gambit multiplayer chess.
//!
//! Two game clients rendezvous through a short session key and exchange
//! moves by polling. This crate is the network layer in front of a
//! [`gambit_session::SessionStore`].
//!
//! # Features
//!
//! - Create, join, move, finish, poll and delete game sessions
//! - Configurable route prefix for the game routes
//! - Per-IP rate limiting
//! - Delayed not-found responses to slow key guessing
//! - Background eviction of idle and over-age sessions
//! - Request logging
//!
//! # Example
//!
//! ```ignore
//! use gambit_server::{Server, ServerConfig};
//! use gambit_session::{SessionStore, StoreConfig};
//!
//! let store = SessionStore::new(StoreConfig::default());
//! let config = ServerConfig::new().with_bind_address("127.0.0.1:8543".parse()?);
//!
//! Server::new(store, config).run().await?;
//! ```

pub mod config;
pub mod error;
pub mod ratelimit;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ErrorResponse, Result, ServerError};
pub use ratelimit::{rate_limit_middleware, request_logging_middleware};
pub use routes::{
    CreateGameResponse, GameStateResponse, HealthResponse, JoinGameResponse, StatusResponse,
};
pub use state::AppState;

use std::net::SocketAddr;

use axum::{Router, middleware};
use gambit_session::{EvictionSweeper, SessionStore};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The Gambit relay server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server over the given store.
    pub fn new(store: SessionStore, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(store, config),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Get the application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let prefix = config::normalize_prefix(&self.state.config.route_prefix);

        let router = Router::new().merge(routes::health_routes());
        let router = if prefix.is_empty() {
            router.merge(routes::game_routes())
        } else {
            router.nest(&prefix, routes::game_routes())
        };

        router
            // Request logging (inner layer, runs first)
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                ratelimit::request_logging_middleware,
            ))
            // Rate limiting (outer layer, runs before request logging)
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                ratelimit::rate_limit_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured address until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        self.run_on(addr).await
    }

    /// Run the server on a specific address until Ctrl-C.
    pub async fn run_on(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind: {}", e)))?;

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
                signal.cancel();
            }
        });

        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener until `shutdown` fires.
    ///
    /// Starts the eviction sweeper and limiter housekeeping alongside the
    /// listener and stops both before returning.
    pub async fn serve(self, listener: TcpListener, shutdown: CancellationToken) -> Result<()> {
        let addr = listener
            .local_addr()
            .map_err(|e| ServerError::Internal(format!("Failed to read local address: {}", e)))?;
        let router = self.router();

        let sweeper = EvictionSweeper::new(self.state.store.clone()).spawn(shutdown.child_token());
        let housekeeping =
            ratelimit::spawn_limiter_housekeeping(self.state.limiter.clone(), shutdown.child_token());

        info!(
            %addr,
            route_prefix = %self.state.config.route_prefix,
            "Starting server"
        );

        let drained = shutdown.clone();
        let served = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { drained.cancelled().await })
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)));

        shutdown.cancel();
        let _ = sweeper.await;
        let _ = housekeeping.await;

        info!("Server stopped");
        served
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use gambit_session::StoreConfig;
    use std::time::Duration;
    use tower::ServiceExt;

    fn create_test_server(prefix: &str) -> Server {
        let config = ServerConfig::new()
            .with_route_prefix(prefix)
            .with_rate_limiting(false)
            .with_not_found_delay(Duration::ZERO);
        Server::new(SessionStore::new(StoreConfig::default()), config)
    }

    async fn status_of(app: Router, method: Method, uri: &str) -> StatusCode {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_server_health_endpoint() {
        let app = create_test_server("/uc2024").router();
        assert_eq!(status_of(app, Method::GET, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_game_routes_under_prefix() {
        let server = create_test_server("/uc2024");

        let created = status_of(
            server.router(),
            Method::POST,
            "/uc2024/create?player_key=alice&chess_variant=Standard",
        )
        .await;
        assert_eq!(created, StatusCode::OK);

        let unprefixed = status_of(
            server.router(),
            Method::POST,
            "/create?player_key=alice&chess_variant=Standard",
        )
        .await;
        assert_eq!(unprefixed, StatusCode::NOT_FOUND);
        assert_eq!(server.state().store.len(), 1);
    }

    #[tokio::test]
    async fn test_health_not_prefixed() {
        let app = create_test_server("/uc2024").router();
        assert_eq!(
            status_of(app, Method::GET, "/uc2024/health").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_empty_prefix_mounts_at_root() {
        let server = create_test_server("");
        assert_eq!(
            status_of(
                server.router(),
                Method::POST,
                "/create?player_key=alice&chess_variant=Horsies",
            )
            .await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(server.router(), Method::GET, "/health").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let server = create_test_server("/uc2024");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(server.serve(listener, shutdown.clone()));
        shutdown.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
