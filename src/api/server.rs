//! QuizNote API Server implementation
//!
//! HTTP REST API server using Axum. Each client works in its own session,
//! created on demand and dropped on request.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

use super::handlers;
use crate::error::{QnoteError, QnoteResult};
use crate::session::Session;

/// Default cap on request bodies (uploads)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default idle time before a session is dropped
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// Sessions idle for longer than this are evicted
    pub session_ttl_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

/// A live session plus bookkeeping
#[derive(Debug)]
pub struct SessionEntry {
    pub session: Session,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl SessionEntry {
    fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        // Negative idle time (clock moved back) counts as fresh
        (now - self.last_used)
            .to_std()
            .is_ok_and(|idle| idle > ttl)
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    session_ttl: Duration,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl AppState {
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_ttl(version, Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }

    pub fn with_ttl(version: impl Into<String>, session_ttl: Duration) -> Self {
        Self {
            version: version.into(),
            session_ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Register a fresh session and return its id and creation time
    pub fn create_session(&self) -> (String, DateTime<Utc>) {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let mut sessions = self.lock();
        self.evict_idle(&mut sessions, created_at);
        sessions.insert(
            id.clone(),
            SessionEntry {
                session: Session::new(),
                created_at,
                last_used: created_at,
            },
        );
        (id, created_at)
    }

    /// Run `f` against one session while holding the lock
    pub fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut SessionEntry) -> QnoteResult<T>,
    ) -> QnoteResult<T> {
        let now = Utc::now();
        let mut sessions = self.lock();
        self.evict_idle(&mut sessions, now);
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| QnoteError::SessionNotFound(id.to_string()))?;
        entry.last_used = now;
        f(entry)
    }

    pub fn end_session(&self, id: &str) -> QnoteResult<()> {
        self.lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| QnoteError::SessionNotFound(id.to_string()))
    }

    pub fn session_count(&self) -> usize {
        let mut sessions = self.lock();
        self.evict_idle(&mut sessions, Utc::now());
        sessions.len()
    }

    fn evict_idle(&self, sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(now, self.session_ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "evicted idle sessions");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
        // A panic mid-operation leaves at worst one session half-updated
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Build the router with all endpoints and middleware
pub fn build_router(state: Arc<AppState>, config: &ApiConfig) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Session endpoints
        .route("/api/v1/sessions", post(handlers::create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::session_info).delete(handlers::end_session),
        )
        .route("/api/v1/sessions/:id/upload", post(handlers::upload))
        .route("/api/v1/sessions/:id/draw", post(handlers::draw))
        .route("/api/v1/sessions/:id/note", post(handlers::save_note))
        .route("/api/v1/sessions/:id/download", get(handlers::download))
        // State and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "quiznote_server=info,royalbit_quiznote=info,tower_http=info".into()
            }),
        )
        .init();

    let state = Arc::new(AppState::with_ttl(
        env!("CARGO_PKG_VERSION"),
        Duration::from_secs(config.session_ttl_secs),
    ));
    let app = build_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("🎲 QuizNote API Server starting on http://{}", addr);
    info!("   Sessions: /api/v1/sessions (upload, draw, note, download)");
    info!("   Health: /health, Version: /version");
    info!("   Max upload size: {} bytes", config.max_upload_bytes);
    info!("   Session idle timeout: {}s", config.session_ttl_secs);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("QuizNote API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
