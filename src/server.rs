//!
//! faceauth portal HTTP server
//! ---------------------------
//! Axum-based front for the landing page and the session-gated dashboard.
//!
//! Responsibilities:
//! - Public landing page with the login entry selector.
//! - Dashboard gated on the `faceAuth` artifact the login flow hands over.
//! - Artifacts are kept server-side in `AppState.sessions`, keyed by the `faceAuth_sid`
//!   cookie. A raw `faceAuth` cookie is still honoured when it fits in one cookie.
//! - Logout (clears the artifact) and the outbound Explore Learning hop.
//! - A small JSON view of the current session, and the handoff endpoint that stores one.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::PortalConfig;
use crate::error::{AppError, AppResult};
use crate::identity::DisplayIdentity;
use crate::pages::{LoginMenu, PageRenderer};
use crate::session::{
    parse_artifact, CookieSessionStore, GateDecision, MemorySessionStore, Navigation, SessionGate, SessionState,
    SessionStore, SidSessionStore,
};

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub pages: Arc<PageRenderer>,
    /// sid-scoped session artifacts, shared by every request
    pub sessions: MemorySessionStore,
}

impl AppState {
    pub fn new(config: PortalConfig) -> AppResult<Self> {
        Ok(Self {
            config: Arc::new(config),
            pages: Arc::new(PageRenderer::new()?),
            sessions: MemorySessionStore::new(),
        })
    }

    /// This request's view of the session storage.
    fn session_store(&self, headers: &HeaderMap) -> SidSessionStore {
        SidSessionStore::new(
            self.sessions.clone(),
            CookieSessionStore::from_headers(headers, self.config.secure_cookies),
        )
    }

    /// A fresh gate activation over this request's session.
    fn gate(&self, headers: &HeaderMap) -> SessionGate<SidSessionStore> {
        SessionGate::new(self.session_store(headers), self.config.navigation_targets())
    }

    fn login_menu(&self, open: bool) -> LoginMenu {
        LoginMenu::new(
            Navigation::to(self.config.credential_login_url.clone()),
            Navigation::to(self.config.image_login_route.clone()),
        )
        .with_open(open)
    }
}

impl IntoResponse for Navigation {
    fn into_response(self) -> Response {
        Redirect::to(self.target()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/login", get(login_entry))
        .route("/dashboard", get(dashboard))
        .route("/logout", get(logout).post(logout))
        .route("/explore-learning", get(explore_learning))
        .route("/api/session", get(session_info).post(store_session))
        .route("/healthz", get(|| async { "ok" }))
        .fallback(not_found)
        .with_state(state)
}

/// Start the portal bound to the configured address.
pub async fn run(config: PortalConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    info!(
        target: "startup",
        "faceauth portal starting: addr={}, login_entry={}, learning_portal={}, secure_cookies={}",
        addr, config.login_url, config.learning_url, config.secure_cookies
    );
    let state = AppState::new(config).context("While compiling page templates")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
struct LandingQuery {
    login: Option<String>,
}

async fn landing(State(state): State<AppState>, Query(q): Query<LandingQuery>) -> AppResult<Html<String>> {
    let open = q.login.as_deref() == Some("open");
    Ok(Html(state.pages.landing(&state.login_menu(open))?))
}

async fn login_entry(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.pages.landing(&state.login_menu(true))?))
}

async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let gate = state.gate(&headers);
    match gate.activate() {
        GateDecision::Render(identity) => match state.pages.dashboard(&identity) {
            Ok(html) => ([(header::CACHE_CONTROL, "no-store")], Html(html)).into_response(),
            Err(e) => e.into_response(),
        },
        GateDecision::Redirect(nav) => {
            debug!(target: "http", to = nav.target(), "dashboard redirect");
            nav.into_response()
        }
    }
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let gate = state.gate(&headers);
    let nav = gate.logout();
    let mut h = HeaderMap::new();
    gate.store().apply_to(&mut h);
    (h, nav).into_response()
}

async fn explore_learning(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.gate(&headers).explore_learning().into_response()
}

async fn session_info(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<serde_json::Value>> {
    let identity = state.gate(&headers).evaluate()?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "state": SessionState::Authenticated,
        "identity": identity,
    })))
}

/// Storage handoff from the login flow: keep the artifact server-side and hand
/// back the session id cookie.
async fn store_session(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> AppResult<Response> {
    let artifact = parse_artifact(Some(&body[..]))
        .map_err(|e| AppError::user("invalid_artifact", e.to_string()))?;
    let store = state.session_store(&headers);
    store.put_artifact(&artifact)?;
    info!(target: "http", bytes = body.len(), custom = artifact.account.is_custom(), "session stored");

    let mut h = HeaderMap::new();
    store.apply_to(&mut h);
    let identity = DisplayIdentity::from(&artifact.account);
    Ok((h, Json(serde_json::json!({
        "status": "ok",
        "state": SessionState::Authenticated,
        "identity": identity,
    }))).into_response())
}

async fn not_found(uri: Uri) -> AppError {
    debug!(target: "http", path = uri.path(), "no route");
    AppError::not_found("not_found", format!("no route for {}", uri.path()))
}
