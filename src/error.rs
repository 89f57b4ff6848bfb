//! Unified application error model and mapping helpers.
//! HTTP handlers return `AppError`; the session gate's own `NoSession` converts into it
//! for the JSON endpoints, while page routes turn it into a redirect instead.
//! A rejected artifact handoff is `UserInput`, an unknown route is `NotFound`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt::{Display, Formatter};

use crate::session::NoSession;

#[derive(Debug, Clone)]
pub enum AppError {
    UserInput { code: String, message: String },
    NotFound { code: String, message: String },
    Auth { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Auth { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }
    pub fn not_found(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn auth(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn internal(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::UserInput { .. } => 400,
            AppError::NotFound { .. } => 404,
            AppError::Auth { .. } => 401,
            AppError::Internal { .. } => 500,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<NoSession> for AppError {
    fn from(err: NoSession) -> Self {
        AppError::auth("no_session", err.to_string())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::internal("render_error", err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal("internal_error", err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(target: "http", code = self.code_str(), "{}", self.message());
        }
        (status, Json(serde_json::json!({
            "status": "error",
            "code": self.code_str(),
            "message": self.message(),
        }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::NoSessionReason;

    #[test]
    fn http_status_mapping() {
        assert_eq!(AppError::user("bad_input", "oops").http_status(), 400);
        assert_eq!(AppError::not_found("not_found", "missing").http_status(), 404);
        assert_eq!(AppError::auth("auth", "no").http_status(), 401);
        assert_eq!(AppError::internal("internal", "panic").http_status(), 500);
    }

    #[test]
    fn no_session_maps_to_auth() {
        let err: AppError = NoSession::new(NoSessionReason::Absent).into();
        assert_eq!(err.code_str(), "no_session");
        assert_eq!(err.http_status(), 401);
        assert!(err.to_string().starts_with("no_session: "));
    }

    #[test]
    fn into_response_uses_mapped_status() {
        let resp = AppError::not_found("not_found", "nothing here").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = AppError::internal("render_error", "bad template").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
