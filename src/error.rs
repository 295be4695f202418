use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Handler-level error. Only `message` reaches the client; the source is
/// logged and dropped.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    source: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(message: &'static str) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message, source: None }
    }

    pub fn not_found(message: &'static str) -> Self {
        Self { status: StatusCode::NOT_FOUND, message, source: None }
    }

    pub fn internal(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message, source: Some(source.into()) }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source:#}", self.message),
            None => f.write_str(self.message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("Internal server error", err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self, "request failed");
        }
        let body = crate::templates::error_page(self.status, self.message);
        (self.status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store is not connected")]
    Unavailable,
    #[error("title is required")]
    EmptyTitle,
    #[error("slug {0:?} already exists")]
    DuplicateSlug(String),
    #[error("store operation timed out")]
    Timeout,
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;
