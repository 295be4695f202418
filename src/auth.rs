use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use constant_time_eq::constant_time_eq;

use crate::{AppState, config::Config};

const CHALLENGE: &str = r#"Basic realm="Admin""#;

/// Rejects requests that do not carry the admin credential as HTTP Basic
/// auth.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let credentials = req.headers().typed_get::<Authorization<Basic>>();

    match credentials {
        Some(Authorization(basic))
            if is_admin(&state.config, basic.username(), basic.password()) =>
        {
            next.run(req).await
        },
        _ => {
            tracing::debug!(path = %req.uri().path(), "admin credential rejected");
            challenge()
        },
    }
}

fn is_admin(config: &Config, username: &str, password: &str) -> bool {
    if config.admin_password.is_empty() {
        return false;
    }
    let user_ok = constant_time_eq(username.as_bytes(), config.admin_username.as_bytes());
    let pass_ok = constant_time_eq(password.as_bytes(), config.admin_password.as_bytes());
    user_ok & pass_ok
}

fn challenge() -> Response {
    let mut resp = (StatusCode::UNAUTHORIZED, "Authentication required").into_response();
    resp.headers_mut().insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    resp
}
