use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Form, Path, Query, State},
    middleware,
    response::{Html, Redirect},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::{
    AppState, auth,
    enrich::{self, MetadataSource},
    error::{AppError, AppResult},
    models::{FetchDetailsQuery, MovieSubmission},
    templates,
};

const HOME_LIMIT: u64 = 20;

pub fn router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/admin", get(admin_form).post(admin_submit))
        .route("/fetch_tmdb_details", get(fetch_tmdb_details))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    Router::new()
        .route("/", get(home))
        .route("/movie/{slug}", get(movie_detail))
        .merge(admin)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let movies = state.store.list_recent(HOME_LIMIT).await;
    Html(templates::home_page(&movies))
}

pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<Html<String>> {
    let movie =
        state.store.get_by_slug(&slug).await.ok_or(AppError::not_found("Movie not found"))?;
    Ok(Html(templates::detail_page(&movie)))
}

pub async fn admin_form(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::admin_page(state.tmdb.has_credential()))
}

pub async fn admin_submit(
    State(state): State<Arc<AppState>>,
    Form(submission): Form<MovieSubmission>,
) -> AppResult<Redirect> {
    let submission = submission.normalized();
    if submission.title.is_empty() {
        return Err(AppError::bad_request("Title is required"));
    }

    let submission = enrich::enrich(&*state.tmdb, submission).await;

    let movie = state
        .store
        .create(submission)
        .await
        .map_err(|err| AppError::internal("Failed to save movie", err))?;

    Ok(Redirect::to(&format!("/movie/{}", movie.slug)))
}

pub async fn fetch_tmdb_details(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FetchDetailsQuery>,
) -> Json<Value> {
    let title = q.title.trim();
    if title.is_empty() || !state.tmdb.has_credential() {
        return Json(json!({}));
    }

    let meta = state.tmdb.search_and_fetch(title).await;
    Json(serde_json::to_value(meta).unwrap_or_else(|_| json!({})))
}
