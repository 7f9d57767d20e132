use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::config::FeedConfig;
use crate::feed::assemble::{Article, Profile};
use crate::feed::client::MediumClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FeedConfig>,
    pub medium: Arc<MediumClient>,
}

impl AppState {
    pub fn new(config: FeedConfig) -> Self {
        let medium = Arc::new(MediumClient::from_config(&config));
        Self {
            config: Arc::new(config),
            medium,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/medium", get(articles))
        .route("/api/medium/profile", get(profile))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct FeedQuery {
    username: Option<String>,
    // Kept as a raw string: malformed values degrade to the default limit
    // instead of rejecting the request.
    limit: Option<String>,
}

#[derive(serde::Serialize)]
struct ArticlesResp {
    articles: Vec<Article>,
}

#[derive(serde::Serialize)]
struct ValidationResp {
    error: String,
}

#[derive(serde::Serialize)]
struct ArticlesErrorResp {
    error: String,
    articles: Vec<Article>,
}

#[derive(serde::Serialize)]
struct ProfileResp {
    profile: Profile,
}

#[derive(serde::Serialize)]
struct ProfileErrorResp {
    error: String,
    profile: Option<Profile>,
}

/// GET /api/medium?username=<user>&limit=<n>
///
/// Every outcome is a well-formed JSON response; nothing propagates to the
/// framework as an unhandled failure.
async fn articles(State(state): State<AppState>, Query(q): Query<FeedQuery>) -> Response {
    let Some(username) = required_username(q.username.as_deref()) else {
        return missing_username();
    };
    let limit = effective_limit(q.limit.as_deref(), state.config.default_limit);

    match state.medium.fetch_articles(username, limit).await {
        Ok(articles) => {
            let cache = cache_control(
                state.config.articles_max_age_secs,
                state.config.stale_while_revalidate_secs,
            );
            ([(header::CACHE_CONTROL, cache)], Json(ArticlesResp { articles })).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, username, "articles request degraded");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ArticlesErrorResp {
                    error: e.to_string(),
                    articles: Vec::new(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/medium/profile?username=<user>
async fn profile(State(state): State<AppState>, Query(q): Query<FeedQuery>) -> Response {
    let Some(username) = required_username(q.username.as_deref()) else {
        return missing_username();
    };

    match state.medium.fetch_profile(username).await {
        Ok(profile) => {
            let cache = cache_control(
                state.config.profile_max_age_secs,
                state.config.stale_while_revalidate_secs,
            );
            ([(header::CACHE_CONTROL, cache)], Json(ProfileResp { profile })).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, username, "profile request degraded");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ProfileErrorResp {
                    error: e.to_string(),
                    profile: None,
                }),
            )
                .into_response()
        }
    }
}

// Empty-after-trim counts as missing; no upstream call happens for it.
fn required_username(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|u| !u.is_empty())
}

fn missing_username() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationResp {
            error: "Username is required".to_string(),
        }),
    )
        .into_response()
}

fn effective_limit(raw: Option<&str>, default_limit: usize) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default_limit)
}

fn cache_control(max_age: u64, swr: u64) -> String {
    format!("public, max-age={max_age}, stale-while-revalidate={swr}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_falls_back_to_default_on_garbage() {
        assert_eq!(effective_limit(None, 10), 10);
        assert_eq!(effective_limit(Some("abc"), 10), 10);
        assert_eq!(effective_limit(Some(""), 10), 10);
        assert_eq!(effective_limit(Some("-3"), 10), 10);
        assert_eq!(effective_limit(Some(" 7 "), 10), 7);
        assert_eq!(effective_limit(Some("0"), 10), 0);
    }

    #[test]
    fn username_requires_non_blank_content() {
        assert_eq!(required_username(None), None);
        assert_eq!(required_username(Some("")), None);
        assert_eq!(required_username(Some("   ")), None);
        assert_eq!(required_username(Some(" alice ")), Some("alice"));
    }

    #[test]
    fn cache_header_format() {
        assert_eq!(
            cache_control(3600, 86400),
            "public, max-age=3600, stale-while-revalidate=86400"
        );
    }
}
