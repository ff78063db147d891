use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::state::AppState;

/// Build the full HTTP application.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::home::root))
        .route("/health", get(public::home::health))
        .merge(user_routes())
        .merge(photo_routes())
        .merge(comment_routes())
        .merge(social_media_routes())
        // Global middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.api.request_timeout_secs)));

    let router = match cors_layer(config) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/users/register", post(public::users::register))
        .route("/users/login", post(public::users::login))
        .route("/users", get(users::list).delete(users::delete_self))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete))
}

fn photo_routes() -> Router<AppState> {
    use protected::photos;

    Router::new()
        .route("/photos", get(photos::list).post(photos::create))
        .route("/photos/:id", get(photos::get).put(photos::update).delete(photos::delete))
}

fn comment_routes() -> Router<AppState> {
    use protected::comments;

    Router::new()
        .route("/comments", get(comments::list).post(comments::create))
        .route("/comments/:id", get(comments::get).put(comments::update).delete(comments::delete))
}

fn social_media_routes() -> Router<AppState> {
    use protected::social_medias;

    Router::new()
        .route("/socialmedias", get(social_medias::list).post(social_medias::create))
        .route(
            "/socialmedias/:id",
            get(social_medias::get)
                .put(social_medias::update)
                .delete(social_medias::delete),
        )
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }

    if config.security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
