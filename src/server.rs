use axum::{
    extract::Request,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::db::{GameRepo, MovieRepo};

#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieRepo>,
    pub games: Arc<dyn GameRepo>,
}

impl AppState {
    pub fn new(movies: Arc<dyn MovieRepo>, games: Arc<dyn GameRepo>) -> Self {
        Self { movies, games }
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(api::hello))
        .route("/random", get(api::random))
        .route("/top_movies", get(api::top_movies))
        .route("/top_game_genres", get(api::top_game_genres))
        .route("/games_by_genre/:genre", get(api::games_by_genre))
        .route("/games_movies_by_genre/:genre", get(api::games_movies_by_genre))
        .route(
            "/important_games_movies/:x/:limit",
            get(api::important_games_movies),
        )
        .route("/containing/:type/:word", get(api::containing))
        .route("/ratings", get(api::ratings))
        .route("/highest_avg_rating", get(api::highest_avg_rating))
        .route("/movie_num_ratings/:number", get(api::movie_num_ratings))
        .route("/game_rating/:rating", get(api::game_rating))
        .route("/test-db", get(api::test_db))
        .route("/list-tables", get(api::list_tables))
        .fallback(fallback_handler)
        .method_not_allowed_fallback(method_not_allowed_handler);

    router
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback_handler(req: Request) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
        .into_response()
}

async fn method_not_allowed_handler(req: Request) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
