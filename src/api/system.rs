use axum::{extract::State, Json};
use tracing::warn;

use super::error::ApiResult;
use super::types::{Message, StoreStatus, TableListing};
use crate::server::AppState;

pub async fn hello() -> Json<Message> {
    Json(Message {
        message: "Movie and game discovery server is running".to_string(),
    })
}

/// GET /test-db
pub async fn test_db(State(state): State<AppState>) -> ApiResult<Json<StoreStatus>> {
    let (movies, games) = tokio::join!(state.movies.ping(), state.games.ping());
    if let Err(ref e) = movies {
        warn!(store = "movies", error = %e, "Database check failed");
    }
    if let Err(ref e) = games {
        warn!(store = "games", error = %e, "Database check failed");
    }
    movies?;
    games?;

    Ok(Json(StoreStatus {
        movies: "ok".to_string(),
        games: "ok".to_string(),
    }))
}

/// GET /list-tables
pub async fn list_tables(State(state): State<AppState>) -> ApiResult<Json<TableListing>> {
    let (movies, games) = tokio::try_join!(state.movies.list_tables(), state.games.list_tables())?;
    Ok(Json(TableListing { movies, games }))
}
