use axum::{
    extract::{Query, State},
    Json,
};

use super::error::{ApiError, ApiResult};
use super::extract::ApiPath;
use super::params::{
    comparison_param, entity_kind, limit_param, parse_count, parse_rating, require_text,
};
use super::types::{Entity, EntityKind, GameRating, GameSummary, TitleSummary, VoteCountMatch};
use crate::server::AppState;
use crate::util::QueryParams;

const MOVIE_NUM_RATINGS_DEFAULT_LIMIT: i64 = 50;
const GAME_RATING_DEFAULT_LIMIT: i64 = 50;

/// GET /random?type=game|movie
pub async fn random(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Entity>> {
    let entity = match entity_kind(params.get("type"))? {
        EntityKind::Game => state
            .games
            .random_rated_game()
            .await?
            .map(|g| Entity::Game(GameSummary::from(g)))
            .ok_or_else(|| ApiError::not_found("No rated games available"))?,
        EntityKind::Movie => state
            .movies
            .random_title()
            .await?
            .map(|t| Entity::Movie(TitleSummary::from(t)))
            .ok_or_else(|| ApiError::not_found("No movies available"))?,
    };
    Ok(Json(entity))
}

/// GET /movie_num_ratings/:number?game_title=..&comparison=above|below&limit=n
pub async fn movie_num_ratings(
    State(state): State<AppState>,
    ApiPath(number): ApiPath<String>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<VoteCountMatch>>> {
    let threshold = parse_count("number", &number)?;
    let game_title = require_text("game_title", params.get("game_title"))?;
    let comparison = comparison_param(&params)?;
    let limit = limit_param(&params, MOVIE_NUM_RATINGS_DEFAULT_LIMIT)?;

    let titles = state
        .movies
        .titles_by_vote_count(threshold, comparison, game_title, limit)
        .await?;
    if titles.is_empty() {
        return Err(ApiError::not_found(format!(
            "No movies resembling '{}' with a qualifying number of ratings",
            game_title
        )));
    }

    Ok(Json(titles.into_iter().map(VoteCountMatch::from).collect()))
}

/// GET /game_rating/:rating?comparison=above|below
pub async fn game_rating(
    State(state): State<AppState>,
    ApiPath(rating): ApiPath<String>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<GameRating>>> {
    let threshold = parse_rating("rating", &rating, EntityKind::Game)?;
    let comparison = comparison_param(&params)?;
    let limit = limit_param(&params, GAME_RATING_DEFAULT_LIMIT)?;

    let games = state
        .games
        .games_by_rating(threshold, comparison, limit)
        .await?;
    Ok(Json(
        games
            .into_iter()
            .map(|g| GameRating {
                name: g.name,
                rating: g.rating,
            })
            .collect(),
    ))
}
