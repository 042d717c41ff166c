use axum::{
    extract::{Query, State},
    Json,
};

use super::error::ApiResult;
use super::extract::ApiPath;
use super::params::{
    entity_kind, limit_param, parse_count, parse_limit, rating_range_param, year_range_param,
};
use super::types::{
    EntityKind, GenreSummary, ImportantEntity, RatedEntity, TopMovie, YearBest,
};
use crate::db::{Game, Title};
use crate::server::AppState;
use crate::util::QueryParams;

const TOP_DEFAULT_LIMIT: i64 = 5;
const RATINGS_DEFAULT_LIMIT: i64 = 10;
const HIGHEST_DEFAULT_LIMIT: i64 = 1;

/// GET /top_movies
pub async fn top_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<TopMovie>>> {
    let limit = limit_param(&params, TOP_DEFAULT_LIMIT)?;
    let titles = state.movies.top_by_votes(limit).await?;
    Ok(Json(titles.into_iter().map(TopMovie::from).collect()))
}

/// GET /top_game_genres
pub async fn top_game_genres(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<GenreSummary>>> {
    let limit = limit_param(&params, TOP_DEFAULT_LIMIT)?;
    let genres = state.games.top_genres(limit).await?;
    Ok(Json(genres.into_iter().map(GenreSummary::from).collect()))
}

/// GET /important_games_movies/:x/:limit
pub async fn important_games_movies(
    State(state): State<AppState>,
    ApiPath((threshold, limit)): ApiPath<(String, String)>,
) -> ApiResult<Json<Vec<ImportantEntity>>> {
    let threshold = parse_count("x", &threshold)?;
    let limit = parse_limit(&limit)?;

    let (games, titles) = tokio::try_join!(
        state.games.games_with_reviews_above(threshold, limit),
        state.movies.titles_with_votes_above(threshold, limit),
    )?;

    Ok(Json(concat_then_cap(games, titles, limit)))
}

/// Games first, then movies, truncated to `limit`. A full page of games
/// leaves no room for movies.
pub fn concat_then_cap(games: Vec<Game>, titles: Vec<Title>, limit: i64) -> Vec<ImportantEntity> {
    games
        .into_iter()
        .map(ImportantEntity::from)
        .chain(titles.into_iter().map(ImportantEntity::from))
        .take(usize::try_from(limit).unwrap_or(0))
        .collect()
}

/// GET /highest_avg_rating
pub async fn highest_avg_rating(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<YearBest>>> {
    let years = year_range_param(&params)?;
    let limit = limit_param(&params, HIGHEST_DEFAULT_LIMIT)?;

    let (titles, games) = tokio::try_join!(
        state.movies.best_titles_in_years(years, limit),
        state.games.best_games_in_years(years, limit),
    )?;

    let best = titles
        .into_iter()
        .map(YearBest::from)
        .chain(games.into_iter().map(YearBest::from))
        .collect();
    Ok(Json(best))
}

/// GET /ratings
pub async fn ratings(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<RatedEntity>>> {
    let kind = entity_kind(params.get("type"))?;
    let range = rating_range_param(&params, kind)?;
    let limit = limit_param(&params, RATINGS_DEFAULT_LIMIT)?;

    let rows = match kind {
        EntityKind::Movie => state
            .movies
            .titles_rated_between(range, limit)
            .await?
            .into_iter()
            .map(|t| RatedEntity {
                name: t.primary_title,
                rating: t.average_rating.unwrap_or_default(),
                kind,
            })
            .collect(),
        EntityKind::Game => state
            .games
            .games_rated_between(range, limit)
            .await?
            .into_iter()
            .map(|g| RatedEntity {
                name: g.name,
                rating: g.rating,
                kind,
            })
            .collect(),
    };

    Ok(Json(rows))
}
