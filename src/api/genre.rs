use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use super::error::{ApiError, ApiResult};
use super::extract::ApiPath;
use super::params::{entity_kind, limit_param, require_text};
use super::types::{Entity, EntityKind, GameSummary, GenrePairing, TitleSummary};
use crate::db::{Game, Title};
use crate::server::AppState;
use crate::util::{QueryParams, SearchTerms};

const GENRE_DEFAULT_LIMIT: i64 = 10;
const CONTAINING_DEFAULT_LIMIT: i64 = 50;

/// GET /games_by_genre/:genre
pub async fn games_by_genre(
    State(state): State<AppState>,
    ApiPath(genre): ApiPath<String>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<GameSummary>>> {
    let genre = require_text("genre", Some(genre.as_str()))?;
    let limit = limit_param(&params, GENRE_DEFAULT_LIMIT)?;

    let games = state.games.games_in_genre(genre, limit).await?;
    debug!(genre, count = games.len(), "Games by genre");

    Ok(Json(games.into_iter().map(GameSummary::from).collect()))
}

/// GET /games_movies_by_genre/:genre
pub async fn games_movies_by_genre(
    State(state): State<AppState>,
    ApiPath(genre): ApiPath<String>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<GenrePairing>>> {
    let genre = require_text("genre", Some(genre.as_str()))?;
    let limit = limit_param(&params, GENRE_DEFAULT_LIMIT)?;

    let (games, titles) = tokio::try_join!(
        state.games.games_in_genre(genre, limit),
        state.movies.titles_in_genre(genre, limit),
    )?;

    Ok(Json(pair_by_rank(games, titles)))
}

/// Pairs the i-th game with the i-th title. Games drive the row count; the
/// movie columns are empty once titles run out.
pub fn pair_by_rank(games: Vec<Game>, titles: Vec<Title>) -> Vec<GenrePairing> {
    let mut titles = titles.into_iter();
    games
        .into_iter()
        .map(|game| {
            let title = titles.next();
            let game = GameSummary::from(game);
            GenrePairing {
                game_id: game.id,
                game_title: game.game_title,
                game_genre: game.game_genre,
                game_rating: game.rating,
                img: game.img,
                movie_id: title.as_ref().map(|t| t.tconst.clone()),
                movie_title: title.as_ref().map(|t| t.primary_title.clone()),
                movie_genre: title.as_ref().and_then(|t| t.genres.clone()),
                movie_rating: title.as_ref().and_then(|t| t.average_rating),
            }
        })
        .collect()
}

/// GET /containing/:type/:word
pub async fn containing(
    State(state): State<AppState>,
    ApiPath((kind, phrase)): ApiPath<(String, String)>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<Entity>>> {
    let kind = entity_kind(Some(kind.as_str()))?;
    let phrase = require_text("search phrase", Some(phrase.as_str()))?;
    let terms = SearchTerms::parse(phrase).ok_or_else(|| {
        ApiError::validation(format!(
            "search phrase '{}' contains only stop words",
            phrase
        ))
    })?;
    let limit = limit_param(&params, CONTAINING_DEFAULT_LIMIT)?;

    let matches = match kind {
        EntityKind::Movie => state
            .movies
            .search_titles(&terms, limit)
            .await?
            .into_iter()
            .map(|t| Entity::Movie(TitleSummary::from(t)))
            .collect(),
        EntityKind::Game => state
            .games
            .search_games(&terms, limit)
            .await?
            .into_iter()
            .map(|g| Entity::Game(GameSummary::from(g)))
            .collect(),
    };

    Ok(Json(matches))
}
