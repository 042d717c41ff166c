use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::{Game, GenreCount, Title};

pub const MOVIE_RATING_SCALE: f64 = 10.0;
pub const GAME_RATING_SCALE: f64 = 5.0;

/// Discriminates heterogeneous result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Movie,
    Game,
}

impl EntityKind {
    /// Accepts the singular and plural spellings used by the routes.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "movie" | "movies" => Some(EntityKind::Movie),
            "game" | "games" => Some(EntityKind::Game),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movie",
            EntityKind::Game => "game",
        }
    }

    pub fn rating_scale(&self) -> f64 {
        match self {
            EntityKind::Movie => MOVIE_RATING_SCALE,
            EntityKind::Game => GAME_RATING_SCALE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSummary {
    pub id: String,
    pub title: String,
    pub start_year: Option<i32>,
    pub movie_genre: Option<String>,
    pub genres: Vec<String>,
    pub average_rating: Option<f64>,
    pub num_votes: Option<i64>,
}

impl From<Title> for TitleSummary {
    fn from(t: Title) -> Self {
        let genres = t.genre_set().into_iter().collect();
        TitleSummary {
            id: t.tconst,
            title: t.primary_title,
            start_year: t.start_year,
            movie_genre: t.genres.filter(|g| !g.trim().is_empty()),
            genres,
            average_rating: t.average_rating,
            num_votes: t.num_votes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: i64,
    pub game_title: String,
    pub game_genre: Option<String>,
    pub genres: Vec<String>,
    pub rating: f64,
    pub ratings_count: i64,
    pub release_date: Option<NaiveDate>,
    pub img: Option<String>,
}

impl From<Game> for GameSummary {
    fn from(g: Game) -> Self {
        let game_genre = if g.genres.is_empty() {
            None
        } else {
            Some(g.genres.join(", "))
        };
        GameSummary {
            id: g.id,
            game_title: g.name,
            game_genre,
            genres: g.genres,
            rating: g.rating,
            ratings_count: g.ratings_count,
            release_date: g.released,
            img: g.background_image,
        }
    }
}

/// A single movie or game, tagged with `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    Movie(TitleSummary),
    Game(GameSummary),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopMovie {
    pub title: String,
    pub num_votes: i64,
    pub average_rating: Option<f64>,
}

impl From<Title> for TopMovie {
    fn from(t: Title) -> Self {
        TopMovie {
            title: t.primary_title,
            num_votes: t.num_votes.unwrap_or(0),
            average_rating: t.average_rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreSummary {
    pub name: String,
    pub num_games: i64,
}

impl From<GenreCount> for GenreSummary {
    fn from(g: GenreCount) -> Self {
        GenreSummary {
            name: g.name,
            num_games: g.num_games,
        }
    }
}

/// The i-th best game of a genre next to the i-th most voted movie of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenrePairing {
    pub game_id: i64,
    pub game_title: String,
    pub game_genre: Option<String>,
    pub game_rating: f64,
    pub img: Option<String>,
    pub movie_id: Option<String>,
    pub movie_title: Option<String>,
    pub movie_genre: Option<String>,
    pub movie_rating: Option<f64>,
}

/// A popular game or movie. Only the rating field matching `type` is set,
/// so the 0-5 and 0-10 scales never share a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportantEntity {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub reviews_count: i64,
    pub game_rating: Option<f64>,
    pub movie_rating: Option<f64>,
}

impl From<Game> for ImportantEntity {
    fn from(g: Game) -> Self {
        ImportantEntity {
            title: g.name,
            kind: EntityKind::Game,
            reviews_count: g.ratings_count,
            game_rating: Some(g.rating),
            movie_rating: None,
        }
    }
}

impl From<Title> for ImportantEntity {
    fn from(t: Title) -> Self {
        ImportantEntity {
            title: t.primary_title,
            kind: EntityKind::Movie,
            reviews_count: t.num_votes.unwrap_or(0),
            game_rating: None,
            movie_rating: t.average_rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatedEntity {
    pub name: String,
    pub rating: f64,
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

/// Best-rated entity of a year; `rating_scale` carries the unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearBest {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub rating: Option<f64>,
    pub rating_scale: f64,
    pub release_year: Option<i32>,
}

impl From<Title> for YearBest {
    fn from(t: Title) -> Self {
        YearBest {
            title: t.primary_title,
            kind: EntityKind::Movie,
            rating: t.average_rating,
            rating_scale: MOVIE_RATING_SCALE,
            release_year: t.start_year,
        }
    }
}

impl From<Game> for YearBest {
    fn from(g: Game) -> Self {
        let release_year = g.release_year();
        YearBest {
            title: g.name,
            kind: EntityKind::Game,
            rating: Some(g.rating),
            rating_scale: GAME_RATING_SCALE,
            release_year,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteCountMatch {
    pub title: String,
    pub num_ratings: i64,
    pub average_rating: Option<f64>,
}

impl From<Title> for VoteCountMatch {
    fn from(t: Title) -> Self {
        VoteCountMatch {
            title: t.primary_title,
            num_ratings: t.num_votes.unwrap_or(0),
            average_rating: t.average_rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRating {
    pub name: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    pub movies: String,
    pub games: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableListing {
    pub movies: Vec<String>,
    pub games: Vec<String>,
}
