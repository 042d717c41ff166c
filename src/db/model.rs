use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A movie from the ratings dataset, joined with its rating row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Title {
    pub tconst: String,
    pub primary_title: String,
    pub start_year: Option<i32>,
    pub genres: Option<String>,
    pub average_rating: Option<f64>,
    pub num_votes: Option<i64>,
}

impl Title {
    /// Lowercased genre tags parsed from the comma-joined genre column.
    pub fn genre_set(&self) -> BTreeSet<String> {
        parse_genre_list(self.genres.as_deref())
    }
}

/// A video game with the names of all genres it is mapped to.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub released: Option<NaiveDate>,
    pub rating: f64,
    pub ratings_count: i64,
    pub background_image: Option<String>,
    pub genres: Vec<String>,
}

impl Game {
    pub fn genre_set(&self) -> BTreeSet<String> {
        self.genres
            .iter()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect()
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre_set().contains(&genre.trim().to_lowercase())
    }

    pub fn release_year(&self) -> Option<i32> {
        self.released.map(|d| d.year())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GenreCount {
    pub name: String,
    pub num_games: i64,
}

/// Which side of a threshold a filtered lookup keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    #[default]
    Above,
    Below,
}

impl Comparison {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Above => ">",
            Comparison::Below => "<",
        }
    }

    pub fn keeps<T: PartialOrd>(&self, value: T, threshold: T) -> bool {
        match self {
            Comparison::Above => value > threshold,
            Comparison::Below => value < threshold,
        }
    }
}

/// Inclusive range of release years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn single(year: i32) -> Self {
        Self { start: year, end: year }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// Inclusive rating window; callers normalize so that `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRange {
    pub lower: f64,
    pub upper: f64,
}

impl RatingRange {
    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.lower && rating <= self.upper
    }
}

pub fn parse_genre_list(genres: Option<&str>) -> BTreeSet<String> {
    genres
        .unwrap_or("")
        .split(',')
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty() && g != "\\n")
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;
