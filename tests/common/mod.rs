//! In-memory repositories and request helpers shared by the router tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use genre_bridge::db::*;
use genre_bridge::server::{build_router, AppState};
use genre_bridge::util::SearchTerms;
use serde_json::Value;
use tower::ServiceExt;

fn backend_failure() -> DbError {
    DbError::Sqlx(sqlx::Error::PoolTimedOut)
}

fn take<T>(rows: Vec<T>, limit: i64) -> Vec<T> {
    rows.into_iter().take(limit as usize).collect()
}

#[derive(Default)]
pub struct FakeMovies {
    pub titles: Vec<Title>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeMovies {
    pub fn new(titles: Vec<Title>) -> Self {
        Self {
            titles,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn rows(&self) -> DbResult<Vec<Title>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(backend_failure());
        }
        Ok(self.titles.clone())
    }
}

fn votes(t: &Title) -> i64 {
    t.num_votes.unwrap_or(0)
}

fn rating(t: &Title) -> f64 {
    t.average_rating.unwrap_or(0.0)
}

#[async_trait]
impl MovieRepo for FakeMovies {
    async fn top_by_votes(&self, limit: i64) -> DbResult<Vec<Title>> {
        let mut rows = self.rows()?;
        rows.sort_by(|a, b| votes(b).cmp(&votes(a)).then(a.primary_title.cmp(&b.primary_title)));
        Ok(take(rows, limit))
    }

    async fn titles_in_genre(&self, genre: &str, limit: i64) -> DbResult<Vec<Title>> {
        let genre = genre.to_lowercase();
        let mut rows: Vec<Title> = self
            .rows()?
            .into_iter()
            .filter(|t| {
                t.genres
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&genre)
            })
            .collect();
        rows.sort_by(|a, b| votes(b).cmp(&votes(a)));
        Ok(take(rows, limit))
    }

    async fn search_titles(&self, terms: &SearchTerms, limit: i64) -> DbResult<Vec<Title>> {
        let mut rows: Vec<Title> = self
            .rows()?
            .into_iter()
            .filter(|t| terms.matches(&t.primary_title))
            .collect();
        rows.sort_by(|a, b| votes(b).cmp(&votes(a)));
        Ok(take(rows, limit))
    }

    async fn titles_with_votes_above(&self, min_votes: i64, limit: i64) -> DbResult<Vec<Title>> {
        let mut rows: Vec<Title> = self
            .rows()?
            .into_iter()
            .filter(|t| votes(t) > min_votes)
            .collect();
        rows.sort_by(|a, b| rating(b).total_cmp(&rating(a)));
        Ok(take(rows, limit))
    }

    async fn titles_rated_between(&self, range: RatingRange, limit: i64) -> DbResult<Vec<Title>> {
        let mut rows: Vec<Title> = self
            .rows()?
            .into_iter()
            .filter(|t| t.average_rating.map(|r| range.contains(r)).unwrap_or(false))
            .collect();
        rows.sort_by(|a, b| rating(b).total_cmp(&rating(a)));
        Ok(take(rows, limit))
    }

    async fn best_titles_in_years(&self, years: YearRange, limit: i64) -> DbResult<Vec<Title>> {
        let mut rows: Vec<Title> = self
            .rows()?
            .into_iter()
            .filter(|t| t.start_year.map(|y| years.contains(y)).unwrap_or(false))
            .collect();
        rows.sort_by(|a, b| rating(b).total_cmp(&rating(a)));
        Ok(take(rows, limit))
    }

    async fn titles_by_vote_count(
        &self,
        threshold: i64,
        comparison: Comparison,
        title_fragment: &str,
        limit: i64,
    ) -> DbResult<Vec<Title>> {
        let fragment = title_fragment.to_lowercase();
        let mut rows: Vec<Title> = self
            .rows()?
            .into_iter()
            .filter(|t| comparison.keeps(votes(t), threshold))
            .filter(|t| t.primary_title.to_lowercase().contains(&fragment))
            .collect();
        rows.sort_by(|a, b| rating(b).total_cmp(&rating(a)));
        Ok(take(rows, limit))
    }

    async fn random_title(&self) -> DbResult<Option<Title>> {
        Ok(self.rows()?.into_iter().next())
    }

    async fn ping(&self) -> DbResult<()> {
        self.rows().map(|_| ())
    }

    async fn list_tables(&self) -> DbResult<Vec<String>> {
        self.rows()?;
        Ok(vec!["title_basics".to_string(), "title_ratings".to_string()])
    }
}

#[derive(Default)]
pub struct FakeGames {
    pub games: Vec<Game>,
    pub genres: Vec<GenreCount>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeGames {
    pub fn new(games: Vec<Game>) -> Self {
        Self {
            games,
            ..Default::default()
        }
    }

    pub fn with_genres(genres: Vec<GenreCount>) -> Self {
        Self {
            genres,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn rows(&self) -> DbResult<Vec<Game>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(backend_failure());
        }
        Ok(self.games.clone())
    }
}

fn by_rating_desc(rows: &mut [Game]) {
    rows.sort_by(|a, b| b.rating.total_cmp(&a.rating).then(a.name.cmp(&b.name)));
}

#[async_trait]
impl GameRepo for FakeGames {
    async fn top_genres(&self, limit: i64) -> DbResult<Vec<GenreCount>> {
        self.rows()?;
        let mut genres = self.genres.clone();
        genres.sort_by(|a, b| b.num_games.cmp(&a.num_games).then(a.name.cmp(&b.name)));
        Ok(take(genres, limit))
    }

    async fn games_in_genre(&self, genre: &str, limit: i64) -> DbResult<Vec<Game>> {
        let mut rows: Vec<Game> = self.rows()?.into_iter().filter(|g| g.has_genre(genre)).collect();
        by_rating_desc(&mut rows);
        Ok(take(rows, limit))
    }

    async fn search_games(&self, terms: &SearchTerms, limit: i64) -> DbResult<Vec<Game>> {
        let mut rows: Vec<Game> = self
            .rows()?
            .into_iter()
            .filter(|g| terms.matches(&g.name))
            .collect();
        rows.sort_by(|a, b| b.released.cmp(&a.released));
        Ok(take(rows, limit))
    }

    async fn games_with_reviews_above(&self, min_reviews: i64, limit: i64) -> DbResult<Vec<Game>> {
        let mut rows: Vec<Game> = self
            .rows()?
            .into_iter()
            .filter(|g| g.ratings_count > min_reviews)
            .collect();
        by_rating_desc(&mut rows);
        Ok(take(rows, limit))
    }

    async fn games_rated_between(&self, range: RatingRange, limit: i64) -> DbResult<Vec<Game>> {
        let mut rows: Vec<Game> = self
            .rows()?
            .into_iter()
            .filter(|g| range.contains(g.rating))
            .collect();
        by_rating_desc(&mut rows);
        Ok(take(rows, limit))
    }

    async fn best_games_in_years(&self, years: YearRange, limit: i64) -> DbResult<Vec<Game>> {
        let mut rows: Vec<Game> = self
            .rows()?
            .into_iter()
            .filter(|g| g.release_year().map(|y| years.contains(y)).unwrap_or(false))
            .collect();
        by_rating_desc(&mut rows);
        Ok(take(rows, limit))
    }

    async fn games_by_rating(
        &self,
        threshold: f64,
        comparison: Comparison,
        limit: i64,
    ) -> DbResult<Vec<Game>> {
        let mut rows: Vec<Game> = self
            .rows()?
            .into_iter()
            .filter(|g| comparison.keeps(g.rating, threshold))
            .collect();
        by_rating_desc(&mut rows);
        Ok(take(rows, limit))
    }

    async fn random_rated_game(&self) -> DbResult<Option<Game>> {
        Ok(self.rows()?.into_iter().find(|g| g.rating > 0.0))
    }

    async fn ping(&self) -> DbResult<()> {
        self.rows().map(|_| ())
    }

    async fn list_tables(&self) -> DbResult<Vec<String>> {
        self.rows()?;
        Ok(vec![
            "game_genres".to_string(),
            "games".to_string(),
            "genres".to_string(),
        ])
    }
}

pub fn title(tconst: &str, name: &str, year: i32, genres: &str, rating: f64, votes: i64) -> Title {
    Title {
        tconst: tconst.to_string(),
        primary_title: name.to_string(),
        start_year: Some(year),
        genres: Some(genres.to_string()),
        average_rating: Some(rating),
        num_votes: Some(votes),
    }
}

pub fn game(id: i64, name: &str, released: &str, genres: &[&str], rating: f64, reviews: i64) -> Game {
    Game {
        id,
        name: name.to_string(),
        released: NaiveDate::parse_from_str(released, "%Y-%m-%d").ok(),
        rating,
        ratings_count: reviews,
        background_image: Some(format!("https://media.example.com/games/{id}.jpg")),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn genre(name: &str, num_games: i64) -> GenreCount {
    GenreCount {
        name: name.to_string(),
        num_games,
    }
}

pub fn sample_movies() -> Vec<Title> {
    vec![
        title("tt0111161", "The Shawshank Redemption", 1994, "Drama", 9.3, 2_900_000),
        title("tt0468569", "The Dark Knight", 2008, "Action,Crime,Drama", 9.0, 2_800_000),
        title("tt0133093", "The Matrix", 1999, "Action,Sci-Fi", 8.7, 2_100_000),
        title("tt0076759", "Star Wars", 1977, "Action,Adventure,Fantasy", 8.6, 1_400_000),
        title("tt0120815", "Saving Private Ryan", 1998, "Drama,War", 8.6, 1_500_000),
        title("tt0093058", "Full Metal Jacket", 1987, "Drama,War", 8.3, 780_000),
        title("tt1392190", "Mad Max: Fury Road", 2015, "Action,Adventure,Sci-Fi", 8.1, 1_100_000),
        title("tt2488496", "Star Wars: The Force Awakens", 2015, "Action,Adventure,Sci-Fi", 7.8, 960_000),
        title("tt0119116", "The Fifth Element", 1997, "Action,Adventure,Sci-Fi", 7.6, 500_000),
        title("tt9999999", "Warehouse Blues", 2015, "Comedy", 5.2, 120),
    ]
}

pub fn sample_games() -> Vec<Game> {
    vec![
        game(1, "The Witcher 3: Wild Hunt", "2015-05-18", &["Action", "RPG"], 4.66, 6400),
        game(2, "Portal 2", "2011-04-18", &["Shooter", "Puzzle"], 4.61, 5500),
        game(3, "Doom", "2016-05-13", &["Action", "Shooter"], 4.38, 3200),
        game(4, "Bloodborne", "2015-03-24", &["Action", "RPG"], 4.42, 2100),
        game(5, "Rocket League", "2015-07-07", &["Sports", "Racing"], 3.93, 2900),
        game(6, "Untitled Prototype", "2019-01-01", &["Indie"], 0.0, 0),
        game(7, "Star Wars Jedi: Fallen Order", "2019-11-15", &["Action", "Adventure"], 4.2, 1500),
        game(8, "Star Wars: Battlefront", "2015-11-17", &["Shooter", "action"], 3.4, 900),
    ]
}

pub fn build_app(movies: Arc<FakeMovies>, games: Arc<FakeGames>) -> Router {
    build_router(AppState::new(movies, games))
}

pub fn sample_app() -> (Router, Arc<FakeMovies>, Arc<FakeGames>) {
    let movies = Arc::new(FakeMovies::new(sample_movies()));
    let games = Arc::new(FakeGames::new(sample_games()));
    (build_app(movies.clone(), games.clone()), movies, games)
}

/// Sends a GET request and returns the status with the parsed JSON body.
pub async fn get(app: Router, path: &str) -> (StatusCode, Value) {
    send(app, "GET", path).await
}

/// Like `get`, for any method. Non-JSON bodies come back as a JSON string.
pub async fn send(app: Router, method: &str, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(path)
        .method(method)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).to_string()));

    (status, json)
}
