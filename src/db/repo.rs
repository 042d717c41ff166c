use async_trait::async_trait;

use super::model::*;
use crate::util::SearchTerms;

/// Read-only access to the movie-ratings store.
#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn top_by_votes(&self, limit: i64) -> DbResult<Vec<Title>>;
    /// Titles whose genre column contains `genre`, most voted first.
    async fn titles_in_genre(&self, genre: &str, limit: i64) -> DbResult<Vec<Title>>;
    /// Titles matching every search term, most voted first.
    async fn search_titles(&self, terms: &SearchTerms, limit: i64) -> DbResult<Vec<Title>>;
    async fn titles_with_votes_above(&self, min_votes: i64, limit: i64) -> DbResult<Vec<Title>>;
    async fn titles_rated_between(&self, range: RatingRange, limit: i64) -> DbResult<Vec<Title>>;
    async fn best_titles_in_years(&self, years: YearRange, limit: i64) -> DbResult<Vec<Title>>;
    async fn titles_by_vote_count(
        &self,
        threshold: i64,
        comparison: Comparison,
        title_fragment: &str,
        limit: i64,
    ) -> DbResult<Vec<Title>>;
    async fn random_title(&self) -> DbResult<Option<Title>>;
    async fn ping(&self) -> DbResult<()>;
    async fn list_tables(&self) -> DbResult<Vec<String>>;
}

/// Read-only access to the game store.
#[async_trait]
pub trait GameRepo: Send + Sync {
    async fn top_genres(&self, limit: i64) -> DbResult<Vec<GenreCount>>;
    /// Games mapped to `genre` (case-insensitive exact match), best rated first.
    async fn games_in_genre(&self, genre: &str, limit: i64) -> DbResult<Vec<Game>>;
    /// Games matching every search term, newest first.
    async fn search_games(&self, terms: &SearchTerms, limit: i64) -> DbResult<Vec<Game>>;
    async fn games_with_reviews_above(&self, min_reviews: i64, limit: i64) -> DbResult<Vec<Game>>;
    async fn games_rated_between(&self, range: RatingRange, limit: i64) -> DbResult<Vec<Game>>;
    async fn best_games_in_years(&self, years: YearRange, limit: i64) -> DbResult<Vec<Game>>;
    async fn games_by_rating(
        &self,
        threshold: f64,
        comparison: Comparison,
        limit: i64,
    ) -> DbResult<Vec<Game>>;
    /// A uniformly chosen game among those with a positive rating.
    async fn random_rated_game(&self) -> DbResult<Option<Game>>;
    async fn ping(&self) -> DbResult<()>;
    async fn list_tables(&self) -> DbResult<Vec<String>>;
}
