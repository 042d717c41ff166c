use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::{Postgres, QueryBuilder};
use tracing::info;

use super::model::*;
use super::repo::*;
use crate::config::StoreConfig;
use crate::util::{contains_pattern, SearchTerms};

const TITLE_SELECT: &str = "SELECT tb.tconst, tb.primary_title, tb.start_year::int4 AS start_year, \
     tb.genres, tr.average_rating::float8 AS average_rating, tr.num_votes::int8 AS num_votes \
     FROM title_basics tb JOIN title_ratings tr ON tb.tconst = tr.tconst ";

const GAME_SELECT: &str = "SELECT g.id::int8 AS id, g.name, g.released, \
     COALESCE(g.rating, 0)::float8 AS rating, COALESCE(g.ratings_count, 0)::int8 AS ratings_count, \
     g.background_image, \
     COALESCE(array_agg(ge.name ORDER BY ge.name) FILTER (WHERE ge.name IS NOT NULL), '{}'::text[]) AS genres \
     FROM games g \
     LEFT JOIN game_genres gg ON gg.game_id = g.id \
     LEFT JOIN genres ge ON ge.id = gg.genre_id ";

const GAME_GROUP: &str = " GROUP BY g.id ";

const LIST_TABLES: &str = "SELECT table_name::text FROM information_schema.tables \
     WHERE table_schema = 'public' ORDER BY table_name";

/// Every search token must appear in the title. Binds are numbered in
/// token order, with the limit last.
fn search_title_query(terms: &SearchTerms, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(TITLE_SELECT);
    qb.push(" WHERE ");
    let mut conditions = qb.separated(" AND ");
    for pattern in terms.like_patterns() {
        conditions.push("tb.primary_title ILIKE ");
        conditions.push_bind_unseparated(pattern);
    }
    qb.push(" ORDER BY tr.num_votes DESC NULLS LAST, tb.primary_title LIMIT ");
    qb.push_bind(limit);
    qb
}

fn search_game_query(terms: &SearchTerms, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(GAME_SELECT);
    qb.push(" WHERE ");
    let mut conditions = qb.separated(" AND ");
    for pattern in terms.like_patterns() {
        conditions.push("g.name ILIKE ");
        conditions.push_bind_unseparated(pattern);
    }
    qb.push(GAME_GROUP);
    qb.push(" ORDER BY g.released DESC NULLS LAST, g.name LIMIT ");
    qb.push_bind(limit);
    qb
}

fn vote_count_sql(comparison: Comparison) -> String {
    format!(
        "{TITLE_SELECT} WHERE tr.num_votes {} $1 AND tb.primary_title ILIKE $2 \
         ORDER BY tr.average_rating DESC NULLS LAST, tb.primary_title LIMIT $3",
        comparison.as_sql()
    )
}

async fn connect(name: &str, cfg: &StoreConfig) -> DbResult<PgPool> {
    let mut options = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .database(&cfg.dbname)
        .ssl_mode(PgSslMode::from_str(&cfg.sslmode)?);
    if let Some(ref password) = cfg.password {
        options = options.password(password);
    }

    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    info!(
        store = name,
        host = %cfg.host,
        database = %cfg.dbname,
        max_connections = cfg.max_connections,
        "Connected to database"
    );

    Ok(pool)
}

async fn ping_pool(pool: &PgPool) -> DbResult<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

async fn list_pool_tables(pool: &PgPool) -> DbResult<Vec<String>> {
    Ok(sqlx::query_scalar::<_, String>(LIST_TABLES).fetch_all(pool).await?)
}

pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub async fn connect(cfg: &StoreConfig) -> DbResult<Self> {
        Ok(Self {
            pool: connect("movies", cfg).await?,
        })
    }
}

#[async_trait]
impl MovieRepo for PgMovieStore {
    async fn top_by_votes(&self, limit: i64) -> DbResult<Vec<Title>> {
        let sql = format!(
            "{TITLE_SELECT} WHERE tr.num_votes IS NOT NULL \
             ORDER BY tr.num_votes DESC, tb.primary_title LIMIT $1"
        );
        Ok(sqlx::query_as::<_, Title>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn titles_in_genre(&self, genre: &str, limit: i64) -> DbResult<Vec<Title>> {
        let sql = format!(
            "{TITLE_SELECT} WHERE tb.genres ILIKE $1 \
             ORDER BY tr.num_votes DESC NULLS LAST, tb.primary_title LIMIT $2"
        );
        Ok(sqlx::query_as::<_, Title>(&sql)
            .bind(contains_pattern(genre))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn search_titles(&self, terms: &SearchTerms, limit: i64) -> DbResult<Vec<Title>> {
        let mut qb = search_title_query(terms, limit);
        Ok(qb.build_query_as::<Title>().fetch_all(&self.pool).await?)
    }

    async fn titles_with_votes_above(&self, min_votes: i64, limit: i64) -> DbResult<Vec<Title>> {
        let sql = format!(
            "{TITLE_SELECT} WHERE tr.num_votes > $1 \
             ORDER BY tr.average_rating DESC NULLS LAST, tr.num_votes DESC LIMIT $2"
        );
        Ok(sqlx::query_as::<_, Title>(&sql)
            .bind(min_votes)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn titles_rated_between(&self, range: RatingRange, limit: i64) -> DbResult<Vec<Title>> {
        let sql = format!(
            "{TITLE_SELECT} WHERE tr.average_rating BETWEEN $1 AND $2 \
             ORDER BY tr.average_rating DESC, tb.primary_title LIMIT $3"
        );
        Ok(sqlx::query_as::<_, Title>(&sql)
            .bind(range.lower)
            .bind(range.upper)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn best_titles_in_years(&self, years: YearRange, limit: i64) -> DbResult<Vec<Title>> {
        let sql = format!(
            "{TITLE_SELECT} WHERE tb.start_year::int4 BETWEEN $1 AND $2 \
             AND tr.average_rating IS NOT NULL \
             ORDER BY tr.average_rating DESC, tr.num_votes DESC, tb.primary_title LIMIT $3"
        );
        Ok(sqlx::query_as::<_, Title>(&sql)
            .bind(years.start)
            .bind(years.end)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn titles_by_vote_count(
        &self,
        threshold: i64,
        comparison: Comparison,
        title_fragment: &str,
        limit: i64,
    ) -> DbResult<Vec<Title>> {
        let sql = vote_count_sql(comparison);
        Ok(sqlx::query_as::<_, Title>(&sql)
            .bind(threshold)
            .bind(contains_pattern(title_fragment))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn random_title(&self) -> DbResult<Option<Title>> {
        let sql = format!("{TITLE_SELECT} ORDER BY RANDOM() LIMIT 1");
        Ok(sqlx::query_as::<_, Title>(&sql)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn ping(&self) -> DbResult<()> {
        ping_pool(&self.pool).await
    }

    async fn list_tables(&self) -> DbResult<Vec<String>> {
        list_pool_tables(&self.pool).await
    }
}

pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    pub async fn connect(cfg: &StoreConfig) -> DbResult<Self> {
        Ok(Self {
            pool: connect("games", cfg).await?,
        })
    }
}

#[async_trait]
impl GameRepo for PgGameStore {
    async fn top_genres(&self, limit: i64) -> DbResult<Vec<GenreCount>> {
        Ok(sqlx::query_as::<_, GenreCount>(
            "SELECT name, COALESCE(games_count, 0)::int8 AS num_games FROM genres \
             ORDER BY num_games DESC, name LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn games_in_genre(&self, genre: &str, limit: i64) -> DbResult<Vec<Game>> {
        // Filter through a subquery so the aggregated genre list stays complete.
        let sql = format!(
            "{GAME_SELECT} WHERE g.id IN ( \
                 SELECT mg.game_id FROM game_genres mg JOIN genres mge ON mge.id = mg.genre_id \
                 WHERE LOWER(mge.name) = LOWER($1)) \
             {GAME_GROUP} ORDER BY rating DESC, g.name LIMIT $2"
        );
        Ok(sqlx::query_as::<_, Game>(&sql)
            .bind(genre.trim())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn search_games(&self, terms: &SearchTerms, limit: i64) -> DbResult<Vec<Game>> {
        let mut qb = search_game_query(terms, limit);
        Ok(qb.build_query_as::<Game>().fetch_all(&self.pool).await?)
    }

    async fn games_with_reviews_above(&self, min_reviews: i64, limit: i64) -> DbResult<Vec<Game>> {
        let sql = format!(
            "{GAME_SELECT} WHERE g.ratings_count > $1 {GAME_GROUP} \
             ORDER BY rating DESC, ratings_count DESC LIMIT $2"
        );
        Ok(sqlx::query_as::<_, Game>(&sql)
            .bind(min_reviews)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn games_rated_between(&self, range: RatingRange, limit: i64) -> DbResult<Vec<Game>> {
        let sql = format!(
            "{GAME_SELECT} WHERE g.rating BETWEEN $1 AND $2 {GAME_GROUP} \
             ORDER BY rating DESC, g.name LIMIT $3"
        );
        Ok(sqlx::query_as::<_, Game>(&sql)
            .bind(range.lower)
            .bind(range.upper)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn best_games_in_years(&self, years: YearRange, limit: i64) -> DbResult<Vec<Game>> {
        let sql = format!(
            "{GAME_SELECT} WHERE EXTRACT(YEAR FROM g.released)::int4 BETWEEN $1 AND $2 \
             {GAME_GROUP} ORDER BY rating DESC, ratings_count DESC, g.name LIMIT $3"
        );
        Ok(sqlx::query_as::<_, Game>(&sql)
            .bind(years.start)
            .bind(years.end)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn games_by_rating(
        &self,
        threshold: f64,
        comparison: Comparison,
        limit: i64,
    ) -> DbResult<Vec<Game>> {
        let sql = format!(
            "{GAME_SELECT} WHERE g.rating {} $1 {GAME_GROUP} \
             ORDER BY rating DESC, g.name LIMIT $2",
            comparison.as_sql()
        );
        Ok(sqlx::query_as::<_, Game>(&sql)
            .bind(threshold)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn random_rated_game(&self) -> DbResult<Option<Game>> {
        let sql = format!("{GAME_SELECT} WHERE g.rating > 0 {GAME_GROUP} ORDER BY RANDOM() LIMIT 1");
        Ok(sqlx::query_as::<_, Game>(&sql)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn ping(&self) -> DbResult<()> {
        ping_pool(&self.pool).await
    }

    async fn list_tables(&self) -> DbResult<Vec<String>> {
        list_pool_tables(&self.pool).await
    }
}
