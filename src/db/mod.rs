pub mod model;
pub mod postgres;
pub mod repo;

pub use model::*;
pub use postgres::{PgGameStore, PgMovieStore};
pub use repo::*;
