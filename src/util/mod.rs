mod query;
mod search;

pub use query::QueryParams;
pub use search::{contains_pattern, SearchTerms};
