pub mod error;
pub mod extract;
pub mod genre;
pub mod lookup;
pub mod params;
pub mod ranking;
pub mod system;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use genre::*;
pub use lookup::*;
pub use ranking::*;
pub use system::*;
pub use types::*;
