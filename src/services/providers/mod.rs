//! Movie metadata provider abstraction
//!
//! The poster cache only needs one thing from the outside world: the poster
//! path for a movie id. Providers report every failure as an `Err` and leave
//! the fallback policy to the caller.

use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the poster path for a movie
    ///
    /// `Ok(None)` means the provider answered and the movie has no poster.
    /// Timeouts, transport errors and unexpected responses are `Err`.
    async fn fetch_poster_path(&self, movie_id: i64) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
