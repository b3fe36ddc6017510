use serde::{Deserialize, Serialize};

pub mod movie;
pub mod similarity;

pub use movie::{CatalogStore, MovieRecord};
pub use similarity::SimilarityMatrix;

/// One recommended movie with its resolved poster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub poster_url: String,
}

/// Why a recommendation request produced nothing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoResultReason {
    /// Query was empty after trimming
    EmptyQuery,
    /// No catalog title contains the query
    NoMatch,
    /// The catalog has no movie other than the match
    NoNeighbors,
}

/// Outcome of a recommendation request
///
/// `ok == false` is a normal negative answer, not a fault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationResult {
    pub ok: bool,
    /// Catalog title the query resolved to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<NoResultReason>,
    #[serde(default)]
    pub items: Vec<Recommendation>,
}

impl RecommendationResult {
    pub fn found(matched: String, items: Vec<Recommendation>) -> Self {
        Self {
            ok: true,
            matched: Some(matched),
            reason: None,
            items,
        }
    }

    pub fn none(reason: NoResultReason) -> Self {
        Self {
            ok: false,
            matched: None,
            reason: Some(reason),
            items: Vec::new(),
        }
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.title.as_str()).collect()
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB `GET /movie/{id}` response the service reads
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: i64,
    #[serde(default)]
    pub poster_path: Option<String>,
}
