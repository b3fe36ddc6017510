use std::{cmp::Ordering, sync::Arc};

use crate::{
    error::LoadError,
    models::{
        CatalogStore, NoResultReason, Recommendation, RecommendationResult, SimilarityMatrix,
    },
    services::posters::PosterCache,
};

/// Number of recommendations returned when the caller does not ask for a count
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// Title lookup → nearest-neighbor ranking → poster enrichment
///
/// Holds the catalog and similarity matrix loaded at startup. Both are
/// read-only, so the engine is shared across requests behind an `Arc`.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<CatalogStore>,
    matrix: Arc<SimilarityMatrix>,
    posters: PosterCache,
}

impl RecommendationEngine {
    /// Pairs a catalog with its matrix; row `i` must describe catalog movie `i`
    pub fn new(
        catalog: Arc<CatalogStore>,
        matrix: Arc<SimilarityMatrix>,
        posters: PosterCache,
    ) -> Result<Self, LoadError> {
        if matrix.dimension() != catalog.len() {
            return Err(LoadError::DimensionMismatch {
                expected: catalog.len(),
                rows: matrix.dimension(),
            });
        }

        Ok(Self {
            catalog,
            matrix,
            posters,
        })
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Recommends up to `n` movies similar to the first title matching `query`
    ///
    /// An unmatched or blank query is a negative result, not an error. Poster
    /// failures never fail the request; affected items carry the placeholder.
    #[tracing::instrument(skip(self))]
    pub async fn recommend(&self, query: &str, n: usize) -> RecommendationResult {
        let query = query.trim();
        if query.is_empty() {
            return RecommendationResult::none(NoResultReason::EmptyQuery);
        }

        let Some(index) = self.catalog.find_by_title_substring(query) else {
            tracing::info!("No title matched query");
            return RecommendationResult::none(NoResultReason::NoMatch);
        };

        let (Some(matched), Some(row)) = (self.catalog.get(index), self.matrix.row(index)) else {
            return RecommendationResult::none(NoResultReason::NoMatch);
        };

        if self.catalog.len() < 2 {
            return RecommendationResult::none(NoResultReason::NoNeighbors);
        }

        let neighbors: Vec<_> = rank_neighbors(row, index, n)
            .into_iter()
            .filter_map(|(i, _)| self.catalog.get(i))
            .collect();

        let movie_ids: Vec<i64> = neighbors.iter().map(|movie| movie.id).collect();
        let posters = self.posters.resolve_many(&movie_ids).await;

        let items: Vec<Recommendation> = neighbors
            .into_iter()
            .zip(posters)
            .map(|(movie, poster_url)| Recommendation {
                title: movie.title.clone(),
                poster_url,
            })
            .collect();

        tracing::info!(
            matched = %matched.title,
            returned = items.len(),
            "Recommendations computed"
        );

        RecommendationResult::found(matched.title.clone(), items)
    }
}

/// Ranks every other movie by its score in `row`, highest first
///
/// The sort is stable over the row's natural order, so equal scores keep
/// ascending catalog index. Scores compare numerically, so `0.0` and `-0.0`
/// tie. `self_index` is never returned.
pub fn rank_neighbors(row: &[f32], self_index: usize, n: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|&(i, _)| i != self_index)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(n);
    scored
}
