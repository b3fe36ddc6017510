use std::sync::Arc;

use crate::{
    config::Config,
    db::{self, SystemClock},
    error::{AppError, LoadError},
    models::{CatalogStore, SimilarityMatrix},
    services::{
        posters::{PosterCache, PosterSettings},
        providers::{MetadataProvider, TmdbProvider},
        RecommendationEngine,
    },
};

/// Shared application state
///
/// Built once at startup; every field is read-only or internally synchronized,
/// so handlers only ever clone the `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub catalog: Arc<CatalogStore>,
    pub posters: PosterCache,
    pub config: Arc<Config>,
}

/// Errors that prevent the service from starting
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to build metadata client: {0}")]
    Provider(#[from] AppError),
}

impl AppState {
    /// Loads the artifacts and wires the TMDB-backed poster cache
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let (catalog, matrix) = db::load(&config.catalog_path, &config.similarity_path)?;

        let provider = TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.metadata_timeout(),
        )?;

        Self::with_provider(config, catalog, matrix, Arc::new(provider))
    }

    /// Builds state from already loaded data and any metadata provider
    pub fn with_provider(
        config: Config,
        catalog: CatalogStore,
        matrix: SimilarityMatrix,
        provider: Arc<dyn MetadataProvider>,
    ) -> Result<Self, StartupError> {
        let posters = PosterCache::new(
            provider,
            Arc::new(SystemClock),
            PosterSettings::from_config(&config),
        );

        let catalog = Arc::new(catalog);
        let engine =
            RecommendationEngine::new(catalog.clone(), Arc::new(matrix), posters.clone())?;

        Ok(Self {
            engine: Arc::new(engine),
            catalog,
            posters,
            config: Arc::new(config),
        })
    }
}
