use std::sync::Arc;

use chrono::TimeDelta;
use rand::seq::index;

use crate::{
    config::Config,
    db::{Clock, TtlCache},
    models::CatalogStore,
    services::providers::MetadataProvider,
};

/// How poster URLs are built and how long lookups are remembered
#[derive(Debug, Clone)]
pub struct PosterSettings {
    pub image_base_url: String,
    /// Size segment for recommendation posters
    pub poster_size: String,
    pub placeholder_url: String,
    /// Size segment for decorative random posters
    pub random_poster_size: String,
    pub random_placeholder_url: String,
    /// TTL for answered lookups, with or without a poster
    pub ttl: TimeDelta,
    /// TTL for failed lookups
    pub failure_ttl: TimeDelta,
}

impl PosterSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_base_url: config.tmdb_image_url.clone(),
            poster_size: config.poster_size.clone(),
            placeholder_url: config.poster_placeholder_url.clone(),
            random_poster_size: config.random_poster_size.clone(),
            random_placeholder_url: config.random_poster_placeholder_url.clone(),
            ttl: config.poster_ttl(),
            failure_ttl: config.poster_failure_ttl(),
        }
    }
}

/// Time-bounded cache of movie id → poster path, filled from a metadata provider
///
/// Paths are cached rather than URLs so recommendation and decorative posters
/// share one upstream lookup while rendering at different sizes.
///
/// A cached `None` means "no poster" and is served as the placeholder until it
/// expires. Lookups that failed are cached the same way but for the shorter
/// `failure_ttl`, so they are retried sooner than a confirmed missing poster.
#[derive(Clone)]
pub struct PosterCache {
    cache: Arc<TtlCache<i64, Option<String>>>,
    provider: Arc<dyn MetadataProvider>,
    settings: Arc<PosterSettings>,
}

impl PosterCache {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        clock: Arc<dyn Clock>,
        settings: PosterSettings,
    ) -> Self {
        Self {
            cache: Arc::new(TtlCache::new(clock)),
            provider,
            settings: Arc::new(settings),
        }
    }

    /// Resolves a movie's poster URL, falling back to the placeholder
    pub async fn resolve_poster(&self, movie_id: i64) -> String {
        match self.lookup(movie_id).await {
            Some(path) => self.poster_url(&self.settings.poster_size, &path),
            None => self.settings.placeholder_url.clone(),
        }
    }

    /// Resolves posters for several movies concurrently, preserving order
    ///
    /// Movies without a usable poster get the placeholder.
    pub async fn resolve_many(&self, movie_ids: &[i64]) -> Vec<String> {
        self.lookup_many(movie_ids)
            .await
            .into_iter()
            .map(|path| match path {
                Some(path) => self.poster_url(&self.settings.poster_size, &path),
                None => self.settings.placeholder_url.clone(),
            })
            .collect()
    }

    /// Picks `n` distinct random movies and returns their decorative posters
    ///
    /// Only resolved posters are kept; the list is then padded with the
    /// decorative placeholder up to `n`, which also covers catalogs smaller
    /// than `n`.
    pub async fn sample_random_posters(&self, catalog: &CatalogStore, n: usize) -> Vec<String> {
        let movie_ids: Vec<i64> = {
            let mut rng = rand::thread_rng();
            let amount = n.min(catalog.len());
            index::sample(&mut rng, catalog.len(), amount)
                .into_iter()
                .filter_map(|i| catalog.get(i).map(|movie| movie.id))
                .collect()
        };

        let mut urls: Vec<String> = self
            .lookup_many(&movie_ids)
            .await
            .into_iter()
            .flatten()
            .map(|path| self.poster_url(&self.settings.random_poster_size, &path))
            .collect();

        urls.resize(n, self.settings.random_placeholder_url.clone());
        urls
    }

    /// Poster paths for several movies, one task per id, in input order
    async fn lookup_many(&self, movie_ids: &[i64]) -> Vec<Option<String>> {
        let tasks: Vec<_> = movie_ids
            .iter()
            .map(|&movie_id| {
                let posters = self.clone();
                tokio::spawn(async move { posters.lookup(movie_id).await })
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(path) => results.push(path),
                Err(e) => {
                    tracing::error!(error = %e, "Poster lookup task failed");
                    results.push(None);
                }
            }
        }
        results
    }

    async fn lookup(&self, movie_id: i64) -> Option<String> {
        if let Some(cached) = self.cache.get(&movie_id) {
            tracing::debug!(movie_id, hit = cached.is_some(), "Poster cache hit");
            return cached;
        }

        let (path, ttl) = match self.provider.fetch_poster_path(movie_id).await {
            Ok(Some(path)) => (Some(path), self.settings.ttl),
            Ok(None) => {
                tracing::debug!(movie_id, "Movie has no poster");
                (None, self.settings.ttl)
            }
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    error = %e,
                    provider = self.provider.name(),
                    "Poster lookup failed"
                );
                (None, self.settings.failure_ttl)
            }
        };

        self.cache.put(movie_id, path.clone(), ttl);
        path
    }

    fn poster_url(&self, size: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.settings.image_base_url.trim_end_matches('/'),
            size.trim_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        db::ManualClock,
        error::AppError,
        models::MovieRecord,
        services::providers::MockMetadataProvider,
    };
    use mockall::predicate::eq;

    pub(crate) const PLACEHOLDER: &str = "https://via.placeholder.com/500x750?text=No+Poster";
    const RANDOM_PLACEHOLDER: &str = "https://via.placeholder.com/780x1170?text=Poster";

    pub(crate) fn settings() -> PosterSettings {
        PosterSettings {
            image_base_url: "https://image.tmdb.org/t/p/".to_string(),
            poster_size: "w500".to_string(),
            placeholder_url: PLACEHOLDER.to_string(),
            random_poster_size: "w780".to_string(),
            random_placeholder_url: RANDOM_PLACEHOLDER.to_string(),
            ttl: TimeDelta::hours(1),
            failure_ttl: TimeDelta::minutes(5),
        }
    }

    fn poster_cache(provider: MockMetadataProvider) -> (Arc<ManualClock>, PosterCache) {
        let clock = Arc::new(ManualClock::default());
        let cache = PosterCache::new(Arc::new(provider), clock.clone(), settings());
        (clock, cache)
    }

    fn failing() -> AppError {
        AppError::ExternalApi("timed out".to_string())
    }

    #[tokio::test]
    async fn test_resolves_and_caches_poster() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_poster_path()
            .with(eq(19995))
            .times(1)
            .returning(|_| Ok(Some("/avatar.jpg".to_string())));
        provider.expect_name().return_const("mock");

        let (_, posters) = poster_cache(provider);

        let first = posters.resolve_poster(19995).await;
        let second = posters.resolve_poster(19995).await;

        assert_eq!(first, "https://image.tmdb.org/t/p/w500/avatar.jpg");
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_missing_poster_is_cached_for_full_ttl() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_poster_path()
            .times(1)
            .returning(|_| Ok(None));
        provider.expect_name().return_const("mock");

        let (clock, posters) = poster_cache(provider);

        assert_eq!(posters.resolve_poster(7).await, PLACEHOLDER);
        clock.advance(TimeDelta::minutes(30));
        assert_eq!(posters.resolve_poster(7).await, PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_repeated_within_failure_ttl() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_poster_path()
            .times(1)
            .returning(|_| Err(failing()));
        provider.expect_name().return_const("mock");

        let (clock, posters) = poster_cache(provider);

        assert_eq!(posters.resolve_poster(42).await, PLACEHOLDER);
        clock.advance(TimeDelta::minutes(4));
        assert_eq!(posters.resolve_poster(42).await, PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_retried_after_failure_ttl() {
        let mut provider = MockMetadataProvider::new();
        let mut seq = mockall::Sequence::new();
        provider
            .expect_fetch_poster_path()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(failing()));
        provider
            .expect_fetch_poster_path()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some("/late.jpg".to_string())));
        provider.expect_name().return_const("mock");

        let (clock, posters) = poster_cache(provider);

        assert_eq!(posters.resolve_poster(42).await, PLACEHOLDER);
        clock.advance(TimeDelta::minutes(5));
        assert_eq!(
            posters.resolve_poster(42).await,
            "https://image.tmdb.org/t/p/w500/late.jpg"
        );
    }

    #[tokio::test]
    async fn test_resolved_poster_refetched_after_ttl() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_poster_path()
            .times(2)
            .returning(|_| Ok(Some("/p.jpg".to_string())));
        provider.expect_name().return_const("mock");

        let (clock, posters) = poster_cache(provider);

        posters.resolve_poster(1).await;
        clock.advance(TimeDelta::hours(1));
        posters.resolve_poster(1).await;
    }

    #[tokio::test]
    async fn test_resolve_many_preserves_order() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_poster_path()
            .returning(|id| match id {
                2 => Ok(None),
                3 => Err(failing()),
                _ => Ok(Some(format!("/{}.jpg", id))),
            });
        provider.expect_name().return_const("mock");

        let (_, posters) = poster_cache(provider);

        let urls = posters.resolve_many(&[1, 2, 3, 4]).await;
        assert_eq!(
            urls,
            vec![
                "https://image.tmdb.org/t/p/w500/1.jpg".to_string(),
                PLACEHOLDER.to_string(),
                PLACEHOLDER.to_string(),
                "https://image.tmdb.org/t/p/w500/4.jpg".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_sample_random_posters_distinct_movies() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_poster_path()
            .returning(|id| Ok(Some(format!("/{}.jpg", id))));
        provider.expect_name().return_const("mock");

        let (_, posters) = poster_cache(provider);
        let catalog = CatalogStore::new(
            (1..=10)
                .map(|i| MovieRecord::new(i, format!("Movie {}", i)))
                .collect(),
        );

        let mut urls = posters.sample_random_posters(&catalog, 6).await;
        assert_eq!(urls.len(), 6);
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), 6);
        assert!(urls.iter().all(|u| u.starts_with("https://image.tmdb.org/t/p/w780/")));
    }

    #[tokio::test]
    async fn test_sample_random_posters_pads_small_catalog() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_poster_path()
            .times(2)
            .returning(|id| Ok(Some(format!("/{}.jpg", id))));
        provider.expect_name().return_const("mock");

        let (_, posters) = poster_cache(provider);
        let catalog = CatalogStore::new(vec![MovieRecord::new(1, "A"), MovieRecord::new(2, "B")]);

        let urls = posters.sample_random_posters(&catalog, 5).await;
        assert_eq!(urls.len(), 5);
        assert_eq!(urls.iter().filter(|u| *u == RANDOM_PLACEHOLDER).count(), 3);
        assert!(urls[..2].iter().all(|u| u != RANDOM_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_sample_random_posters_all_failed() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_poster_path()
            .returning(|_| Err(failing()));
        provider.expect_name().return_const("mock");

        let (_, posters) = poster_cache(provider);
        let catalog = CatalogStore::new(vec![MovieRecord::new(1, "A"), MovieRecord::new(2, "B")]);

        let urls = posters.sample_random_posters(&catalog, 2).await;
        assert_eq!(
            urls,
            vec![RANDOM_PLACEHOLDER.to_string(), RANDOM_PLACEHOLDER.to_string()]
        );
        assert_eq!(posters.sample_random_posters(&CatalogStore::default(), 0).await.len(), 0);
    }

    #[tokio::test]
    async fn test_random_and_recommendation_posters_share_one_lookup() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_poster_path()
            .with(eq(1726))
            .times(1)
            .returning(|_| Ok(Some("/ironman.jpg".to_string())));
        provider.expect_name().return_const("mock");

        let (_, posters) = poster_cache(provider);
        let catalog = CatalogStore::new(vec![MovieRecord::new(1726, "Iron Man")]);

        assert_eq!(
            posters.resolve_poster(1726).await,
            "https://image.tmdb.org/t/p/w500/ironman.jpg"
        );
        assert_eq!(
            posters.sample_random_posters(&catalog, 1).await,
            vec!["https://image.tmdb.org/t/p/w780/ironman.jpg".to_string()]
        );
    }
}
