//! TMDB metadata provider
//!
//! Reads `poster_path` from `GET /movie/{id}`. The request timeout is set on the
//! HTTP client, so a slow or unreachable TMDB surfaces as an `Err` instead of
//! stalling the caller.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::TmdbMovieDetails,
    services::providers::MetadataProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose every request is bounded by `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn movie_url(&self, movie_id: i64) -> String {
        format!("{}/movie/{}", self.api_url, movie_id)
    }
}

/// Extracts the poster path from a TMDB movie details body
fn parse_poster_path(body: &str) -> AppResult<Option<String>> {
    let details: TmdbMovieDetails = serde_json::from_str(body)
        .map_err(|e| AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e)))?;

    Ok(details.poster_path.filter(|path| !path.trim().is_empty()))
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_poster_path(&self, movie_id: i64) -> AppResult<Option<String>> {
        let response = self
            .http_client
            .get(self.movie_url(movie_id))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let poster_path = parse_poster_path(&body)?;

        tracing::debug!(
            movie_id,
            has_poster = poster_path.is_some(),
            provider = self.name(),
            "Movie details fetched"
        );

        Ok(poster_path)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
