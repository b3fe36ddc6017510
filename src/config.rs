use std::{path::PathBuf, time::Duration};

use chrono::TimeDelta;
use serde::Deserialize;

use crate::services::recommendations::DEFAULT_RECOMMENDATIONS;

/// Upper bound accepted for a requested number of decorative posters
pub const MAX_RANDOM_POSTERS: usize = 24;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Movie catalog artifact (JSON list of `{id, title}`)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Similarity matrix artifact (JSON 2-D array or raw little-endian f32)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Poster size segment appended to the image URL (e.g. `w500`)
    #[serde(default = "default_poster_size")]
    pub poster_size: String,

    /// URL returned whenever a poster cannot be resolved
    #[serde(default = "default_poster_placeholder_url")]
    pub poster_placeholder_url: String,

    /// Size segment for decorative (random) posters
    #[serde(default = "default_random_poster_size")]
    pub random_poster_size: String,

    /// Placeholder for decorative posters that cannot be resolved
    #[serde(default = "default_random_poster_placeholder_url")]
    pub random_poster_placeholder_url: String,

    /// TTL for resolved posters and confirmed missing posters
    #[serde(default = "default_poster_ttl_secs")]
    pub poster_ttl_secs: u64,

    /// TTL for lookups that failed (timeout, transport, bad response)
    #[serde(default = "default_poster_failure_ttl_secs")]
    pub poster_failure_ttl_secs: u64,

    /// Timeout for a single metadata lookup
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,

    /// Number of recommendations when the request does not say
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Upper bound accepted for a requested recommendation count
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Number of decorative posters when the request does not say
    #[serde(default = "default_random_poster_count")]
    pub random_poster_count: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/movies.json")
}

fn default_similarity_path() -> PathBuf {
    PathBuf::from("data/similarity.json")
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/".to_string()
}

fn default_poster_size() -> String {
    "w500".to_string()
}

fn default_poster_placeholder_url() -> String {
    "https://via.placeholder.com/500x750?text=No+Poster".to_string()
}

fn default_random_poster_size() -> String {
    "w780".to_string()
}

fn default_random_poster_placeholder_url() -> String {
    "https://via.placeholder.com/780x1170?text=Poster".to_string()
}

fn default_poster_ttl_secs() -> u64 {
    3600
}

fn default_poster_failure_ttl_secs() -> u64 {
    300
}

fn default_metadata_timeout_secs() -> u64 {
    5
}

fn default_recommendations() -> usize {
    DEFAULT_RECOMMENDATIONS
}

fn default_max_recommendations() -> usize {
    50
}

fn default_random_poster_count() -> usize {
    6
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the poster cache cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.metadata_timeout_secs == 0 {
            anyhow::bail!("METADATA_TIMEOUT_SECS must be greater than zero");
        }
        if self.poster_failure_ttl_secs > self.poster_ttl_secs {
            anyhow::bail!(
                "POSTER_FAILURE_TTL_SECS ({}) must not exceed POSTER_TTL_SECS ({})",
                self.poster_failure_ttl_secs,
                self.poster_ttl_secs
            );
        }
        if self.default_recommendations > self.max_recommendations {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS ({}) must not exceed MAX_RECOMMENDATIONS ({})",
                self.default_recommendations,
                self.max_recommendations
            );
        }
        if self.random_poster_count > MAX_RANDOM_POSTERS {
            anyhow::bail!(
                "RANDOM_POSTER_COUNT ({}) must not exceed {}",
                self.random_poster_count,
                MAX_RANDOM_POSTERS
            );
        }
        Ok(())
    }

    pub fn poster_ttl(&self) -> TimeDelta {
        ttl_from_secs(self.poster_ttl_secs)
    }

    pub fn poster_failure_ttl(&self) -> TimeDelta {
        ttl_from_secs(self.poster_failure_ttl_secs)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn ttl_from_secs(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        catalog_path: default_catalog_path(),
        similarity_path: default_similarity_path(),
        tmdb_api_key: "test-key".to_string(),
        tmdb_api_url: default_tmdb_api_url(),
        tmdb_image_url: default_tmdb_image_url(),
        poster_size: default_poster_size(),
        poster_placeholder_url: default_poster_placeholder_url(),
        random_poster_size: default_random_poster_size(),
        random_poster_placeholder_url: default_random_poster_placeholder_url(),
        poster_ttl_secs: default_poster_ttl_secs(),
        poster_failure_ttl_secs: default_poster_failure_ttl_secs(),
        metadata_timeout_secs: default_metadata_timeout_secs(),
        default_recommendations: default_recommendations(),
        max_recommendations: default_max_recommendations(),
        random_poster_count: default_random_poster_count(),
        host: default_host(),
        port: default_port(),
    }
}
