//! Movie recommendations from a precomputed similarity matrix, with TMDB
//! posters resolved through a time-bounded cache.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
