use serde::{Deserialize, Serialize};

/// A single movie from the catalog artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieRecord {
    /// TMDB movie id, used for poster lookups
    pub id: i64,
    /// Display title
    pub title: String,
}

impl MovieRecord {
    /// Creates a new movie record
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Immutable, ordered movie catalog
///
/// A movie's position in the catalog is the row/column it occupies in the
/// similarity matrix. Titles are lowercased once at construction so title
/// matching does not allocate per movie.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    movies: Vec<MovieRecord>,
    lowered_titles: Vec<String>,
}

impl CatalogStore {
    /// Creates a catalog from movies in artifact order
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        let lowered_titles = movies.iter().map(|m| m.title.to_lowercase()).collect();
        Self {
            movies,
            lowered_titles,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MovieRecord> {
        self.movies.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.movies.iter()
    }

    /// Finds the first movie whose title contains `query`, ignoring case
    ///
    /// Matches are taken in catalog order, not by relevance: "man" resolves to
    /// whichever title containing "man" was stored first. Blank queries never
    /// match.
    pub fn find_by_title_substring(&self, query: &str) -> Option<usize> {
        let needle = normalize_query(query)?;
        self.lowered_titles
            .iter()
            .position(|title| title.contains(&needle))
    }

    /// Returns every movie whose title contains `query`, in catalog order
    pub fn search(&self, query: &str, limit: usize) -> Vec<&MovieRecord> {
        let Some(needle) = normalize_query(query) else {
            return Vec::new();
        };

        self.lowered_titles
            .iter()
            .zip(&self.movies)
            .filter(|(title, _)| title.contains(&needle))
            .map(|(_, movie)| movie)
            .take(limit)
            .collect()
    }
}

fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
