use std::path::Path;

use crate::{
    error::LoadError,
    models::{CatalogStore, MovieRecord, SimilarityMatrix},
};

/// Loads the catalog and similarity artifacts
///
/// This is the only expensive step of the service and runs once at startup.
/// The catalog is a JSON list of `{id, title}`. The matrix is a JSON 2-D array
/// when its file ends in `.json`, otherwise a raw row-major little-endian
/// `f32` blob. Either way it must be `len(catalog)` square.
pub fn load(
    catalog_path: &Path,
    matrix_path: &Path,
) -> Result<(CatalogStore, SimilarityMatrix), LoadError> {
    let movies = load_catalog(catalog_path)?;
    let matrix = load_matrix(matrix_path, movies.len())?;

    tracing::info!(
        movies = movies.len(),
        dimension = matrix.dimension(),
        catalog = %catalog_path.display(),
        matrix = %matrix_path.display(),
        "Loaded recommendation artifacts"
    );

    Ok((CatalogStore::new(movies), matrix))
}

fn load_catalog(path: &Path) -> Result<Vec<MovieRecord>, LoadError> {
    let bytes = read(path)?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn load_matrix(path: &Path, movies: usize) -> Result<SimilarityMatrix, LoadError> {
    let bytes = read(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let rows: Vec<Vec<f32>> =
            serde_json::from_slice(&bytes).map_err(|source| LoadError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        if rows.len() != movies {
            return Err(LoadError::DimensionMismatch {
                expected: movies,
                rows: rows.len(),
            });
        }
        SimilarityMatrix::from_rows(rows)
    } else {
        decode_blob(&bytes, movies)
    }
}

fn decode_blob(bytes: &[u8], movies: usize) -> Result<SimilarityMatrix, LoadError> {
    let expected = movies
        .checked_mul(movies)
        .and_then(|cells| cells.checked_mul(4))
        .unwrap_or(usize::MAX);

    if bytes.len() != expected {
        return Err(LoadError::BlobSize {
            bytes: bytes.len(),
            expected,
            movies,
        });
    }

    let scores = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    SimilarityMatrix::from_flat(movies, scores)
}

fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
