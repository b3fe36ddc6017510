use crate::error::LoadError;

/// Dense, square similarity table stored row-major
///
/// Row `i` holds the scores of catalog movie `i` against every other movie.
/// Symmetry is a property of the precomputed artifact and is not checked.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from nested rows, rejecting ragged or non-finite input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, LoadError> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dimension {
                return Err(LoadError::RaggedRow {
                    row,
                    len: values.len(),
                    expected: dimension,
                });
            }
            scores.extend(values);
        }

        Self::from_flat(dimension, scores)
    }

    /// Builds a matrix from `dimension * dimension` row-major scores
    pub fn from_flat(dimension: usize, scores: Vec<f32>) -> Result<Self, LoadError> {
        let expected = dimension * dimension;
        if scores.len() != expected {
            return Err(LoadError::CellCount {
                cells: scores.len(),
                expected,
            });
        }

        if let Some(pos) = scores.iter().position(|s| !s.is_finite()) {
            return Err(LoadError::NonFinite {
                row: pos / dimension,
                col: pos % dimension,
            });
        }

        Ok(Self { dimension, scores })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Scores of movie `index` against every catalog movie
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.dimension {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }

    pub fn score(&self, i: usize, j: usize) -> Option<f32> {
        self.row(i).and_then(|row| row.get(j).copied())
    }
}
