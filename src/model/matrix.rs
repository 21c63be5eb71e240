use std::ops::Range;

/// Row-major 2-D array of `f64`, one row per frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    #[error("buffer of {len} values cannot be shaped as ({rows}, {cols})")]
    BadBuffer { rows: usize, cols: usize, len: usize },
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cannot stack matrices with {expected} and {found} columns")]
    ColumnMismatch { expected: usize, found: usize },
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn empty(cols: usize) -> Self {
        Self::zeros(0, cols)
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, MatrixError> {
        if data.len() != rows * cols {
            return Err(MatrixError::BadBuffer {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from per-frame `[x, y, z]` triples, flattening each
    /// frame into one row in listing order.
    ///
    /// The width is fixed by the first frame; a later frame of a different
    /// length is reported as [`MatrixError::RaggedRow`].
    pub fn from_frames(frames: &[Vec<[f64; 3]>]) -> Result<Self, MatrixError> {
        let Some(first) = frames.first() else {
            return Ok(Self::empty(0));
        };
        let cols = first.len() * 3;
        let mut data = Vec::with_capacity(frames.len() * cols);
        for (row, frame) in frames.iter().enumerate() {
            if frame.len() * 3 != cols {
                return Err(MatrixError::RaggedRow {
                    row,
                    expected: cols,
                    found: frame.len() * 3,
                });
            }
            data.extend(frame.iter().flatten().copied());
        }
        Ok(Self {
            rows: frames.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    /// Concatenates along the row axis, preserving the order of `parts`.
    pub fn vstack(parts: &[Matrix]) -> Result<Self, MatrixError> {
        let Some(first) = parts.first() else {
            return Ok(Self::empty(0));
        };
        let cols = first.cols;
        let mut rows = 0;
        let mut data = Vec::with_capacity(parts.iter().map(|m| m.data.len()).sum());
        for part in parts {
            if part.cols != cols {
                return Err(MatrixError::ColumnMismatch {
                    expected: cols,
                    found: part.cols,
                });
            }
            rows += part.rows;
            data.extend_from_slice(&part.data);
        }
        Ok(Self {
            rows,
            cols,
            data,
        })
    }

    /// Rows in `range`, clamped to the available rows.
    pub fn slice_rows(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.rows);
        let start = range.start.min(end);
        Self {
            rows: end - start,
            cols: self.cols,
            data: self.data[start * self.cols..end * self.cols].to_vec(),
        }
    }

    pub fn skip_rows(&self, n: usize) -> Self {
        self.slice_rows(n..self.rows)
    }

    /// Gathers rows by index; indices must be in bounds.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(&self.data[i * self.cols..(i + 1) * self.cols]);
        }
        Self {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }
}
