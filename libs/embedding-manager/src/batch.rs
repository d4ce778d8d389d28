use crate::error::{ManagerError, ManagerResult};

/// Rectangular batch of `T` with a recorded shape, stored row-major.
///
/// This is the bookkeeping half of a numeric array: enough to flatten a
/// multi-dimensional key or value structure into the flat sequences the wire
/// protocol speaks and to rebuild the rectangular structure on the way back,
/// without tying callers to any particular array library.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> Batch<T> {
    /// Build a batch after checking that `shape` holds exactly `data.len()`
    /// elements.
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> ManagerResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ManagerError::ShapeMismatch {
                shape,
                count: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// A rank-1 batch over the given elements.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// A rank-2 batch from equally sized rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> ManagerResult<Self> {
        let row_len = rows.first().map(Vec::len).unwrap_or(0);
        let shape = vec![rows.len(), row_len];
        let count: usize = rows.iter().map(Vec::len).sum();
        if rows.iter().any(|row| row.len() != row_len) {
            return Err(ManagerError::ShapeMismatch { shape, count });
        }
        Ok(Self {
            shape,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements across all dimensions.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element at a multi-dimensional index, or None when the index rank or
    /// any coordinate is out of range.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&coordinate, &dimension) in index.iter().zip(&self.shape) {
            if coordinate >= dimension {
                return None;
            }
            offset = offset * dimension + coordinate;
        }
        self.data.get(offset)
    }
}
