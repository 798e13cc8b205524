//! Navigation-shaped projection center storage.
//!
//! A detector carries one PC triple per scan point. The scan grid has 0, 1
//! or 2 dimensions (the *navigation shape*); entries are stored flattened
//! in row-major order. All updates are copy-on-write: reshaping or
//! replacing a component produces a new array and never aliases the old
//! one.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Scan-grid dimensionality of a PC array: a single point, a line of
/// points, or a 2-D grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavShape {
    Point,
    Line(usize),
    Grid { rows: usize, cols: usize },
}

/// PC array construction and reshape errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PcArrayError {
    #[error("navigation shape may have at most 2 dimensions, 2 < {ndim}")]
    TooManyDimensions { ndim: usize },
    #[error("navigation shape {dims:?} holds {expected} projection centers, got {actual}")]
    CountMismatch {
        dims: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("expected {expected} component values, got {actual}")]
    ComponentLength { expected: usize, actual: usize },
    #[error("projection center array must hold at least one entry")]
    Empty,
}

impl NavShape {
    /// Build a navigation shape from explicit dimensions (0 to 2 of them).
    pub fn from_dims(dims: &[usize]) -> Result<Self, PcArrayError> {
        match *dims {
            [] => Ok(Self::Point),
            [n] => Ok(Self::Line(n)),
            [rows, cols] => Ok(Self::Grid { rows, cols }),
            _ => Err(PcArrayError::TooManyDimensions { ndim: dims.len() }),
        }
    }

    /// Dimensions as a slice-friendly vector (empty for a single point).
    pub fn dims(&self) -> Vec<usize> {
        match *self {
            Self::Point => vec![],
            Self::Line(n) => vec![n],
            Self::Grid { rows, cols } => vec![rows, cols],
        }
    }

    /// Number of navigation dimensions (0, 1 or 2).
    #[inline]
    pub fn ndim(&self) -> usize {
        match self {
            Self::Point => 0,
            Self::Line(_) => 1,
            Self::Grid { .. } => 2,
        }
    }

    /// Total number of scan points.
    #[inline]
    pub fn len(&self) -> usize {
        match *self {
            Self::Point => 1,
            Self::Line(n) => n,
            Self::Grid { rows, cols } => rows * cols,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Projection center input as it appears in configuration: a single
/// triple, a row of triples, or a 2-D grid of triples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PcInput {
    Single([f64; 3]),
    Row(Vec<[f64; 3]>),
    Grid(Vec<Vec<[f64; 3]>>),
}

impl Default for PcInput {
    fn default() -> Self {
        Self::Single([0.5, 0.5, 0.5])
    }
}

/// One PC triple per scan point, flattened row-major, plus the navigation
/// shape describing the scan grid.
#[derive(Clone, Debug, PartialEq)]
pub struct PcArray {
    shape: NavShape,
    data: Vec<Vector3<f64>>,
}

impl PcArray {
    /// Build from a navigation shape and matching flattened entries.
    pub fn new(shape: NavShape, data: Vec<Vector3<f64>>) -> Result<Self, PcArrayError> {
        if data.is_empty() {
            return Err(PcArrayError::Empty);
        }
        if shape.len() != data.len() {
            return Err(PcArrayError::CountMismatch {
                dims: shape.dims(),
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// A single PC with a zero-dimensional navigation shape.
    pub fn from_single(pc: Vector3<f64>) -> Self {
        Self {
            shape: NavShape::Point,
            data: vec![pc],
        }
    }

    /// A 1-D line of PCs.
    pub fn from_row(data: Vec<Vector3<f64>>) -> Result<Self, PcArrayError> {
        let shape = NavShape::Line(data.len());
        Self::new(shape, data)
    }

    /// Build from configuration input, inferring the navigation shape.
    ///
    /// Grid rows must all have the same length.
    pub fn from_input(input: &PcInput) -> Result<Self, PcArrayError> {
        match input {
            PcInput::Single(pc) => Ok(Self::from_single(Vector3::from_column_slice(pc))),
            PcInput::Row(rows) => {
                Self::from_row(rows.iter().map(|pc| Vector3::from_column_slice(pc)).collect())
            }
            PcInput::Grid(grid) => {
                let rows = grid.len();
                let cols = grid.first().map_or(0, Vec::len);
                let mut data = Vec::with_capacity(rows * cols);
                for row in grid {
                    if row.len() != cols {
                        return Err(PcArrayError::CountMismatch {
                            dims: vec![rows, cols],
                            expected: rows * cols,
                            actual: grid.iter().map(Vec::len).sum(),
                        });
                    }
                    data.extend(row.iter().map(|pc| Vector3::from_column_slice(pc)));
                }
                Self::new(NavShape::Grid { rows, cols }, data)
            }
        }
    }

    /// Navigation shape of the scan grid.
    #[inline]
    pub fn nav_shape(&self) -> NavShape {
        self.shape
    }

    /// Number of navigation dimensions (0, 1 or 2).
    #[inline]
    pub fn nav_dimension(&self) -> usize {
        self.shape.ndim()
    }

    /// Number of PC entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flattened entries in row-major navigation order.
    #[inline]
    pub fn entries(&self) -> &[Vector3<f64>] {
        &self.data
    }

    /// The x components of all entries, flattened.
    pub fn x(&self) -> Vec<f64> {
        self.data.iter().map(|pc| pc.x).collect()
    }

    /// The y components of all entries, flattened.
    pub fn y(&self) -> Vec<f64> {
        self.data.iter().map(|pc| pc.y).collect()
    }

    /// The z components of all entries, flattened.
    pub fn z(&self) -> Vec<f64> {
        self.data.iter().map(|pc| pc.z).collect()
    }

    /// Component-wise mean over all entries, ignoring NaN values.
    pub fn mean(&self) -> Vector3<f64> {
        let mut sums = [0.0_f64; 3];
        let mut counts = [0_usize; 3];
        for pc in &self.data {
            for axis in 0..3 {
                if !pc[axis].is_nan() {
                    sums[axis] += pc[axis];
                    counts[axis] += 1;
                }
            }
        }
        Vector3::from_fn(|axis, _| {
            if counts[axis] == 0 {
                f64::NAN
            } else {
                sums[axis] / counts[axis] as f64
            }
        })
    }

    /// A new array with the given navigation dimensions and the same
    /// entries. Fails when the total count changes or more than two
    /// dimensions are requested.
    pub fn reshape(&self, dims: &[usize]) -> Result<Self, PcArrayError> {
        let shape = NavShape::from_dims(dims)?;
        Self::new(shape, self.data.clone())
    }

    /// Apply `f` to every entry, keeping the navigation shape.
    pub fn map(&self, f: impl Fn(Vector3<f64>) -> Vector3<f64>) -> Self {
        Self {
            shape: self.shape,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Entries as configuration input, keeping the navigation shape.
    pub fn to_input(&self) -> PcInput {
        let triple = |pc: &Vector3<f64>| [pc.x, pc.y, pc.z];
        match self.shape {
            NavShape::Point => PcInput::Single(triple(&self.data[0])),
            NavShape::Line(_) => PcInput::Row(self.data.iter().map(triple).collect()),
            NavShape::Grid { rows, cols } => PcInput::Grid(
                (0..rows)
                    .map(|r| self.data[r * cols..(r + 1) * cols].iter().map(triple).collect())
                    .collect(),
            ),
        }
    }

    /// A new array with one component replaced for every entry.
    ///
    /// `values` must hold exactly one value per entry; the other two
    /// components are carried over unchanged.
    pub fn with_component(&self, axis: usize, values: &[f64]) -> Result<Self, PcArrayError> {
        assert!(axis < 3, "PC component axis must be 0, 1 or 2");
        if values.len() != self.data.len() {
            return Err(PcArrayError::ComponentLength {
                expected: self.data.len(),
                actual: values.len(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(values)
            .map(|(pc, &v)| {
                let mut pc = *pc;
                pc[axis] = v;
                pc
            })
            .collect();
        Ok(Self {
            shape: self.shape,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x3() -> PcArray {
        let data = (0..6)
            .map(|i| Vector3::new(i as f64, 10.0 + i as f64, 20.0 + i as f64))
            .collect();
        PcArray::new(NavShape::Grid { rows: 2, cols: 3 }, data).expect("grid")
    }

    #[test]
    fn from_dims_rejects_three_dimensions() {
        let err = NavShape::from_dims(&[2, 3, 4]).unwrap_err();
        assert_eq!(err, PcArrayError::TooManyDimensions { ndim: 3 });
    }

    #[test]
    fn reshape_preserves_count() {
        let pc = grid_2x3();
        let line = pc.reshape(&[6]).expect("reshape to line");
        assert_eq!(line.nav_shape(), NavShape::Line(6));
        assert_eq!(line.entries(), pc.entries());

        let err = pc.reshape(&[4]).unwrap_err();
        assert_eq!(
            err,
            PcArrayError::CountMismatch {
                dims: vec![4],
                expected: 4,
                actual: 6
            }
        );
    }

    #[test]
    fn ragged_grid_input_is_rejected() {
        let input = PcInput::Grid(vec![
            vec![[0.5, 0.5, 0.5], [0.4, 0.5, 0.5]],
            vec![[0.3, 0.5, 0.5]],
        ]);
        assert!(PcArray::from_input(&input).is_err());
    }

    #[test]
    fn mean_ignores_nan_per_component() {
        let pc = PcArray::from_row(vec![
            Vector3::new(0.4, f64::NAN, 0.6),
            Vector3::new(0.2, 0.3, 0.8),
        ])
        .expect("row");
        let mean = pc.mean();
        assert!((mean.x - 0.3).abs() < 1e-12);
        assert!((mean.y - 0.3).abs() < 1e-12);
        assert!((mean.z - 0.7).abs() < 1e-12);
    }

    #[test]
    fn with_component_replaces_one_axis_without_aliasing() {
        let pc = grid_2x3();
        let xs = vec![9.0; 6];
        let updated = pc.with_component(0, &xs).expect("update x");
        for (old, new) in pc.entries().iter().zip(updated.entries()) {
            assert_eq!(new.x, 9.0);
            assert_eq!(new.y, old.y);
            assert_eq!(new.z, old.z);
        }
        // Original untouched.
        assert_eq!(pc.entries()[0].x, 0.0);

        let err = pc.with_component(0, &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            PcArrayError::ComponentLength {
                expected: 6,
                actual: 2
            }
        );
    }
}
