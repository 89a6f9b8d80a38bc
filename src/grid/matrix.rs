// src/grid/matrix.rs
use crate::error::{PricingError, PricingResult};
use ndarray::{Array2, Axis};

/// Marker for a cell without a value (missing quote or invalid inputs)
pub const NOT_AVAILABLE: f64 = f64::NAN;

/// A strike × expiration matrix together with the axes that index it.
///
/// Rows follow `strikes`, columns follow `expirations` (years), both in the
/// order the caller supplied. Missing cells hold [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptionMatrix {
    values: Array2<f64>,
    strikes: Vec<f64>,
    expirations: Vec<f64>,
}

impl OptionMatrix {
    pub fn new(values: Array2<f64>, strikes: Vec<f64>, expirations: Vec<f64>) -> PricingResult<Self> {
        if values.dim() != (strikes.len(), expirations.len()) {
            return Err(PricingError::invalid_argument(
                "matrix shape",
                &format!("{:?}", values.dim()),
                format!("({}, {}) to match the axes", strikes.len(), expirations.len()),
            ));
        }
        Ok(OptionMatrix {
            values,
            strikes,
            expirations,
        })
    }

    /// Matrix of the given axes with every cell not available
    pub fn not_available(strikes: Vec<f64>, expirations: Vec<f64>) -> Self {
        let values = Array2::from_elem((strikes.len(), expirations.len()), NOT_AVAILABLE);
        OptionMatrix {
            values,
            strikes,
            expirations,
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>, strikes: Vec<f64>, expirations: Vec<f64>) -> PricingResult<Self> {
        let n = expirations.len();
        if rows.iter().any(|row| row.len() != n) {
            return Err(PricingError::invalid_argument(
                "matrix rows",
                "ragged",
                format!("every row to hold {} values", n),
            ));
        }
        let m = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let values = Array2::from_shape_vec((m, n), flat).map_err(|e| {
            PricingError::invalid_argument("matrix rows", &e.to_string(), "a rectangular grid")
        })?;
        Self::new(values, strikes, expirations)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    pub fn expirations(&self) -> &[f64] {
        &self.expirations
    }

    /// `(strikes, expirations)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Value at `[strike_index][expiration_index]`, `None` if not available
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied().filter(|v| !v.is_nan())
    }

    pub fn is_available(&self, i: usize, j: usize) -> bool {
        self.get(i, j).is_some()
    }

    pub fn count_available(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    pub fn count_missing(&self) -> usize {
        self.values.len() - self.count_available()
    }

    /// Number of missing cells in each strike row
    pub fn row_missing_counts(&self) -> Vec<usize> {
        self.values
            .axis_iter(Axis(0))
            .map(|row| row.iter().filter(|v| v.is_nan()).count())
            .collect()
    }

    /// Smallest and largest available value, ignoring missing cells
    pub fn available_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Keep only the given strike rows, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> PricingResult<Self> {
        let m = self.strikes.len();
        if let Some(&bad) = rows.iter().find(|&&i| i >= m) {
            return Err(PricingError::invalid_argument(
                "row index",
                &bad.to_string(),
                format!("an index below {}", m),
            ));
        }
        Ok(OptionMatrix {
            values: self.values.select(Axis(0), rows),
            strikes: rows.iter().map(|&i| self.strikes[i]).collect(),
            expirations: self.expirations.clone(),
        })
    }

    /// Cell-wise `self - other`; a missing cell on either side stays missing
    pub fn difference(&self, other: &OptionMatrix) -> PricingResult<Self> {
        if self.shape() != other.shape() {
            return Err(PricingError::invalid_argument(
                "matrix shape",
                &format!("{:?}", other.shape()),
                format!("{:?} to match", self.shape()),
            ));
        }
        Ok(OptionMatrix {
            values: &self.values - &other.values,
            strikes: self.strikes.clone(),
            expirations: self.expirations.clone(),
        })
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }
}

/// Matched call and put matrices over the same axes
#[derive(Debug, Clone, PartialEq)]
pub struct CallPutMatrices {
    pub call: OptionMatrix,
    pub put: OptionMatrix,
}

impl CallPutMatrices {
    pub fn strikes(&self) -> &[f64] {
        self.call.strikes()
    }

    pub fn expirations(&self) -> &[f64] {
        self.call.expirations()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.call.shape()
    }
}
