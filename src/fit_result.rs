//! # Fit Results
//!
//! The outcome of a least-squares fit expressed in terms of the record type:
//! the optimal instance, and the covariance matrix with its rows and columns
//! labelled by the fitting fields.

use crate::error::{FitParamsError, Result};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// A covariance matrix indexed by field name
#[derive(Debug, Clone, PartialEq)]
pub struct CovMatrix {
    /// The fields corresponding to the rows and columns
    fields: Vec<String>,

    /// The covariance matrix
    cov: Array2<f64>,

    /// Inverse of `fields`
    mapping: HashMap<String, usize>,
}

impl CovMatrix {
    /// Label a covariance matrix with the fields of its rows and columns
    ///
    /// # Returns
    ///
    /// The labelled matrix, or [`FitParamsError::ShapeMismatch`] if `cov` is not
    /// square with one row per field
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fit_result::CovMatrix;
    /// use ndarray::array;
    ///
    /// let cov = CovMatrix::new(
    ///     vec!["a".to_string(), "b".to_string()],
    ///     array![[4.0, 0.5], [0.5, 1.0]],
    /// )
    /// .unwrap();
    /// assert_eq!(cov.get_index("b"), Some(1));
    /// assert_eq!(cov.get("a", "b"), Some(0.5));
    /// assert_eq!(cov.std_error("a"), Some(2.0));
    /// ```
    pub fn new(fields: Vec<String>, cov: Array2<f64>) -> Result<Self> {
        let n = fields.len();
        let (rows, cols) = cov.dim();
        if rows != n || cols != n {
            return Err(FitParamsError::ShapeMismatch {
                expected: n,
                actual: if rows != n { rows } else { cols },
            });
        }

        let mapping = fields
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Ok(Self {
            fields,
            cov,
            mapping,
        })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The raw matrix
    pub fn cov(&self) -> &Array2<f64> {
        &self.cov
    }

    /// Row and column index belonging to `field`
    pub fn get_index(&self, field: &str) -> Option<usize> {
        self.mapping.get(field).copied()
    }

    /// Covariance between two fields
    pub fn get(&self, row_field: &str, col_field: &str) -> Option<f64> {
        let i = self.get_index(row_field)?;
        let j = self.get_index(col_field)?;
        Some(self.cov[[i, j]])
    }

    /// Standard error of a field, the square root of its variance
    ///
    /// A non-positive variance yields `0.0`.
    pub fn std_error(&self, field: &str) -> Option<f64> {
        self.get(field, field)
            .map(|var| if var > 0.0 { var.sqrt() } else { 0.0 })
    }

    /// Standard errors of all fields
    pub fn standard_errors(&self) -> HashMap<String, f64> {
        self.fields
            .iter()
            .filter_map(|name| self.std_error(name).map(|err| (name.clone(), err)))
            .collect()
    }

    /// The correlation matrix
    ///
    /// The diagonal is 1. Entries involving a field without positive variance are 0.
    pub fn correlation(&self) -> Array2<f64> {
        let n = self.fields.len();
        Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                return 1.0;
            }
            let denom = (self.cov[[i, i]] * self.cov[[j, j]]).sqrt();
            if denom > 0.0 {
                self.cov[[i, j]] / denom
            } else {
                0.0
            }
        })
    }
}

/// The result of fitting a model over the record type `T`
#[derive(Debug, Clone)]
pub struct FitResult<T> {
    /// The optimal instance found by the fit
    pub instance: T,

    /// Covariance of the fitting parameters
    pub cov: CovMatrix,

    /// Uncertainties of the observed values, if the fit was weighted
    pub sigma: Option<Array1<f64>>,

    /// The start instance given by the caller, if any
    pub p0: Option<T>,
}
