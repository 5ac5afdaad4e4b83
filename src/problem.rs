//! Problem definition for least-squares optimizers.
//!
//! This module defines the `Problem` trait, the residual-function interface a
//! bounded nonlinear least-squares solver consumes, and [`CurveFitProblem`],
//! which exposes a model over a [`FitRecord`] as such a problem: the solver
//! works on the flat fitting vector while the model function sees a full record.

use crate::error::{FitParamsError, Result};
use crate::fit_result::{CovMatrix, FitResult};
use crate::record::FitRecord;
use crate::spec::{BoundVector, FitSpec};
use ndarray::{Array1, Array2};

/// A trait representing a nonlinear least squares problem.
pub trait Problem {
    /// Evaluate the residuals at the given parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The parameter values at which to evaluate the residuals
    ///
    /// # Returns
    ///
    /// * A vector of residuals, or an error if the evaluation fails
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>>;

    /// Get the number of parameters in the problem.
    fn parameter_count(&self) -> usize;

    /// Get the number of residuals in the problem.
    fn residual_count(&self) -> usize;

    /// Evaluate the sum of squared residuals at the given parameters.
    fn eval_cost(&self, params: &Array1<f64>) -> Result<f64> {
        let residuals = self.eval(params)?;
        Ok(residuals.iter().map(|r| r.powi(2)).sum())
    }
}

/// A curve fit of a model over the record type `T`
///
/// The model receives the x data and a record built from the current
/// parameter vector, and returns the predicted y values.
pub struct CurveFitProblem<T, F> {
    spec: FitSpec<T>,
    x: Array1<f64>,
    y: Array1<f64>,
    sigma: Option<Array1<f64>>,
    model: F,
}

impl<T, F> CurveFitProblem<T, F>
where
    T: FitRecord,
    F: Fn(&Array1<f64>, &T) -> Result<Array1<f64>>,
{
    /// Create a new curve fit problem
    ///
    /// # Arguments
    ///
    /// * `spec` - The specification of the record type
    /// * `x` - The independent variable values
    /// * `y` - The observed values
    /// * `model` - The model function
    ///
    /// # Returns
    ///
    /// The problem, or [`FitParamsError::ShapeMismatch`] if `x` and `y` differ in length
    pub fn new(spec: FitSpec<T>, x: Array1<f64>, y: Array1<f64>, model: F) -> Result<Self> {
        if x.len() != y.len() {
            return Err(FitParamsError::ShapeMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        Ok(Self {
            spec,
            x,
            y,
            sigma: None,
            model,
        })
    }

    /// Weight the residuals by the uncertainties of the observed values
    pub fn with_sigma(mut self, sigma: Array1<f64>) -> Result<Self> {
        if sigma.len() != self.y.len() {
            return Err(FitParamsError::ShapeMismatch {
                expected: self.y.len(),
                actual: sigma.len(),
            });
        }
        self.sigma = Some(sigma);
        Ok(self)
    }

    pub fn spec(&self) -> &FitSpec<T> {
        &self.spec
    }

    /// Names of the entries of the parameter vector
    pub fn labels(&self) -> &[String] {
        self.spec.fitting_params()
    }

    /// The bounds argument for the solver
    pub fn bounds(&self) -> (BoundVector, BoundVector) {
        self.spec.bounds()
    }

    /// The start vector for the solver
    ///
    /// Uses `p0` if given, otherwise the default instance of `T`.
    pub fn initial_params(&self, p0: Option<&T>) -> Result<Array1<f64>> {
        match p0 {
            Some(instance) => self.spec.instance_to_vec(instance),
            None => {
                let instance = self.spec.create_default_instance()?;
                self.spec.instance_to_vec(&instance)
            }
        }
    }

    /// The record described by a parameter vector, e.g. the solver's result
    pub fn instance(&self, params: &Array1<f64>) -> Result<T> {
        self.spec.array_to_instance(&params.to_vec())
    }

    /// Assemble the fit result from a solver's output
    ///
    /// # Arguments
    ///
    /// * `popt` - The optimal parameter vector
    /// * `pcov` - The covariance of `popt`, one row and column per fitting parameter
    /// * `p0` - The start instance the solver was given, if any
    ///
    /// # Returns
    ///
    /// The result, or [`FitParamsError::ShapeMismatch`] if `popt` or `pcov` do
    /// not match the number of fitting parameters
    pub fn fit_result(
        &self,
        popt: &Array1<f64>,
        pcov: Array2<f64>,
        p0: Option<T>,
    ) -> Result<FitResult<T>> {
        let instance = self.instance(popt)?;
        let cov = CovMatrix::new(self.labels().to_vec(), pcov)?;
        Ok(FitResult {
            instance,
            cov,
            sigma: self.sigma.clone(),
            p0,
        })
    }
}

impl<T, F> Problem for CurveFitProblem<T, F>
where
    T: FitRecord,
    F: Fn(&Array1<f64>, &T) -> Result<Array1<f64>>,
{
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let instance = self.instance(params)?;
        let predicted = (self.model)(&self.x, &instance)?;

        if predicted.len() != self.y.len() {
            return Err(FitParamsError::ModelEvaluation(format!(
                "Expected {} model values, got {}",
                self.y.len(),
                predicted.len()
            )));
        }

        let residuals = predicted - &self.y;
        match &self.sigma {
            Some(sigma) => Ok(residuals / sigma),
            None => Ok(residuals),
        }
    }

    fn parameter_count(&self) -> usize {
        self.spec.fitting_param_count()
    }

    fn residual_count(&self) -> usize {
        self.y.len()
    }
}
