//! Fit specifications
//!
//! A fit specification is derived once from a record layout and tells an
//! optimizer driver everything it needs: which fields form the flat parameter
//! vector, the bounds of that vector, and how to convert between the vector and
//! a full record.
//!
//! [`FitSpecBase`] is independent of any record type and converts between flat
//! arrays and [`FieldValues`]. [`FitSpec`] pins a base specification to a
//! [`FitRecord`] type and converts to and from record instances.

use crate::error::{FitParamsError, Result};
use crate::fields::{field_value, FieldKind, FieldValues};
use crate::record::FitRecord;
use crate::spec::resolver::{DefaultResolver, DependentResolver};
use ndarray::{Array1, ArrayView2};
use rayon::prelude::*;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

/// One side of the bounds handed to an optimizer
#[derive(Debug, Clone, PartialEq)]
pub enum BoundVector {
    /// The same bound for every fitting parameter
    Scalar(f64),

    /// One bound per fitting parameter
    Dense(Array1<f64>),
}

impl BoundVector {
    /// Expand to one bound per fitting parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::spec::BoundVector;
    ///
    /// let lower = BoundVector::Scalar(f64::NEG_INFINITY);
    /// assert_eq!(lower.to_dense(2).len(), 2);
    /// ```
    pub fn to_dense(&self, n: usize) -> Array1<f64> {
        match self {
            BoundVector::Scalar(value) => Array1::from_elem(n, *value),
            BoundVector::Dense(values) => values.clone(),
        }
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, BoundVector::Dense(_))
    }
}

/// The specification of a fit, independent of a record type
///
/// Instances are created by [`FitSpecBase::generate`] and never change
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FitSpecBase {
    /// The number of fields, including const and same-as fields
    pub(crate) special_param_count: usize,

    /// The order in which the fields are initialized
    pub(crate) init_order: Vec<String>,

    /// The fields forming the fitting vector, in declaration order
    pub(crate) fitting_params: Vec<String>,

    /// The kind of every field, in declaration order
    pub(crate) field_kinds: Vec<(String, FieldKind)>,

    /// Default resolvers aligned with `init_order`
    pub(crate) default_resolvers: Vec<DefaultResolver>,

    /// Lower bounds aligned with `fitting_params`, if any field sets one
    pub(crate) lower_bounds: Option<Array1<f64>>,

    /// Upper bounds aligned with `fitting_params`, if any field sets one
    pub(crate) upper_bounds: Option<Array1<f64>>,

    /// Resolvers for the same-as fields, in initialization order
    pub(crate) dependent_resolvers: Vec<DependentResolver>,

    /// Values of the const fields, in declaration order
    pub(crate) const_values: Vec<(String, f64)>,
}

impl FitSpecBase {
    /// The number of fields, including const and same-as fields
    pub fn special_param_count(&self) -> usize {
        self.special_param_count
    }

    /// The number of fields in the fitting vector
    pub fn fitting_param_count(&self) -> usize {
        self.fitting_params.len()
    }

    pub fn init_order(&self) -> &[String] {
        &self.init_order
    }

    pub fn fitting_params(&self) -> &[String] {
        &self.fitting_params
    }

    /// Position of a field in the fitting vector
    pub fn fitting_index(&self, name: &str) -> Option<usize> {
        self.fitting_params.iter().position(|p| p == name)
    }

    /// The kind of every field, in declaration order
    pub fn fitting_field_kinds(&self) -> &[(String, FieldKind)] {
        &self.field_kinds
    }

    pub fn field_kind(&self, name: &str) -> Option<&FieldKind> {
        self.field_kinds
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, kind)| kind)
    }

    /// Default resolvers aligned with [`FitSpecBase::init_order`]
    pub fn default_resolvers(&self) -> &[DefaultResolver] {
        &self.default_resolvers
    }

    pub fn dependent_resolvers(&self) -> &[DependentResolver] {
        &self.dependent_resolvers
    }

    /// Lower bounds aligned with the fitting vector
    ///
    /// `None` if no field declares a finite lower bound.
    pub fn lower_bounds(&self) -> Option<&Array1<f64>> {
        self.lower_bounds.as_ref()
    }

    /// Upper bounds aligned with the fitting vector
    ///
    /// `None` if no field declares a finite upper bound.
    pub fn upper_bounds(&self) -> Option<&Array1<f64>> {
        self.upper_bounds.as_ref()
    }

    /// The paired bounds argument for a bounded optimizer
    ///
    /// A side without any finite bound is a scalar infinity.
    pub fn bounds(&self) -> (BoundVector, BoundVector) {
        let lower = match &self.lower_bounds {
            Some(values) => BoundVector::Dense(values.clone()),
            None => BoundVector::Scalar(f64::NEG_INFINITY),
        };
        let upper = match &self.upper_bounds {
            Some(values) => BoundVector::Dense(values.clone()),
            None => BoundVector::Scalar(f64::INFINITY),
        };
        (lower, upper)
    }

    /// The bounds expanded to one entry per fitting parameter
    pub fn dense_bounds(&self) -> (Array1<f64>, Array1<f64>) {
        let n = self.fitting_param_count();
        let (lower, upper) = self.bounds();
        (lower.to_dense(n), upper.to_dense(n))
    }

    /// A zeroed array with one slot per fitting parameter
    pub fn new_array(&self) -> Array1<f64> {
        Array1::zeros(self.fitting_param_count())
    }

    fn check_len(&self, actual: usize) -> Result<()> {
        let expected = self.fitting_param_count();
        if actual != expected {
            return Err(FitParamsError::ShapeMismatch { expected, actual });
        }
        Ok(())
    }

    /// Resolve the default value of every field
    ///
    /// Fields are resolved in initialization order, so same-as fields see the
    /// resolved value of their source.
    pub fn default_values(&self) -> Result<FieldValues> {
        let mut values = FieldValues::with_capacity(self.special_param_count);
        for (name, resolver) in self.init_order.iter().zip(&self.default_resolvers) {
            let value = resolver.resolve(&values)?;
            values.insert(name.clone(), value);
        }
        Ok(values)
    }

    /// Write the fitting fields of `values` into `out`
    ///
    /// # Arguments
    ///
    /// * `values` - Values of at least all fitting fields
    /// * `out` - Output slice with one slot per fitting parameter
    ///
    /// # Returns
    ///
    /// `Ok(())`, [`FitParamsError::ShapeMismatch`] if `out` has the wrong length,
    /// or [`FitParamsError::MissingValue`] if a fitting field has no value. `out`
    /// is only written on success.
    pub fn values_to_array(&self, values: &FieldValues, out: &mut [f64]) -> Result<()> {
        self.check_len(out.len())?;
        let fitted = self
            .fitting_params
            .iter()
            .map(|name| field_value(values, name))
            .collect::<Result<Vec<_>>>()?;
        out.copy_from_slice(&fitted);
        Ok(())
    }

    /// Reconstruct the field values from a fitting vector
    ///
    /// The result holds the fitting fields, the const fields and every same-as
    /// field resolved from its source.
    ///
    /// # Returns
    ///
    /// The field values, or [`FitParamsError::ShapeMismatch`] if `array` has the
    /// wrong length
    pub fn array_to_values(&self, array: &[f64]) -> Result<FieldValues> {
        self.check_len(array.len())?;

        let mut values = FieldValues::with_capacity(self.special_param_count);
        for (name, &value) in self.fitting_params.iter().zip(array) {
            values.insert(name.clone(), value);
        }
        for (name, value) in &self.const_values {
            values.insert(name.clone(), *value);
        }

        for resolver in &self.dependent_resolvers {
            resolver.apply(&mut values)?;
        }

        Ok(values)
    }
}

/// A fit specification pinned to the record type `T`
///
/// Cloning is cheap and the specification can be shared between threads.
pub struct FitSpec<T> {
    base: Arc<FitSpecBase>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for FitSpec<T> {
    fn clone(&self) -> Self {
        Self {
            base: Arc::clone(&self.base),
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for FitSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FitSpec")
            .field("record", &std::any::type_name::<T>())
            .field("base", &self.base)
            .finish()
    }
}

impl<T> Deref for FitSpec<T> {
    type Target = FitSpecBase;

    fn deref(&self) -> &FitSpecBase {
        &self.base
    }
}

impl<T: FitRecord> FitSpec<T> {
    /// Generate the specification from `T::layout()`
    pub fn generate() -> Result<Self> {
        let base = FitSpecBase::generate(&T::layout())?;
        Ok(Self {
            base: Arc::new(base),
            _record: PhantomData,
        })
    }

    /// Pin an already generated base specification to `T`
    ///
    /// # Returns
    ///
    /// The typed specification, or an error if `base` was not generated from
    /// `T::layout()`: [`FitParamsError::ShapeMismatch`] if the field counts
    /// differ, [`FitParamsError::UnknownField`] for a field `T` does not
    /// declare, and [`FitParamsError::Other`] if the declarations differ in
    /// kind or order.
    pub fn pin(base: Arc<FitSpecBase>) -> Result<Self> {
        let layout = T::layout();
        if layout.len() != base.special_param_count() {
            return Err(FitParamsError::ShapeMismatch {
                expected: layout.len(),
                actual: base.special_param_count(),
            });
        }
        if let Some((name, _)) = base
            .fitting_field_kinds()
            .iter()
            .find(|(name, _)| !layout.contains(name))
        {
            return Err(FitParamsError::UnknownField { name: name.clone() });
        }
        if FitSpecBase::generate(&layout)? != *base {
            return Err(FitParamsError::Other(format!(
                "Specification does not match the layout of {}",
                std::any::type_name::<T>()
            )));
        }

        Ok(Self {
            base,
            _record: PhantomData,
        })
    }

    /// The shared base specification
    pub fn base(&self) -> &Arc<FitSpecBase> {
        &self.base
    }

    /// Construct an instance from the default values of all fields
    pub fn create_default_instance(&self) -> Result<T> {
        T::from_values(&self.base.default_values()?)
    }

    /// Write the fitting fields of `instance` into `out`
    ///
    /// `out` is only written on success.
    pub fn instance_to_array(&self, instance: &T, out: &mut [f64]) -> Result<()> {
        self.base.check_len(out.len())?;
        let fitted = self
            .base
            .fitting_params
            .iter()
            .map(|name| {
                instance
                    .field_value(name)
                    .ok_or_else(|| FitParamsError::MissingValue { name: name.clone() })
            })
            .collect::<Result<Vec<_>>>()?;
        out.copy_from_slice(&fitted);
        Ok(())
    }

    /// The fitting vector of `instance` as a new array
    pub fn instance_to_vec(&self, instance: &T) -> Result<Array1<f64>> {
        let mut out = vec![0.0; self.base.fitting_param_count()];
        self.instance_to_array(instance, &mut out)?;
        Ok(Array1::from_vec(out))
    }

    /// Construct an instance from a fitting vector
    pub fn array_to_instance(&self, array: &[f64]) -> Result<T> {
        T::from_values(&self.base.array_to_values(array)?)
    }

    /// Construct one instance per row of `rows`
    ///
    /// Rows are converted in parallel. Every row must hold one value per
    /// fitting parameter.
    pub fn arrays_to_instances(&self, rows: ArrayView2<f64>) -> Result<Vec<T>>
    where
        T: Send,
    {
        self.base.check_len(rows.ncols())?;
        (0..rows.nrows())
            .into_par_iter()
            .map(|i| self.array_to_instance(&rows.row(i).to_vec()))
            .collect()
    }
}
