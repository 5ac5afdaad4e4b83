//! Field declarations
//!
//! A record type that takes part in a fit declares each of its fields as one of
//! four kinds. This module provides the closed [`FieldKind`] enum, the
//! [`FieldDecl`] that pairs a kind with a field name and declared default, and
//! the [`FieldValues`] map used to pass resolved field values around.

use crate::error::{FitParamsError, Result};
use crate::fields::bounds::{Bounds, BoundsError};
use std::collections::HashMap;

/// Resolved field values keyed by field name
pub type FieldValues = HashMap<String, f64>;

/// Look up a field value, failing with [`FitParamsError::MissingValue`] if absent
///
/// # Examples
///
/// ```
/// use fitparams_rs::fields::{field_value, FieldValues};
///
/// let mut values = FieldValues::new();
/// values.insert("a".to_string(), 1.5);
/// assert_eq!(field_value(&values, "a").unwrap(), 1.5);
/// assert!(field_value(&values, "b").is_err());
/// ```
pub fn field_value(values: &FieldValues, name: &str) -> Result<f64> {
    values
        .get(name)
        .copied()
        .ok_or_else(|| FitParamsError::MissingValue {
            name: name.to_string(),
        })
}

/// The kind of a fit field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A plain fitting parameter without bounds
    Regular,

    /// A fitting parameter restricted to a region
    Bounded(Bounds),

    /// A fixed value that is never fitted
    Const(f64),

    /// Always equal to the named field
    SameAs(String),
}

impl FieldKind {
    /// The tag used for this kind in record layout files
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::Regular => "regular",
            FieldKind::Bounded(_) => "bounded",
            FieldKind::Const(_) => "const",
            FieldKind::SameAs(_) => "same_as",
        }
    }

    /// Whether a field of this kind is part of the fitting vector
    pub fn is_fitting(&self) -> bool {
        matches!(self, FieldKind::Regular | FieldKind::Bounded(_))
    }
}

/// A single field declaration of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Name of the field, unique within its record type
    pub name: String,

    /// Kind of the field
    pub kind: FieldKind,

    /// Default value declared for the field, if any
    pub default: Option<f64>,
}

impl FieldDecl {
    /// Declare a field with an explicit kind and no default
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default: None,
        }
    }

    /// Declare a regular fitting field
    pub fn regular(name: &str) -> Self {
        Self::new(name, FieldKind::Regular)
    }

    /// Declare a bounded fitting field
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the field
    /// * `min` - Lower bound, `None` for unbounded from below
    /// * `max` - Upper bound, `None` for unbounded from above
    ///
    /// # Returns
    ///
    /// The declaration, or an error if `min > max`
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fields::FieldDecl;
    ///
    /// let decl = FieldDecl::bounded("amplitude", Some(0.0), None).unwrap();
    /// assert_eq!(decl.name, "amplitude");
    /// assert!(FieldDecl::bounded("x", Some(1.0), Some(0.0)).is_err());
    /// ```
    pub fn bounded(
        name: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> std::result::Result<Self, BoundsError> {
        let bounds = Bounds::from_options(min, max)?;
        Ok(Self::new(name, FieldKind::Bounded(bounds)))
    }

    /// Declare a constant field
    ///
    /// The value doubles as the declared default.
    pub fn constant(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Const(value),
            default: Some(value),
        }
    }

    /// Declare a field that always equals `target`
    pub fn same_as(name: &str, target: &str) -> Self {
        Self::new(name, FieldKind::SameAs(target.to_string()))
    }

    /// Set the declared default value
    pub fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self
    }
}
