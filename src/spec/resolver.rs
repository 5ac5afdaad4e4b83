//! Value resolvers
//!
//! Resolvers compute the value of one field from the values of fields that
//! have already been resolved. There are exactly three behaviours, so they are
//! plain enums rather than trait objects.

use crate::error::Result;
use crate::fields::{field_value, FieldValues};

/// Produces the default value of a field
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultResolver {
    /// No default declared and none derivable; yields `0.0`
    Unset,

    /// A fixed value
    Fixed(f64),

    /// Copies the already resolved value of the named field
    CopyFrom(String),
}

impl DefaultResolver {
    /// Resolve the default value given the values resolved so far
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::fields::FieldValues;
    /// use fitparams_rs::spec::DefaultResolver;
    ///
    /// let mut resolved = FieldValues::new();
    /// resolved.insert("a".to_string(), 2.5);
    ///
    /// assert_eq!(DefaultResolver::Unset.resolve(&resolved).unwrap(), 0.0);
    /// assert_eq!(DefaultResolver::Fixed(1.0).resolve(&resolved).unwrap(), 1.0);
    /// assert_eq!(
    ///     DefaultResolver::CopyFrom("a".to_string()).resolve(&resolved).unwrap(),
    ///     2.5
    /// );
    /// ```
    pub fn resolve(&self, resolved: &FieldValues) -> Result<f64> {
        match self {
            DefaultResolver::Unset => Ok(0.0),
            DefaultResolver::Fixed(value) => Ok(*value),
            DefaultResolver::CopyFrom(source) => field_value(resolved, source),
        }
    }
}

/// Resolves the value of a same-as field from its source field
#[derive(Debug, Clone, PartialEq)]
pub struct DependentResolver {
    /// The field whose value is resolved
    pub target: String,

    /// The field the value is copied from
    pub source: String,
}

impl DependentResolver {
    pub fn new(target: &str, source: &str) -> Self {
        Self {
            target: target.to_string(),
            source: source.to_string(),
        }
    }

    /// Copy the source value into `values` under the target name
    pub fn apply(&self, values: &mut FieldValues) -> Result<f64> {
        let value = field_value(values, &self.source)?;
        values.insert(self.target.clone(), value);
        Ok(value)
    }
}
