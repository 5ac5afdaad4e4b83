//! Record types taking part in a fit
//!
//! A record type describes the parameters of a model as named `f64` fields.
//! Implementing [`FitRecord`] connects such a type to the specification
//! machinery: it provides the field metadata and constructs instances from
//! resolved field values.

use crate::error::Result;
use crate::fields::{FieldValues, RecordLayout};

/// A record type whose fields can be fitted
///
/// # Examples
///
/// ```
/// use fitparams_rs::error::Result;
/// use fitparams_rs::fields::{field_value, FieldDecl, FieldValues, RecordLayout};
/// use fitparams_rs::record::FitRecord;
/// use fitparams_rs::spec::FitSpec;
///
/// struct Decay {
///     amplitude: f64,
///     rate: f64,
///     offset: f64,
/// }
///
/// impl FitRecord for Decay {
///     fn layout() -> RecordLayout {
///         RecordLayout::new(vec![
///             FieldDecl::bounded("amplitude", Some(0.0), None).unwrap(),
///             FieldDecl::regular("rate").with_default(1.0),
///             FieldDecl::constant("offset", 0.5),
///         ])
///         .unwrap()
///     }
///
///     fn from_values(values: &FieldValues) -> Result<Self> {
///         Ok(Self {
///             amplitude: field_value(values, "amplitude")?,
///             rate: field_value(values, "rate")?,
///             offset: values.get("offset").copied().unwrap_or(0.5),
///         })
///     }
///
///     fn field_value(&self, name: &str) -> Option<f64> {
///         match name {
///             "amplitude" => Some(self.amplitude),
///             "rate" => Some(self.rate),
///             "offset" => Some(self.offset),
///             _ => None,
///         }
///     }
/// }
///
/// let spec = FitSpec::<Decay>::generate().unwrap();
/// let initial = spec.create_default_instance().unwrap();
/// assert_eq!(initial.amplitude, 1.0);
/// assert_eq!(initial.rate, 1.0);
/// assert_eq!(spec.instance_to_vec(&initial).unwrap().to_vec(), vec![1.0, 1.0]);
/// ```
pub trait FitRecord: Sized {
    /// The field declarations of the record, in declaration order
    fn layout() -> RecordLayout;

    /// Construct a record from resolved field values
    ///
    /// `values` holds every fitting and same-as field. Const fields may be
    /// missing, in which case the record supplies its own constant.
    fn from_values(values: &FieldValues) -> Result<Self>;

    /// The value of a field, or `None` if the record has no such field
    fn field_value(&self, name: &str) -> Option<f64>;
}
