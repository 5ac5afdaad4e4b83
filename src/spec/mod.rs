//! # Fit Specifications
//!
//! Everything an optimizer driver needs to know about a record type, derived
//! once from its [`RecordLayout`](crate::fields::RecordLayout):
//!
//! - which fields form the flat fitting vector, in declaration order
//! - the lower and upper bounds of that vector
//! - the order in which fields must be initialized so that same-as fields can
//!   copy the value of their source
//! - conversions between the fitting vector and full records
//!
//! ## Example Usage
//!
//! ```rust
//! use fitparams_rs::fields::{FieldDecl, RecordLayout};
//! use fitparams_rs::spec::FitSpecBase;
//!
//! let layout = RecordLayout::new(vec![
//!     FieldDecl::bounded("a", Some(0.0), Some(1.0)).unwrap(),
//!     FieldDecl::regular("b"),
//!     FieldDecl::same_as("c", "b"),
//! ])
//! .unwrap();
//!
//! let spec = FitSpecBase::generate(&layout).unwrap();
//! assert_eq!(spec.fitting_params(), ["a", "b"]);
//!
//! let values = spec.array_to_values(&[0.25, 3.0]).unwrap();
//! assert_eq!(values["c"], 3.0);
//! ```

pub mod builder;
pub mod fit_spec;
pub mod resolver;

pub use fit_spec::{BoundVector, FitSpec, FitSpecBase};
pub use resolver::{DefaultResolver, DependentResolver};
