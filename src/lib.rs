//! # fitparams-rs
//!
//! `fitparams-rs` derives everything a nonlinear least-squares optimizer needs
//! from a declarative description of a model's parameters.
//!
//! The parameters of a model are the fields of a record type. Each field is
//! declared as regular, bounded, constant, or the same as another field. From
//! these declarations the library derives:
//! - the fields that form the flat parameter vector and their bounds
//! - a dependency-consistent initialization order with cycle detection
//! - default instances and conversions between parameter vectors and records
//!
//! ## Basic Usage
//!
//! ```
//! use fitparams_rs::fields::{FieldDecl, RecordLayout};
//! use fitparams_rs::spec::FitSpecBase;
//!
//! let layout = RecordLayout::new(vec![
//!     FieldDecl::bounded("a", Some(0.0), Some(1.0)).unwrap(),
//!     FieldDecl::bounded("b", None, None).unwrap(),
//! ])
//! .unwrap();
//!
//! let spec = FitSpecBase::generate(&layout).unwrap();
//! assert_eq!(spec.lower_bounds().unwrap().to_vec(), vec![0.0, f64::NEG_INFINITY]);
//! assert_eq!(spec.upper_bounds().unwrap().to_vec(), vec![1.0, f64::INFINITY]);
//! ```

// Public modules
pub mod error;

// Field declarations
pub mod fields;

pub mod depgraph;
pub mod record;
pub mod spec;

pub mod fit_result;
pub mod problem;

// Re-exports for convenience
pub use error::{FitParamsError, Result};
pub use fields::{FieldDecl, FieldKind, RecordLayout};
pub use fit_result::{CovMatrix, FitResult};
pub use record::FitRecord;
pub use spec::{FitSpec, FitSpecBase};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
