//! # Field Declarations
//!
//! The metadata a record type provides about its fields. Every field of a record
//! that takes part in a fit is one of four kinds:
//!
//! - **Regular**: a plain fitting parameter
//! - **Bounded**: a fitting parameter restricted to `[min, max]`
//! - **Const**: a fixed value that is never fitted
//! - **SameAs**: always equal to another field of the same record
//!
//! ## Core Components
//!
//! - [`FieldKind`] and [`FieldDecl`]: the kind and declaration of a single field
//! - [`Bounds`]: the region of a bounded field and its default-value rules
//! - [`RecordLayout`]: the ordered declarations of a record type, loadable from JSON

pub mod bounds;
pub mod field;
pub mod layout;

// Re-export key types
pub use bounds::{Bounds, BoundsError};
pub use field::{field_value, FieldDecl, FieldKind, FieldValues};
pub use layout::RecordLayout;
