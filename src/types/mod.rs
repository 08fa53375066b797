//! This module defines the core, strongly-typed data representations used
//! throughout the bincol pipeline.
//!
//! It includes the `ElementType` enum naming the physical layout of a column,
//! the coarse `ValueKind` used to validate step chaining, and `TypedArray`, the
//! owned column value that enters and leaves the codec.

pub mod element_type;
pub mod typed_array;

// Re-export the main type(s) for easier access.
pub use element_type::{ElementType, ValueKind};
pub use typed_array::TypedArray;
