// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` connects the pure, Arrow-agnostic `pipeline` engine to columnar
// callers and owns every byte-level contract that leaves the process.
//
// Data Flow (Encoding):
//
//   1. [Stateless API (encode_arrow_array)] -> Receives `&dyn Array`
//         |
//         `-> a. Calls `arrow_impl` to convert `&dyn Array` -> `TypedArray`
//         |
//         `-> b. Calls the pure engine with the `TypedArray` and a `Pipeline`
//
//   2. [Pipeline Engine (pipeline::executor)] -> Returns `EncodedColumn`
//         |
//         `-> optionally framed by `EncodedColumn::to_bytes` (see `format`)
//
// Data Flow (Decoding):
//
//   1. [Pipeline Engine (pipeline::executor)] -> Receives `EncodedColumn`
//         |
//         `-> Returns `TypedArray`
//
//   2. [Stateless API (decode_to_arrow_array)] -> Converts to `ArrayRef`
//
// ====================================================================================
pub(crate) mod arrow_impl;
pub mod format;
pub mod stateless_api;

pub use arrow_impl::{typed_array_from_arrow, typed_array_to_arrow};
pub use format::{descriptors_from_json, descriptors_to_json, ColumnStats};
pub use stateless_api::{
    analyze_column, decode_to_arrow_array, encode_arrow_array, encode_arrow_array_auto,
};
