//! This file is the root of the `bincol` Rust crate.
//!
//! `bincol` encodes a single typed column (integers, floats or strings) through a
//! user-chosen pipeline of reversible steps into a compact byte payload plus a
//! self-describing list of encoding descriptors. Decoding needs nothing but that
//! pair.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`pipeline`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the public surface, so callers can write `bincol::encode` and
//!     `bincol::Step` without knowing the module layout.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod error;
pub mod kernels;
pub mod pipeline;
pub mod types;

mod traits;
mod utils;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use config::{CodecConfig, PlanningProfile};
pub use error::{CodecError, ErrorCategory};
pub use observability::enable_verbose_logging;
pub use pipeline::{
    decode, decode_with, encode, encode_auto, plan_column, EncodedColumn, EncodingDescriptor,
    HeaderInfo, Pipeline, PipelineBuilder, Step, StepBehavior,
};
pub use types::{ElementType, TypedArray, ValueKind};
