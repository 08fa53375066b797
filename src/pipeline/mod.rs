//! This module serves as the public API for the encoding pipeline.
//!
//! It composes the stateless kernels into validated chains and runs them in both
//! directions. Everything above this module (the bridge, the planner's callers)
//! only ever sees `Pipeline`, `Step`, `EncodingDescriptor` and `EncodedColumn`.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Step configurations, descriptors and the encoded column.
pub mod models;

/// The kind contract every step declares.
pub mod traits;

/// The validated chain and its fluent builder.
pub mod builder;

/// Runs steps forward and descriptors in reverse.
pub mod executor;

/// The framed single-buffer serialization of an encoded column.
pub mod artifact;

/// Optional empirical pipeline chooser.
pub mod planner;


//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use self::artifact::HeaderInfo;
pub use self::builder::{Pipeline, PipelineBuilder};
pub use self::executor::{decode, decode_with, encode};
pub use self::models::{EncodedColumn, EncodingDescriptor, Step};
pub use self::planner::{encode_auto, plan_column};
pub use self::traits::StepBehavior;
