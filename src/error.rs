// In: src/error.rs

//! This module defines the single, unified error type for the entire bincol library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every variant belongs to exactly one of three categories (see [`ErrorCategory`]):
//! errors raised while *building* a pipeline, while *encoding* a column, or while
//! *decoding* one. None of them are retried by the codec itself.

use thiserror::Error;

/// The phase of the codec in which an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid step chaining or invalid static parameters. Raised eagerly.
    Construction,
    /// Input data the pipeline cannot encode (e.g. NaN into Fixed-Point).
    Encode,
    /// Malformed descriptors or payload bytes.
    Decode,
}

#[derive(Error, Debug)]
pub enum CodecError {
    // =========================================================================
    // === Construction Errors
    // =========================================================================
    #[error("Invalid pipeline chain: {0}")]
    InvalidChain(String),

    #[error("Invalid parameter for {step}: {reason}")]
    InvalidParameter { step: &'static str, reason: String },

    // =========================================================================
    // === Encode Errors
    // =========================================================================
    #[error("Invalid input for encoding: {0}")]
    InvalidInput(String),

    // =========================================================================
    // === Decode Errors
    // =========================================================================
    #[error("Unknown encoding kind: '{0}'")]
    UnknownEncoding(String),

    #[error("Buffer length mismatch: expected a multiple of {0}, got {1}")]
    BufferMismatch(usize, usize),

    #[error("Integer packing stream ends inside a sentinel run at element {0}")]
    TruncatedSentinelRun(usize),

    #[error("Corrupt encoded stream: {0}")]
    CorruptStream(String),

    #[error("Column artifact serialization/deserialization failed: {0}")]
    ArtifactFormat(String),

    /// An error from the Serde JSON library, typically while parsing descriptors.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error

    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    // =========================================================================
    // === Context Wrapper
    // =========================================================================
    #[error("Pipeline execution failed at step '{step}': {source}")]
    PipelineError {
        step: String,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Classifies this error by the phase that raised it.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CodecError::InvalidChain(_) | CodecError::InvalidParameter { .. } => {
                ErrorCategory::Construction
            }
            CodecError::InvalidInput(_) | CodecError::Arrow(_) => ErrorCategory::Encode,
            CodecError::UnknownEncoding(_)
            | CodecError::BufferMismatch(..)
            | CodecError::TruncatedSentinelRun(_)
            | CodecError::CorruptStream(_)
            | CodecError::ArtifactFormat(_)
            | CodecError::SerdeJson(_)
            | CodecError::PodCast(_) => ErrorCategory::Decode,
            CodecError::PipelineError { source, .. } => source.category(),
        }
    }

    /// Returns the innermost error, looking through `PipelineError` wrappers.
    pub fn root_cause(&self) -> &CodecError {
        match self {
            CodecError::PipelineError { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn at_step(self, step: impl Into<String>) -> Self {
        CodecError::PipelineError {
            step: step.into(),
            source: Box::new(self),
        }
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for CodecError {
    fn from(err: bytemuck::PodCastError) -> Self {
        CodecError::PodCast(err.to_string())
    }
}
