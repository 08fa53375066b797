// In: src/config.rs

//! The single source of truth for codec configuration.
//!
//! `CodecConfig` is created once at the application boundary (e.g. parsed from a
//! JSON file) and passed down by shared reference. Only the decoder's allocation
//! guard and the planner read it; building and running an explicit pipeline needs
//! no configuration at all.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::pipeline::models::Step;

//==================================================================================
// I. Planning Profile
//==================================================================================

/// Defines how hard the planner looks for a small pipeline.
///
/// Every profile only ever produces ordinary, fully reversible pipelines; the
/// profile just controls how many candidates are trial-encoded.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanningProfile {
    /// Trials only the candidates without Run-Length.
    Fast,

    /// Adds the Run-Length candidates. This is the recommended default.
    #[default]
    Balanced,

    /// Like `Balanced`, plus Run-Length candidates that skip Integer Packing.
    Exhaustive,
}

//==================================================================================
// II. The Unified CodecConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// The profile guiding the planner's candidate set.
    #[serde(default)]
    pub profile: PlanningProfile,

    /// The largest number of decimal digits the planner infers for a
    /// Fixed-Point factor (`10^digits`).
    #[serde(default = "default_max_float_digits")]
    pub max_float_digits: u8,

    /// Upper bound on the number of elements any decode step may materialize.
    /// Guards against crafted size fields forcing huge allocations.
    #[serde(default = "default_max_decoded_len")]
    pub max_decoded_len: usize,

    /// Explicit index pipeline for planned String-Array columns. `None` lets the
    /// planner decide.
    #[serde(default)]
    pub string_index_pipeline: Option<Vec<Step>>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            profile: PlanningProfile::default(),
            max_float_digits: default_max_float_digits(),
            max_decoded_len: default_max_decoded_len(),
            string_index_pipeline: None,
        }
    }
}

impl CodecConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_max_float_digits() -> u8 {
    4
}

fn default_max_decoded_len() -> usize {
    1 << 28
}
