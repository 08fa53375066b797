//! The validated pipeline and its fluent builder.
//!
//! Every chaining rule is enforced while the chain is assembled: a step whose
//! accepted kind does not match its predecessor's output, a step appended after
//! a terminal one, invalid static parameters and a chain without a terminal step
//! are all construction errors. A `Pipeline` value is therefore always runnable.

use crate::error::CodecError;
use crate::pipeline::executor;
use crate::pipeline::models::{EncodedColumn, Step};
use crate::pipeline::traits::StepBehavior;
use crate::types::{TypedArray, ValueKind};

/// An ordered, validated chain of steps ending in a terminal step.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    input_kind: ValueKind,
    steps: Vec<Step>,
}

/// An in-progress chain. Created by [`Pipeline::by`].
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    input_kind: ValueKind,
    current_kind: ValueKind,
    steps: Vec<Step>,
}

impl Pipeline {
    /// Starts a chain for `input_kind` values with `step` as the first step.
    pub fn by(input_kind: ValueKind, step: Step) -> Result<PipelineBuilder, CodecError> {
        PipelineBuilder {
            input_kind,
            current_kind: input_kind,
            steps: Vec::new(),
        }
        .and(step)
    }

    /// Builds a pipeline from a list of steps in encode order.
    pub fn from_steps(input_kind: ValueKind, steps: Vec<Step>) -> Result<Pipeline, CodecError> {
        let mut iter = steps.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| CodecError::InvalidChain("a pipeline needs at least one step".into()))?;
        iter.try_fold(Pipeline::by(input_kind, first)?, PipelineBuilder::and)?
            .build()
    }

    pub fn input_kind(&self) -> ValueKind {
        self.input_kind
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    /// Runs the pipeline over `array`. See [`executor::encode`].
    pub fn encode(&self, array: &TypedArray) -> Result<EncodedColumn, CodecError> {
        executor::encode(array, self)
    }

    /// Human-readable chain, e.g. `Delta > IntegerPacking > ByteArray`.
    pub fn describe(&self) -> String {
        self.steps
            .iter()
            .map(Step::kind_name)
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

impl PipelineBuilder {
    /// Appends `step`, validating it against the current output kind.
    pub fn and(mut self, step: Step) -> Result<Self, CodecError> {
        if let Some(last) = self.steps.last() {
            if last.is_terminal() {
                return Err(CodecError::InvalidChain(format!(
                    "cannot append {} after terminal step {}",
                    step.kind_name(),
                    last.kind_name()
                )));
            }
        }
        step.validate_params()?;
        self.current_kind = step.transform_kind(self.current_kind)?;
        self.steps.push(step);
        Ok(self)
    }

    /// Finishes the chain. The last step must be terminal.
    pub fn build(self) -> Result<Pipeline, CodecError> {
        match self.steps.last() {
            Some(last) if last.is_terminal() => Ok(Pipeline {
                input_kind: self.input_kind,
                steps: self.steps,
            }),
            Some(last) => Err(CodecError::InvalidChain(format!(
                "pipeline must end in a terminal step, but ends in {}",
                last.kind_name()
            ))),
            None => Err(CodecError::InvalidChain(
                "a pipeline needs at least one step".into(),
            )),
        }
    }
}
