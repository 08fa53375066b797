// In: src/pipeline/traits.rs

//! Defines the behavioral contract of pipeline steps.
//!
//! `StepBehavior` is the single source of truth for which value kinds a step
//! accepts and produces. The builder validates chains against it eagerly, so a
//! built `Pipeline` never fails on chaining at encode time.

use crate::error::CodecError;
use crate::kernels::{fixed_point, integer_packing::PackingLayout};
use crate::pipeline::models::Step;
use crate::types::ValueKind;

/// A trait implemented by every step, declaring its kind transform.
pub trait StepBehavior {
    /// The kind this step produces from `input`, or `InvalidChain` if the step
    /// does not accept `input`.
    fn transform_kind(&self, input: ValueKind) -> Result<ValueKind, CodecError>;

    /// Whether this step can follow a step producing `input`.
    fn accepts(&self, input: ValueKind) -> bool {
        self.transform_kind(input).is_ok()
    }

    /// Whether this step produces the final bytes of a column.
    fn is_terminal(&self) -> bool;

    /// Checks the step's static parameters.
    fn validate_params(&self) -> Result<(), CodecError>;
}

impl StepBehavior for Step {
    fn transform_kind(&self, input: ValueKind) -> Result<ValueKind, CodecError> {
        use ValueKind::*;

        let output = match (self, input) {
            (Step::FixedPoint { .. }, Float) => Integer,
            (Step::Delta | Step::RunLength | Step::IntegerPacking { .. }, Integer) => Integer,
            (Step::ByteArray, Integer | Float) => Bytes,
            (Step::StringArray { .. }, Text) => Bytes,
            (step, input) => {
                return Err(CodecError::InvalidChain(format!(
                    "{} does not accept {:?} input",
                    step.kind_name(),
                    input
                )))
            }
        };
        Ok(output)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Step::ByteArray | Step::StringArray { .. })
    }

    fn validate_params(&self) -> Result<(), CodecError> {
        match self {
            Step::FixedPoint { factor } => fixed_point::validate_factor(*factor),
            Step::IntegerPacking {
                byte_width: Some(width),
            } => PackingLayout::new(*width, false).map(|_| ()),
            Step::StringArray {
                index_pipeline: Some(steps),
            } => super::Pipeline::from_steps(ValueKind::Integer, steps.clone()).map(|_| ()),
            Step::ByteArray
            | Step::Delta
            | Step::RunLength
            | Step::IntegerPacking { byte_width: None }
            | Step::StringArray {
                index_pipeline: None,
            } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_steps_preserve_kind() {
        for step in [Step::delta(), Step::run_length(), Step::integer_packing()] {
            assert_eq!(step.transform_kind(ValueKind::Integer).unwrap(), ValueKind::Integer);
            assert!(!step.is_terminal());
            assert!(matches!(
                step.transform_kind(ValueKind::Float),
                Err(CodecError::InvalidChain(_))
            ));
        }
    }

    #[test]
    fn test_terminal_steps_produce_bytes() {
        assert_eq!(Step::byte_array().transform_kind(ValueKind::Float).unwrap(), ValueKind::Bytes);
        assert_eq!(Step::byte_array().transform_kind(ValueKind::Integer).unwrap(), ValueKind::Bytes);
        assert_eq!(Step::string_array().transform_kind(ValueKind::Text).unwrap(), ValueKind::Bytes);
        assert!(Step::byte_array().transform_kind(ValueKind::Text).is_err());
        assert!(Step::byte_array().transform_kind(ValueKind::Bytes).is_err());
        assert!(Step::byte_array().is_terminal() && Step::string_array().is_terminal());
    }

    #[test]
    fn test_fixed_point_only_accepts_floats() {
        let step = Step::fixed_point(100.0);
        assert_eq!(step.transform_kind(ValueKind::Float).unwrap(), ValueKind::Integer);
        assert!(step.transform_kind(ValueKind::Integer).is_err());
        assert!(step.accepts(ValueKind::Float));
        assert!(!step.accepts(ValueKind::Text));
    }

    #[test]
    fn test_static_parameters() {
        assert!(Step::fixed_point(0.0).validate_params().is_err());
        assert!(Step::fixed_point(f64::NAN).validate_params().is_err());
        assert!(Step::integer_packing_width(0).validate_params().is_err());
        assert!(Step::integer_packing_width(2).validate_params().is_ok());

        let bad_index = Step::StringArray {
            index_pipeline: Some(vec![Step::delta()]),
        };
        assert!(matches!(bad_index.validate_params(), Err(CodecError::InvalidChain(_))));
    }
}
