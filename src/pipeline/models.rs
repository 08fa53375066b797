//! Defines the core data structures of the encoding pipeline: the step
//! configurations a caller chains together, the descriptors the encoder records,
//! and the self-contained encoded column.

use serde::{Deserialize, Serialize};

use crate::types::{ElementType, TypedArray};

//==================================================================================
// 1. Step (encode-time configuration)
//==================================================================================

/// One configured transform in a pipeline.
///
/// A `Step` holds only the static parameters a caller chooses. Everything that
/// depends on the data (origins, widths, tables) is recorded in the
/// [`EncodingDescriptor`] produced when the step runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum Step {
    /// Terminal: numeric values to little-endian bytes.
    ByteArray,
    /// Lossy: floats to `Int32` via `round(x * factor)`.
    FixedPoint { factor: f64 },
    Delta,
    RunLength,
    /// `byte_width: None` selects the smaller of 1 and 2 bytes per element.
    IntegerPacking {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        byte_width: Option<u8>,
    },
    /// Terminal: strings to a dictionary plus an encoded index column.
    /// `index_pipeline: None` uses [`Step::default_index_pipeline`].
    StringArray {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index_pipeline: Option<Vec<Step>>,
    },
}

impl Step {
    pub fn fixed_point(factor: f64) -> Self {
        Step::FixedPoint { factor }
    }

    pub fn delta() -> Self {
        Step::Delta
    }

    pub fn run_length() -> Self {
        Step::RunLength
    }

    pub fn integer_packing() -> Self {
        Step::IntegerPacking { byte_width: None }
    }

    pub fn integer_packing_width(byte_width: u8) -> Self {
        Step::IntegerPacking {
            byte_width: Some(byte_width),
        }
    }

    pub fn byte_array() -> Self {
        Step::ByteArray
    }

    pub fn string_array() -> Self {
        Step::StringArray {
            index_pipeline: None,
        }
    }

    /// A String-Array step whose index column runs through `index_pipeline`.
    pub fn string_array_with(index_pipeline: super::Pipeline) -> Self {
        Step::StringArray {
            index_pipeline: Some(index_pipeline.into_steps()),
        }
    }

    /// The index pipeline used by String-Array when none is configured.
    pub fn default_index_pipeline() -> Vec<Step> {
        vec![Step::integer_packing(), Step::byte_array()]
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Step::ByteArray => "ByteArray",
            Step::FixedPoint { .. } => "FixedPoint",
            Step::Delta => "Delta",
            Step::RunLength => "RunLength",
            Step::IntegerPacking { .. } => "IntegerPacking",
            Step::StringArray { .. } => "StringArray",
        }
    }
}

//==================================================================================
// 2. Encoding Descriptor (decode-time metadata)
//==================================================================================

/// The serialized record of one executed step.
///
/// Serialized as a flat JSON object tagged by `kind`, e.g.
/// `{"kind":"Delta","origin":743,"src_type":"Int32"}`. A list of descriptors is
/// stored in encode order and always replayed in reverse.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum EncodingDescriptor {
    ByteArray {
        byte_width: u8,
        signed: bool,
        #[serde(default)]
        float: bool,
    },
    FixedPoint {
        factor: f64,
        src_type: ElementType,
    },
    Delta {
        origin: i64,
        src_type: ElementType,
    },
    RunLength {
        src_byte_width: u8,
        src_size: usize,
    },
    IntegerPacking {
        byte_width: u8,
        signed: bool,
        src_type: ElementType,
        src_size: usize,
    },
    StringArray {
        table: Vec<String>,
        index_encoding: Vec<EncodingDescriptor>,
    },
}

impl EncodingDescriptor {
    /// Every `kind` tag this version of the codec understands.
    pub const KNOWN_KINDS: [&'static str; 6] = [
        "ByteArray",
        "FixedPoint",
        "Delta",
        "RunLength",
        "IntegerPacking",
        "StringArray",
    ];

    pub fn kind_name(&self) -> &'static str {
        match self {
            EncodingDescriptor::ByteArray { .. } => "ByteArray",
            EncodingDescriptor::FixedPoint { .. } => "FixedPoint",
            EncodingDescriptor::Delta { .. } => "Delta",
            EncodingDescriptor::RunLength { .. } => "RunLength",
            EncodingDescriptor::IntegerPacking { .. } => "IntegerPacking",
            EncodingDescriptor::StringArray { .. } => "StringArray",
        }
    }
}

//==================================================================================
// 3. Encoded Column
//==================================================================================

/// The result of encoding: the payload bytes plus every descriptor needed to
/// decode them, with nothing else required from the encoder.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedColumn {
    pub data: Vec<u8>,
    pub encoding: Vec<EncodingDescriptor>,
}

impl EncodedColumn {
    pub fn new(data: Vec<u8>, encoding: Vec<EncodingDescriptor>) -> Self {
        Self { data, encoding }
    }
}

//==================================================================================
// 4. Stage (internal)
//==================================================================================

/// The value flowing between two steps during execution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stage {
    Values(TypedArray),
    Bytes(Vec<u8>),
}

impl Stage {
    /// Short description used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Stage::Values(array) => format!("{} values", array.type_name()),
            Stage::Bytes(_) => "bytes".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_json_shape() {
        let descriptor = EncodingDescriptor::Delta {
            origin: 743,
            src_type: ElementType::Int32,
        };
        let json = serde_json::to_string(&descriptor).unwrap();
        assert_eq!(json, r#"{"kind":"Delta","origin":743,"src_type":"Int32"}"#);
    }

    #[test]
    fn test_byte_array_float_flag_defaults_to_false() {
        let parsed: EncodingDescriptor =
            serde_json::from_str(r#"{"kind":"ByteArray","byte_width":4,"signed":true}"#).unwrap();
        assert_eq!(
            parsed,
            EncodingDescriptor::ByteArray {
                byte_width: 4,
                signed: true,
                float: false
            }
        );
    }

    #[test]
    fn test_step_json_omits_defaults() {
        let json = serde_json::to_string(&Step::integer_packing()).unwrap();
        assert_eq!(json, r#"{"kind":"IntegerPacking"}"#);

        let parsed: Step = serde_json::from_str(r#"{"kind":"StringArray"}"#).unwrap();
        assert_eq!(parsed, Step::string_array());
    }

    #[test]
    fn test_known_kinds_cover_every_variant() {
        let descriptors = vec![
            EncodingDescriptor::ByteArray { byte_width: 1, signed: false, float: false },
            EncodingDescriptor::FixedPoint { factor: 10.0, src_type: ElementType::Float32 },
            EncodingDescriptor::Delta { origin: 0, src_type: ElementType::Int8 },
            EncodingDescriptor::RunLength { src_byte_width: 1, src_size: 0 },
            EncodingDescriptor::IntegerPacking {
                byte_width: 1,
                signed: false,
                src_type: ElementType::Int32,
                src_size: 0,
            },
            EncodingDescriptor::StringArray { table: vec![], index_encoding: vec![] },
        ];
        for d in &descriptors {
            assert!(EncodingDescriptor::KNOWN_KINDS.contains(&d.kind_name()));
        }
    }
}
