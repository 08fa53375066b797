// In: src/bridge/format.rs

//! Defines the on-disk constants of the column artifact and the JSON contract of
//! descriptor lists. This is the single source of truth for both.

use serde_json::Value;

use crate::error::CodecError;
use crate::pipeline::models::EncodingDescriptor;

//==================================================================================
// I. Column Artifact Format
//==================================================================================

/// The magic number to identify a serialized encoded column.
pub const COLUMN_MAGIC: &[u8; 4] = b"BCOL";
/// The current version of the column artifact format.
pub const COLUMN_FORMAT_VERSION: u16 = 1;

/// The public-facing result of `analyze_column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnStats {
    pub header_size: usize,
    pub data_size: usize,
    pub total_size: usize,
    /// The descriptor list as JSON.
    pub descriptor_json: String,
    /// Descriptor kinds in encode order, e.g. `["Delta", "ByteArray"]`.
    pub step_kinds: Vec<String>,
}

//==================================================================================
// II. Descriptor JSON Contract
//==================================================================================

/// Serializes a descriptor list, e.g.
/// `[{"kind":"FixedPoint","factor":100.0,"src_type":"Float64"}, ...]`.
pub fn descriptors_to_json(descriptors: &[EncodingDescriptor]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(descriptors)?)
}

/// Parses a descriptor list.
///
/// Every `kind` tag, including those of nested String-Array index encodings, is
/// checked first, so an unrecognized step is reported as
/// `CodecError::UnknownEncoding` and never silently skipped.
pub fn descriptors_from_json(json: &str) -> Result<Vec<EncodingDescriptor>, CodecError> {
    let value: Value = serde_json::from_str(json)?;
    check_kinds(&value)?;
    Ok(serde_json::from_value(value)?)
}

fn check_kinds(value: &Value) -> Result<(), CodecError> {
    let Value::Array(items) = value else {
        return Ok(());
    };
    for item in items {
        match item.get("kind") {
            Some(Value::String(kind)) => {
                if !EncodingDescriptor::KNOWN_KINDS.contains(&kind.as_str()) {
                    return Err(CodecError::UnknownEncoding(kind.clone()));
                }
            }
            Some(other) => return Err(CodecError::UnknownEncoding(other.to_string())),
            // Left to serde, which reports the missing tag.
            None => {}
        }
        if let Some(nested) = item.get("index_encoding") {
            check_kinds(nested)?;
        }
    }
    Ok(())
}
