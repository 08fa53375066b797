// In: src/bridge/stateless_api.rs

use arrow::array::{Array, ArrayRef};

use crate::bridge::arrow_impl;
use crate::bridge::format::{descriptors_from_json, ColumnStats};
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::pipeline::{self, EncodedColumn, Pipeline};

/// Encodes a single Arrow array with an explicit pipeline.
pub fn encode_arrow_array(
    array: &dyn Array,
    pipeline: &Pipeline,
) -> Result<EncodedColumn, CodecError> {
    // 1. Marshall the data from the Arrow world into the codec's value type.
    let typed = arrow_impl::typed_array_from_arrow(array)?;
    // 2. Run the pure pipeline engine.
    let column = pipeline.encode(&typed)?;
    log_compression(array, &column);
    Ok(column)
}

/// Encodes a single Arrow array with a planned pipeline.
pub fn encode_arrow_array_auto(
    array: &dyn Array,
    config: &CodecConfig,
) -> Result<EncodedColumn, CodecError> {
    let typed = arrow_impl::typed_array_from_arrow(array)?;
    let column = pipeline::encode_auto(&typed, config)?;
    log_compression(array, &column);
    Ok(column)
}

fn log_compression(array: &dyn Array, column: &EncodedColumn) {
    let raw = arrow_impl::raw_value_size(array);
    log::debug!(
        "arrow {} column: {} value bytes -> {} encoded bytes",
        array.data_type(),
        raw,
        column.data.len()
    );
    log_metric!("event"="arrow_encode", "raw_bytes"=raw, "encoded_bytes"=column.data.len());
}

/// Decodes an encoded column into an Arrow array.
pub fn decode_to_arrow_array(column: &EncodedColumn) -> Result<ArrayRef, CodecError> {
    let typed = pipeline::decode(column)?;
    Ok(arrow_impl::typed_array_to_arrow(typed))
}

/// Analyzes a serialized column artifact without decoding the payload.
pub fn analyze_column(bytes: &[u8]) -> Result<ColumnStats, CodecError> {
    // 1. Delegate to the efficient "peek" function in the artifact module.
    let info = EncodedColumn::peek_info(bytes)?;
    let descriptors = descriptors_from_json(&info.descriptor_json)?;

    // 2. Translate the HeaderInfo into the public-facing ColumnStats struct.
    Ok(ColumnStats {
        header_size: info.header_size,
        data_size: info.data_size,
        total_size: bytes.len(),
        descriptor_json: info.descriptor_json,
        step_kinds: descriptors
            .iter()
            .map(|d| d.kind_name().to_string())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Step;
    use crate::types::ValueKind;
    use arrow::array::Int32Array;

    #[test]
    fn test_analyze_column_after_encoding() {
        let array = Int32Array::from(vec![10, 20, 30, 40, 50]);
        let pipeline = Pipeline::from_steps(
            ValueKind::Integer,
            vec![Step::delta(), Step::integer_packing(), Step::byte_array()],
        )
        .unwrap();

        let bytes = encode_arrow_array(&array, &pipeline)
            .unwrap()
            .to_bytes()
            .unwrap();
        let stats = analyze_column(&bytes).unwrap();

        assert_eq!(stats.total_size, bytes.len());
        assert_eq!(stats.header_size + stats.data_size, stats.total_size);
        assert_eq!(stats.data_size, 5);
        assert_eq!(stats.step_kinds, vec!["Delta", "IntegerPacking", "ByteArray"]);
        assert!(stats.descriptor_json.contains("\"origin\":10"));
    }
}
