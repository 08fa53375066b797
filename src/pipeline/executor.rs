//! This module contains the core execution logic for encoding and decoding.
//!
//! The executor is non-strategic: it faithfully runs a validated list of steps
//! forward, or a list of descriptors in reverse, dispatching every step to the
//! kernels. At most two stage values are alive at a time.

use log::{debug, trace};

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::kernels;
use crate::pipeline::builder::Pipeline;
use crate::pipeline::models::{EncodedColumn, EncodingDescriptor, Stage, Step};
use crate::types::TypedArray;

/// Encodes `array` with `pipeline`.
///
/// # Errors
/// * `CodecError::InvalidInput` if the array's kind is not the pipeline's input
///   kind, or a step rejects the data (e.g. NaN into Fixed-Point).
/// * Any step failure is wrapped in `CodecError::PipelineError` naming the step.
pub fn encode(array: &TypedArray, pipeline: &Pipeline) -> Result<EncodedColumn, CodecError> {
    if array.value_kind() != pipeline.input_kind() {
        return Err(CodecError::InvalidInput(format!(
            "pipeline expects {:?} input, got {}",
            pipeline.input_kind(),
            array.type_name()
        )));
    }
    let (data, encoding) = execute_encode_steps(array, pipeline.steps())?;
    debug!(
        "encoded {} {} values into {} bytes via [{}]",
        array.len(),
        array.type_name(),
        data.len(),
        pipeline.describe()
    );
    Ok(EncodedColumn::new(data, encoding))
}

/// Decodes `column` with the default [`CodecConfig`].
pub fn decode(column: &EncodedColumn) -> Result<TypedArray, CodecError> {
    decode_with(column, &CodecConfig::default())
}

/// Decodes `column`, refusing to materialize more than
/// `config.max_decoded_len` elements in any step.
pub fn decode_with(column: &EncodedColumn, config: &CodecConfig) -> Result<TypedArray, CodecError> {
    let array = execute_decode_descriptors(
        column.data.clone(),
        &column.encoding,
        config.max_decoded_len,
    )?;
    debug!(
        "decoded {} bytes into {} {} values",
        column.data.len(),
        array.len(),
        array.type_name()
    );
    Ok(array)
}

/// Runs `steps` left to right over `array`, returning the terminal bytes and one
/// descriptor per step in encode order.
pub(crate) fn execute_encode_steps(
    array: &TypedArray,
    steps: &[Step],
) -> Result<(Vec<u8>, Vec<EncodingDescriptor>), CodecError> {
    let mut descriptors = Vec::with_capacity(steps.len());
    let mut current: Option<TypedArray> = None;

    for (i, step) in steps.iter().enumerate() {
        let input = current.as_ref().unwrap_or(array);
        trace!(
            "encode step {}: {} <- {} {} values",
            i,
            step.kind_name(),
            input.len(),
            input.type_name()
        );

        let (output, descriptor) = kernels::dispatch_encode(step, input)
            .map_err(|e| e.at_step(format!("{} #{}", step.kind_name(), i)))?;
        descriptors.push(descriptor);

        match output {
            Stage::Values(next) => current = Some(next),
            Stage::Bytes(bytes) if i + 1 == steps.len() => return Ok((bytes, descriptors)),
            Stage::Bytes(_) => {
                return Err(CodecError::InvalidChain(format!(
                    "terminal step {} is followed by {} more step(s)",
                    step.kind_name(),
                    steps.len() - i - 1
                )))
            }
        }
    }

    Err(CodecError::InvalidChain(
        "pipeline does not end in a terminal step".to_string(),
    ))
}

/// Replays `descriptors` in reverse over `data`.
///
/// An empty descriptor list returns the raw bytes as a `UInt8` array.
pub(crate) fn execute_decode_descriptors(
    data: Vec<u8>,
    descriptors: &[EncodingDescriptor],
    max_len: usize,
) -> Result<TypedArray, CodecError> {
    let mut current = Stage::Bytes(data);

    for (i, descriptor) in descriptors.iter().enumerate().rev() {
        trace!(
            "decode step {}: {} <- {}",
            i,
            descriptor.kind_name(),
            current.describe()
        );
        current = kernels::dispatch_decode(descriptor, current, max_len)
            .map_err(|e| e.at_step(format!("{} #{}", descriptor.kind_name(), i)))?;
    }

    match current {
        Stage::Values(array) => Ok(array),
        Stage::Bytes(bytes) if descriptors.is_empty() => Ok(TypedArray::UInt8(bytes)),
        Stage::Bytes(_) => Err(CodecError::CorruptStream(
            "descriptor chain did not produce a typed array".to_string(),
        )),
    }
}
