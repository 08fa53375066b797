//! This module serves as the public API and dispatcher for the collection of all
//! pure, stateless encoding and decoding kernels.
//!
//! It declares every kernel sub-module and provides one `dispatch_encode` and one
//! `dispatch_decode` function. These dispatchers are the sole entry point for
//! `pipeline::executor`: they take a step (or descriptor), resolve the concrete
//! element type of the stage value and call the matching generic kernel.

use crate::error::CodecError;
use crate::pipeline::executor;
use crate::pipeline::models::{EncodingDescriptor, Stage, Step};
use crate::traits::IntElement;
use crate::types::{ElementType, TypedArray};

use self::integer_packing::PackingLayout;

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Lossy float quantization.
pub mod fixed_point;

/// Value reduction.
pub mod delta;

/// Sparsity exploitation.
pub mod run_length;

/// Width reduction with sentinel overflow.
pub mod integer_packing;

/// Terminal steps.
pub mod byte_array;
pub mod string_array;

//==================================================================================
// 2. Type Dispatch Helper
//==================================================================================

/// Runs `$body` with `$v` bound to the integer vector inside `$array`.
/// Evaluates `$otherwise` for floats and strings.
macro_rules! with_int_values {
    ($array:expr, $v:ident => $body:expr, $otherwise:expr) => {
        match $array {
            TypedArray::Int8($v) => $body,
            TypedArray::Int16($v) => $body,
            TypedArray::Int32($v) => $body,
            TypedArray::UInt8($v) => $body,
            TypedArray::UInt16($v) => $body,
            TypedArray::UInt32($v) => $body,
            TypedArray::Float32(_) | TypedArray::Float64(_) | TypedArray::Utf8(_) => $otherwise,
        }
    };
}

fn expect_integers(step: &str, array: &TypedArray) -> CodecError {
    CodecError::InvalidInput(format!(
        "{} requires integer values, got {}",
        step,
        array.type_name()
    ))
}

/// Differences leave in the signed type of the source width, so a decrease in an
/// unsigned column stays a small negative number instead of wrapping near `MAX`.
fn delta_encode<T: IntElement>(values: &[T]) -> (Stage, EncodingDescriptor) {
    let (deltas, origin) = delta::encode(values);
    let signed: Vec<T::Signed> = deltas.into_iter().map(T::to_signed).collect();
    (
        Stage::Values(<T::Signed as IntElement>::into_typed_array(signed)),
        EncodingDescriptor::Delta {
            origin,
            src_type: T::ELEMENT_TYPE,
        },
    )
}

fn delta_decode<T: IntElement>(
    descriptor: &EncodingDescriptor,
    array: &TypedArray,
    origin: i64,
) -> Result<Stage, CodecError> {
    let signed = <T::Signed as IntElement>::slice_of(array)
        .ok_or_else(|| mismatch(descriptor, &Stage::Values(array.clone())))?;
    let deltas: Vec<T> = signed.iter().map(|&d| T::from_signed(d)).collect();
    Ok(Stage::Values(T::into_typed_array(delta::decode(&deltas, origin)?)))
}

fn run_length_encode<T: IntElement>(values: &[T]) -> (Stage, EncodingDescriptor) {
    let pairs = run_length::encode(values);
    (
        Stage::Values(T::into_typed_array(pairs)),
        EncodingDescriptor::RunLength {
            src_byte_width: T::ELEMENT_TYPE.byte_width() as u8,
            src_size: values.len(),
        },
    )
}

fn run_length_decode<T: IntElement>(pairs: &[T], src_size: usize) -> Result<Stage, CodecError> {
    Ok(Stage::Values(T::into_typed_array(run_length::decode(pairs, src_size)?)))
}

//==================================================================================
// 3. Public API (Unified Dispatchers)
//==================================================================================

/// The single dispatcher for all ENCODE steps.
///
/// Encode input is always a typed array: nothing may follow a terminal step, so
/// bytes never reach a second step.
pub(crate) fn dispatch_encode(
    step: &Step,
    input: &TypedArray,
) -> Result<(Stage, EncodingDescriptor), CodecError> {
    match step {
        Step::ByteArray => {
            let (bytes, element_type) = byte_array::encode(input)?;
            Ok((
                Stage::Bytes(bytes),
                EncodingDescriptor::ByteArray {
                    byte_width: element_type.byte_width() as u8,
                    signed: element_type.is_signed(),
                    float: element_type.is_float(),
                },
            ))
        }
        Step::FixedPoint { factor } => {
            let (quantized, src_type) = match input {
                TypedArray::Float32(v) => (fixed_point::encode(v, *factor)?, ElementType::Float32),
                TypedArray::Float64(v) => (fixed_point::encode(v, *factor)?, ElementType::Float64),
                other => {
                    return Err(CodecError::InvalidInput(format!(
                        "FixedPoint requires float values, got {}",
                        other.type_name()
                    )))
                }
            };
            Ok((
                Stage::Values(TypedArray::Int32(quantized)),
                EncodingDescriptor::FixedPoint {
                    factor: *factor,
                    src_type,
                },
            ))
        }
        Step::Delta => with_int_values!(
            input,
            v => Ok(delta_encode(v)),
            Err(expect_integers("Delta", input))
        ),
        Step::RunLength => with_int_values!(
            input,
            v => Ok(run_length_encode(v)),
            Err(expect_integers("RunLength", input))
        ),
        Step::IntegerPacking { byte_width } => {
            let src_type = input
                .element_type()
                .filter(|ty| !ty.is_float())
                .ok_or_else(|| expect_integers("IntegerPacking", input))?;
            let values = input
                .to_i64_vec()
                .ok_or_else(|| expect_integers("IntegerPacking", input))?;
            let layout = integer_packing::choose_layout(&values, *byte_width)?;
            let packed = integer_packing::encode(&values, layout)?;
            Ok((
                Stage::Values(packed),
                EncodingDescriptor::IntegerPacking {
                    byte_width: layout.byte_width,
                    signed: layout.signed,
                    src_type,
                    src_size: values.len(),
                },
            ))
        }
        Step::StringArray { index_pipeline } => {
            let TypedArray::Utf8(values) = input else {
                return Err(CodecError::InvalidInput(format!(
                    "StringArray requires strings, got {}",
                    input.type_name()
                )));
            };
            let (table, indices) = string_array::build_dictionary(values)?;
            let default_steps;
            let steps = match index_pipeline {
                Some(steps) => steps.as_slice(),
                None => {
                    default_steps = Step::default_index_pipeline();
                    default_steps.as_slice()
                }
            };
            let (bytes, index_encoding) =
                executor::execute_encode_steps(&TypedArray::Int32(indices), steps)?;
            Ok((
                Stage::Bytes(bytes),
                EncodingDescriptor::StringArray {
                    table,
                    index_encoding,
                },
            ))
        }
    }
}

/// The single dispatcher for all DECODE steps.
///
/// Checks that `input` has the shape `descriptor` expects, so a descriptor chain
/// whose types do not line up fails here rather than producing garbage.
/// `max_len` bounds every size field read from a descriptor.
pub(crate) fn dispatch_decode(
    descriptor: &EncodingDescriptor,
    input: Stage,
    max_len: usize,
) -> Result<Stage, CodecError> {
    match (descriptor, input) {
        (
            EncodingDescriptor::ByteArray {
                byte_width,
                signed,
                float,
            },
            Stage::Bytes(bytes),
        ) => {
            let element_type = ElementType::from_layout(*byte_width, *signed, *float)
                .ok_or_else(|| {
                    CodecError::CorruptStream(format!(
                        "ByteArray layout (byte_width={}, signed={}, float={}) names no element type",
                        byte_width, signed, float
                    ))
                })?;
            check_len(bytes.len() / element_type.byte_width(), max_len)?;
            Ok(Stage::Values(byte_array::decode(&bytes, element_type)?))
        }
        (EncodingDescriptor::FixedPoint { factor, src_type }, Stage::Values(array)) => {
            fixed_point::validate_factor(*factor)
                .map_err(|e| CodecError::CorruptStream(e.to_string()))?;
            let stored = match array {
                TypedArray::Int32(stored) => stored,
                other => return Err(mismatch(descriptor, &Stage::Values(other))),
            };
            match src_type {
                ElementType::Float32 => Ok(Stage::Values(TypedArray::Float32(
                    fixed_point::decode_f32(&stored, *factor),
                ))),
                ElementType::Float64 => Ok(Stage::Values(TypedArray::Float64(
                    fixed_point::decode_f64(&stored, *factor),
                ))),
                other => Err(CodecError::CorruptStream(format!(
                    "FixedPoint source type must be a float, got {}",
                    other
                ))),
            }
        }
        (EncodingDescriptor::Delta { origin, src_type }, Stage::Values(array)) => match src_type {
            ElementType::Int8 => delta_decode::<i8>(descriptor, &array, *origin),
            ElementType::Int16 => delta_decode::<i16>(descriptor, &array, *origin),
            ElementType::Int32 => delta_decode::<i32>(descriptor, &array, *origin),
            ElementType::UInt8 => delta_decode::<u8>(descriptor, &array, *origin),
            ElementType::UInt16 => delta_decode::<u16>(descriptor, &array, *origin),
            ElementType::UInt32 => delta_decode::<u32>(descriptor, &array, *origin),
            ElementType::Float32 | ElementType::Float64 => Err(CodecError::CorruptStream(
                format!("Delta source type must be an integer, got {}", src_type),
            )),
        },
        (
            EncodingDescriptor::RunLength {
                src_byte_width,
                src_size,
            },
            Stage::Values(array),
        ) => {
            check_len(*src_size, max_len)?;
            match array.element_type() {
                Some(ty) if !ty.is_float() && ty.byte_width() == *src_byte_width as usize => {}
                _ => return Err(mismatch(descriptor, &Stage::Values(array))),
            }
            with_int_values!(
                &array,
                v => run_length_decode(v, *src_size),
                Err(mismatch(descriptor, &Stage::Values(array.clone())))
            )
        }
        (
            EncodingDescriptor::IntegerPacking {
                byte_width,
                signed,
                src_type,
                src_size,
            },
            Stage::Values(array),
        ) => {
            check_len(*src_size, max_len)?;
            if src_type.is_float() {
                return Err(CodecError::CorruptStream(format!(
                    "IntegerPacking source type must be an integer, got {}",
                    src_type
                )));
            }
            let layout = PackingLayout::new(*byte_width, *signed)
                .map_err(|e| CodecError::CorruptStream(e.to_string()))?;
            if array.element_type() != Some(layout.element_type()) {
                return Err(mismatch(descriptor, &Stage::Values(array)));
            }
            let values = with_int_values!(
                &array,
                v => integer_packing::decode(v, layout, *src_size)?,
                return Err(mismatch(descriptor, &Stage::Values(array.clone())))
            );
            Ok(Stage::Values(TypedArray::from_i64_values(*src_type, &values)?))
        }
        (
            EncodingDescriptor::StringArray {
                table,
                index_encoding,
            },
            Stage::Bytes(bytes),
        ) => {
            let indices = executor::execute_decode_descriptors(bytes, index_encoding, max_len)?;
            let wide = indices.to_i64_vec().ok_or_else(|| {
                CodecError::CorruptStream(format!(
                    "StringArray index column decoded to {}, expected integers",
                    indices.type_name()
                ))
            })?;
            Ok(Stage::Values(TypedArray::Utf8(string_array::expand(table, &wide)?)))
        }
        (descriptor, stage) => Err(mismatch(descriptor, &stage)),
    }
}

fn mismatch(descriptor: &EncodingDescriptor, stage: &Stage) -> CodecError {
    CodecError::CorruptStream(format!(
        "{} cannot be applied to {}",
        descriptor.kind_name(),
        stage.describe()
    ))
}

fn check_len(len: usize, max_len: usize) -> Result<(), CodecError> {
    if len > max_len {
        return Err(CodecError::CorruptStream(format!(
            "declared length {} exceeds the decode limit of {}",
            len, max_len
        )));
    }
    Ok(())
}
