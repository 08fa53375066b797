//! Fixed-Point quantization: the only lossy step in the catalog.
//!
//! Floats become `Int32` via `round(x * factor)`; decoding divides by the same
//! factor. The reconstruction error is bounded by `0.5 / factor` per element (plus
//! the final rounding into `f32` for single-precision sources). Decoding is exact
//! given the stored integers.

use crate::error::CodecError;

/// Rejects factors that are not strictly positive and finite.
pub fn validate_factor(factor: f64) -> Result<(), CodecError> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(CodecError::InvalidParameter {
            step: "FixedPoint",
            reason: format!("factor must be a strictly positive finite number, got {}", factor),
        })
    }
}

/// Quantizes `input_slice` with `factor`.
///
/// # Errors
/// Returns `CodecError::InvalidInput` for NaN/infinite input or when a scaled
/// value does not fit `i32`.
pub fn encode<F>(input_slice: &[F], factor: f64) -> Result<Vec<i32>, CodecError>
where
    F: Copy + Into<f64>,
{
    validate_factor(factor)?;
    input_slice
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let x: f64 = x.into();
            if !x.is_finite() {
                return Err(CodecError::InvalidInput(format!(
                    "non-finite value {} at index {} cannot be quantized",
                    x, i
                )));
            }
            let scaled = (x * factor).round();
            if scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
                return Err(CodecError::InvalidInput(format!(
                    "value {} at index {} overflows Int32 with factor {}",
                    x, i, factor
                )));
            }
            Ok(scaled as i32)
        })
        .collect()
}

pub fn decode_f64(input_slice: &[i32], factor: f64) -> Vec<f64> {
    input_slice.iter().map(|&v| v as f64 / factor).collect()
}

pub fn decode_f32(input_slice: &[i32], factor: f64) -> Vec<f32> {
    input_slice.iter().map(|&v| (v as f64 / factor) as f32).collect()
}
