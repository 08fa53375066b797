//! This module contains the pure, stateless kernels for Run-Length Encoding (RLE)
//! and decoding.
//!
//! This is a sparsity-exploitation transform. It is highly effective directly
//! after Delta, where constant step increments collapse into long runs of one
//! value. The output is a flat sequence of `(value, count)` pairs stored in the
//! **same element type** as the input; a run longer than the type's largest
//! positive value is split across several pairs.

use num_traits::{NumCast, ToPrimitive};

use crate::error::CodecError;
use crate::traits::IntElement;

//==================================================================================
// 1. Public API
//==================================================================================

/// Encodes `input_slice` into interleaved `(value, count)` pairs.
pub fn encode<T: IntElement>(input_slice: &[T]) -> Vec<T> {
    let mut output = Vec::new();
    let Some(&first) = input_slice.first() else {
        return output;
    };

    // The count shares the value's width, so cap it at T::MAX.
    let max_count = T::max_value().to_u64().unwrap_or(u64::MAX);

    let mut current_val = first;
    let mut run_count: u64 = 1;
    for &val in &input_slice[1..] {
        if val == current_val && run_count < max_count {
            run_count += 1;
        } else {
            push_pair(&mut output, current_val, run_count);
            current_val = val;
            run_count = 1;
        }
    }
    push_pair(&mut output, current_val, run_count);
    output
}

/// Expands `(value, count)` pairs back into `src_size` values.
///
/// # Errors
/// Returns `CodecError::CorruptStream` if the pair stream has odd length, holds a
/// non-positive count, or expands to anything other than `src_size` values.
pub fn decode<T: IntElement>(input_slice: &[T], src_size: usize) -> Result<Vec<T>, CodecError> {
    if input_slice.len() % 2 != 0 {
        return Err(CodecError::CorruptStream(format!(
            "run-length stream has odd length {}",
            input_slice.len()
        )));
    }

    // Validate the counts before allocating anything.
    let mut total: usize = 0;
    for pair in input_slice.chunks_exact(2) {
        let count = run_count(pair[1])?;
        total = total
            .checked_add(count)
            .filter(|&t| t <= src_size)
            .ok_or_else(|| {
                CodecError::CorruptStream(format!(
                    "run-length pairs expand beyond the declared size {}",
                    src_size
                ))
            })?;
    }
    if total != src_size {
        return Err(CodecError::CorruptStream(format!(
            "run-length pairs expand to {} values, but expected {}",
            total, src_size
        )));
    }

    let mut output = Vec::with_capacity(src_size);
    for pair in input_slice.chunks_exact(2) {
        let count = run_count(pair[1])?;
        output.extend(std::iter::repeat(pair[0]).take(count));
    }
    Ok(output)
}

//==================================================================================
// 2. Private Helpers
//==================================================================================

fn push_pair<T: IntElement>(output: &mut Vec<T>, value: T, count: u64) {
    output.push(value);
    // `count` never exceeds T::MAX, see `encode`.
    output.push(NumCast::from(count).unwrap_or_else(T::max_value));
}

fn run_count<T: IntElement>(raw: T) -> Result<usize, CodecError> {
    match raw.to_i64() {
        Some(c) if c > 0 => Ok(c as usize),
        _ => Err(CodecError::CorruptStream(format!(
            "invalid run length {:?}",
            raw
        ))),
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rle_roundtrip_i32() {
        let original: Vec<i32> = vec![5, 5, 5, 5, 8, 8, 8, 2, 9, 9, 9, 9, 9];
        let encoded = encode(&original);
        assert_eq!(encoded, vec![5, 4, 8, 3, 2, 1, 9, 5]);

        let decoded = decode(&encoded, original.len()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_long_runs_split_at_type_max() {
        let original: Vec<i8> = vec![42; 300];
        let encoded = encode(&original);
        assert_eq!(encoded, vec![42, 127, 42, 127, 42, 46]);
        assert_eq!(decode(&encoded, 300).unwrap(), original);

        let unsigned: Vec<u8> = vec![0; 256];
        assert_eq!(encode(&unsigned), vec![0, 255, 0, 1]);
    }

    #[test]
    fn test_constant_input_has_constant_size() {
        for n in [1usize, 10, 1000, 100_000] {
            let encoded = encode(&vec![-7i32; n]);
            assert_eq!(encoded.len(), 2, "n = {}", n);
        }
    }

    #[test]
    fn test_decode_rejects_corrupt_pairs() {
        let err = decode::<i32>(&[1, 2, 3], 2).unwrap_err();
        assert!(err.to_string().contains("odd length"));

        let err = decode::<i32>(&[1, -4], 4).unwrap_err();
        assert!(err.to_string().contains("invalid run length"));

        let err = decode::<i32>(&[1, 0], 0).unwrap_err();
        assert!(matches!(err, CodecError::CorruptStream(_)));

        let err = decode::<i32>(&[1, 3, 2, 3], 4).unwrap_err();
        assert!(err.to_string().contains("beyond the declared size"));

        let err = decode::<i32>(&[1, 3], 4).unwrap_err();
        assert!(err.to_string().contains("expected 4"));
    }

    #[test]
    fn test_empty_slice_roundtrip() {
        let encoded = encode::<u16>(&[]);
        assert!(encoded.is_empty());
        assert!(decode::<u16>(&encoded, 0).unwrap().is_empty());
    }
}
