//! This module contains the pure, stateless kernels for delta encoding and decoding.
//!
//! This is a value-reduction transform. The first element is lifted out into an
//! explicit `origin` and replaced by zero; every later element becomes the
//! difference to its predecessor. Differences wrap in the element type, which keeps
//! the transform exactly invertible for any input, including differences that
//! overflow the type.

use num_traits::{NumCast, ToPrimitive};

use crate::error::CodecError;
use crate::traits::IntElement;

//==================================================================================
// 1. Generic Core Logic (In-Place)
//==================================================================================

/// Performs delta encoding **in-place**: `data[i] = data[i] - data[i - 1]`,
/// with `data[0]` taken relative to `origin`.
fn encode_slice_inplace<T: IntElement>(data: &mut [T], origin: T) {
    if data.is_empty() {
        return;
    }
    // Iterate backwards to use original values for calculation
    for i in (1..data.len()).rev() {
        data[i] = data[i].wrapping_sub(&data[i - 1]);
    }
    data[0] = data[0].wrapping_sub(&origin);
}

/// Performs delta decoding (running sum) **in-place**, seeded with `origin`.
fn decode_slice_inplace<T: IntElement>(data: &mut [T], origin: T) {
    if data.is_empty() {
        return;
    }
    data[0] = data[0].wrapping_add(&origin);
    // Iterate forwards to use the newly-decoded values for subsequent sums
    for i in 1..data.len() {
        data[i] = data[i].wrapping_add(&data[i - 1]);
    }
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Delta-encodes `input_slice`, returning the differences and the origin.
///
/// The origin is the first element (or 0 for an empty input), widened to `i64`
/// for the descriptor.
pub fn encode<T: IntElement>(input_slice: &[T]) -> (Vec<T>, i64) {
    let origin = input_slice.first().copied().unwrap_or_else(T::zero);
    let mut data_vec = input_slice.to_vec();
    encode_slice_inplace(&mut data_vec, origin);
    // Every supported element type is at most 32 bits wide.
    (data_vec, origin.to_i64().unwrap_or_default())
}

/// Reverses [`encode`].
///
/// # Errors
/// Returns `CodecError::CorruptStream` if `origin` does not fit the element type.
pub fn decode<T: IntElement>(input_slice: &[T], origin: i64) -> Result<Vec<T>, CodecError> {
    let origin: T = NumCast::from(origin).ok_or_else(|| {
        CodecError::CorruptStream(format!(
            "delta origin {} does not fit {}",
            origin,
            T::ELEMENT_TYPE
        ))
    })?;
    let mut data_vec = input_slice.to_vec();
    decode_slice_inplace(&mut data_vec, origin);
    Ok(data_vec)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
