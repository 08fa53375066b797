//! This module provides a set of shared, low-level utility functions used
//! throughout the bincol core.
//!
//! Its primary responsibility is converting between typed slices and the
//! little-endian byte layout the wire format mandates. All conversions copy, so
//! they are safe on unaligned input buffers.

use num_traits::PrimInt;

use crate::error::CodecError;

//==================================================================================
// 1. Integer Conversions
//==================================================================================

/// Serializes a slice of primitive integers as little-endian bytes.
pub fn int_slice_to_le_bytes<T>(data: &[T]) -> Vec<u8>
where
    T: PrimInt + bytemuck::Pod,
{
    if cfg!(target_endian = "little") {
        return bytemuck::cast_slice(data).to_vec();
    }
    let mut out = Vec::with_capacity(std::mem::size_of_val(data));
    for &value in data {
        out.extend_from_slice(bytemuck::bytes_of(&value.to_le()));
    }
    out
}

/// Parses little-endian bytes into an owned vector of primitive integers.
///
/// # Errors
/// Returns `CodecError::BufferMismatch` if the byte length is not a multiple of
/// the element size.
pub fn le_bytes_to_int_vec<T>(bytes: &[u8]) -> Result<Vec<T>, CodecError>
where
    T: PrimInt + bytemuck::Pod,
{
    let width = std::mem::size_of::<T>();
    check_multiple(bytes, width)?;
    Ok(bytes
        .chunks_exact(width)
        .map(|chunk| T::from_le(bytemuck::pod_read_unaligned::<T>(chunk)))
        .collect())
}

//==================================================================================
// 2. Float Conversions
//==================================================================================

pub fn f32_slice_to_le_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn f64_slice_to_le_bytes(data: &[f64]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn le_bytes_to_f32_vec(bytes: &[u8]) -> Result<Vec<f32>, CodecError> {
    let bits = le_bytes_to_int_vec::<u32>(bytes)?;
    Ok(bits.into_iter().map(f32::from_bits).collect())
}

pub fn le_bytes_to_f64_vec(bytes: &[u8]) -> Result<Vec<f64>, CodecError> {
    let bits = le_bytes_to_int_vec::<u64>(bytes)?;
    Ok(bits.into_iter().map(f64::from_bits).collect())
}

fn check_multiple(bytes: &[u8], width: usize) -> Result<(), CodecError> {
    if width == 0 || bytes.len() % width != 0 {
        return Err(CodecError::BufferMismatch(width, bytes.len()));
    }
    Ok(())
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_le_layout_is_explicit() {
        // 258 = 0x0102: the least significant byte comes first on every target.
        assert_eq!(int_slice_to_le_bytes(&[258u16]), vec![0x02, 0x01]);
        assert_eq!(int_slice_to_le_bytes(&[-1i32]), vec![0xFF; 4]);
    }

    #[test]
    fn test_int_roundtrip_on_unaligned_input() {
        let original: Vec<i32> = vec![1, -2, 1_000_000];
        let mut bytes = vec![0u8];
        bytes.extend(int_slice_to_le_bytes(&original));
        let parsed = le_bytes_to_int_vec::<i32>(&bytes[1..]).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_length_mismatch_error() {
        let bytes: Vec<u8> = vec![0, 1, 2, 3, 4];
        let result = le_bytes_to_int_vec::<i32>(&bytes);
        assert!(matches!(result, Err(CodecError::BufferMismatch(4, 5))));
        assert!(le_bytes_to_f64_vec(&bytes).is_err());
    }

    #[test]
    fn test_float_roundtrip_preserves_bits() {
        let original = vec![std::f64::consts::PI, -0.0, f64::MIN_POSITIVE];
        let parsed = le_bytes_to_f64_vec(&f64_slice_to_le_bytes(&original)).unwrap();
        assert_eq!(
            parsed.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            original.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );

        let singles = vec![1.5f32, -3.25];
        assert_eq!(le_bytes_to_f32_vec(&f32_slice_to_le_bytes(&singles)).unwrap(), singles);
    }
}
