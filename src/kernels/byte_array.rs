//! Byte-Array: the terminal step for numeric data.
//!
//! Reinterprets a typed array as raw little-endian bytes. Always exactly
//! reversible given the element type, which the descriptor records as a
//! `(byte_width, signed, float)` layout.

use crate::error::CodecError;
use crate::types::{ElementType, TypedArray};
use crate::utils::{
    f32_slice_to_le_bytes, f64_slice_to_le_bytes, int_slice_to_le_bytes, le_bytes_to_f32_vec,
    le_bytes_to_f64_vec, le_bytes_to_int_vec,
};

/// Serializes a numeric array, returning the bytes and its element type.
///
/// # Errors
/// Returns `CodecError::InvalidInput` for string arrays.
pub fn encode(array: &TypedArray) -> Result<(Vec<u8>, ElementType), CodecError> {
    let bytes = match array {
        TypedArray::Int8(v) => int_slice_to_le_bytes(v),
        TypedArray::Int16(v) => int_slice_to_le_bytes(v),
        TypedArray::Int32(v) => int_slice_to_le_bytes(v),
        TypedArray::UInt8(v) => v.clone(),
        TypedArray::UInt16(v) => int_slice_to_le_bytes(v),
        TypedArray::UInt32(v) => int_slice_to_le_bytes(v),
        TypedArray::Float32(v) => f32_slice_to_le_bytes(v),
        TypedArray::Float64(v) => f64_slice_to_le_bytes(v),
        TypedArray::Utf8(_) => {
            return Err(CodecError::InvalidInput(
                "ByteArray cannot store strings; use StringArray".to_string(),
            ))
        }
    };
    let element_type = array
        .element_type()
        .ok_or_else(|| CodecError::InvalidInput("ByteArray requires a numeric array".into()))?;
    Ok((bytes, element_type))
}

/// Parses `bytes` as an array of `element_type`.
///
/// # Errors
/// Returns `CodecError::BufferMismatch` if the length is not a multiple of the
/// element width.
pub fn decode(bytes: &[u8], element_type: ElementType) -> Result<TypedArray, CodecError> {
    Ok(match element_type {
        ElementType::Int8 => TypedArray::Int8(le_bytes_to_int_vec(bytes)?),
        ElementType::Int16 => TypedArray::Int16(le_bytes_to_int_vec(bytes)?),
        ElementType::Int32 => TypedArray::Int32(le_bytes_to_int_vec(bytes)?),
        ElementType::UInt8 => TypedArray::UInt8(bytes.to_vec()),
        ElementType::UInt16 => TypedArray::UInt16(le_bytes_to_int_vec(bytes)?),
        ElementType::UInt32 => TypedArray::UInt32(le_bytes_to_int_vec(bytes)?),
        ElementType::Float32 => TypedArray::Float32(le_bytes_to_f32_vec(bytes)?),
        ElementType::Float64 => TypedArray::Float64(le_bytes_to_f64_vec(bytes)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_numeric_type_roundtrips() {
        let arrays = vec![
            TypedArray::from(vec![-1i8, 0, 127]),
            TypedArray::from(vec![-300i16, 300]),
            TypedArray::from(vec![i32::MIN, 0, i32::MAX]),
            TypedArray::from(vec![0u8, 255]),
            TypedArray::from(vec![65535u16]),
            TypedArray::from(vec![u32::MAX, 1]),
            TypedArray::from(vec![1.5f32, -0.25]),
            TypedArray::from(vec![std::f64::consts::E]),
        ];
        for array in arrays {
            let (bytes, ty) = encode(&array).unwrap();
            assert_eq!(bytes.len(), array.len() * ty.byte_width());
            assert_eq!(decode(&bytes, ty).unwrap(), array);
        }
    }

    #[test]
    fn test_wire_layout_is_little_endian() {
        let (bytes, ty) = encode(&TypedArray::from(vec![1i16, -2])).unwrap();
        assert_eq!(ty, ElementType::Int16);
        assert_eq!(bytes, vec![0x01, 0x00, 0xFE, 0xFF]);
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let err = decode(&[0, 0, 0, 0, 0, 0], ElementType::Float64).unwrap_err();
        assert!(matches!(err, CodecError::BufferMismatch(8, 6)));
    }

    #[test]
    fn test_strings_are_rejected() {
        assert!(matches!(
            encode(&TypedArray::from(vec!["a"])),
            Err(CodecError::InvalidInput(_))
        ));
    }
}
