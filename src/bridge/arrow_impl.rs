// In: src/bridge/arrow_impl.rs

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int16Array, Int32Array, Int8Array,
    PrimitiveArray, StringArray, UInt16Array, UInt32Array, UInt8Array,
};
use arrow::datatypes::*;

use crate::error::CodecError;
use crate::types::TypedArray;

/// DATA MARSHALLING
/// Copies the values of an Arrow array into a `TypedArray`.
///
/// Supports the eight numeric element types plus `Utf8` and `LargeUtf8` strings.
/// Arrays with nulls are rejected: null handling belongs to the table model that
/// owns the column, not to the codec.
pub fn typed_array_from_arrow(array: &dyn Array) -> Result<TypedArray, CodecError> {
    if array.null_count() > 0 {
        return Err(CodecError::InvalidInput(format!(
            "cannot encode an Arrow array with {} null value(s)",
            array.null_count()
        )));
    }

    macro_rules! copy_values {
        ($T:ty) => {
            array.as_primitive::<$T>().values().to_vec().into()
        };
    }

    Ok(match array.data_type() {
        DataType::Int8 => copy_values!(Int8Type),
        DataType::Int16 => copy_values!(Int16Type),
        DataType::Int32 => copy_values!(Int32Type),
        DataType::UInt8 => copy_values!(UInt8Type),
        DataType::UInt16 => copy_values!(UInt16Type),
        DataType::UInt32 => copy_values!(UInt32Type),
        DataType::Float32 => copy_values!(Float32Type),
        DataType::Float64 => copy_values!(Float64Type),
        DataType::Utf8 => TypedArray::Utf8(
            array
                .as_string::<i32>()
                .iter()
                .map(|s| s.unwrap_or_default().to_string())
                .collect(),
        ),
        DataType::LargeUtf8 => TypedArray::Utf8(
            array
                .as_string::<i64>()
                .iter()
                .map(|s| s.unwrap_or_default().to_string())
                .collect(),
        ),
        dt => {
            return Err(CodecError::InvalidInput(format!(
                "Unsupported Arrow type: {}",
                dt
            )))
        }
    })
}

/// Moves a `TypedArray` into the matching Arrow array.
pub fn typed_array_to_arrow(array: TypedArray) -> ArrayRef {
    match array {
        TypedArray::Int8(v) => Arc::new(Int8Array::from(v)),
        TypedArray::Int16(v) => Arc::new(Int16Array::from(v)),
        TypedArray::Int32(v) => Arc::new(Int32Array::from(v)),
        TypedArray::UInt8(v) => Arc::new(UInt8Array::from(v)),
        TypedArray::UInt16(v) => Arc::new(UInt16Array::from(v)),
        TypedArray::UInt32(v) => Arc::new(UInt32Array::from(v)),
        TypedArray::Float32(v) => Arc::new(Float32Array::from(v)),
        TypedArray::Float64(v) => Arc::new(Float64Array::from(v)),
        TypedArray::Utf8(v) => Arc::new(StringArray::from(v)),
    }
}

/// The number of bytes the array's values occupy in Arrow memory, excluding
/// validity and offsets. Used as the baseline in compression statistics.
pub fn raw_value_size(array: &dyn Array) -> usize {
    fn primitive_size<T: ArrowPrimitiveType>(array: &PrimitiveArray<T>) -> usize {
        array.values().len() * std::mem::size_of::<T::Native>()
    }
    match array.data_type() {
        DataType::Int8 => primitive_size(array.as_primitive::<Int8Type>()),
        DataType::Int16 => primitive_size(array.as_primitive::<Int16Type>()),
        DataType::Int32 => primitive_size(array.as_primitive::<Int32Type>()),
        DataType::UInt8 => primitive_size(array.as_primitive::<UInt8Type>()),
        DataType::UInt16 => primitive_size(array.as_primitive::<UInt16Type>()),
        DataType::UInt32 => primitive_size(array.as_primitive::<UInt32Type>()),
        DataType::Float32 => primitive_size(array.as_primitive::<Float32Type>()),
        DataType::Float64 => primitive_size(array.as_primitive::<Float64Type>()),
        DataType::Utf8 => array.as_string::<i32>().values().len(),
        DataType::LargeUtf8 => array.as_string::<i64>().values().len(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_conversion_both_ways() {
        let array = Int32Array::from(vec![10, 20, 30]);
        let typed = typed_array_from_arrow(&array).unwrap();
        assert_eq!(typed, TypedArray::Int32(vec![10, 20, 30]));

        let back = typed_array_to_arrow(typed);
        let back = back.as_any().downcast_ref::<Int32Array>().unwrap();
        assert_eq!(back, &array);
    }

    #[test]
    fn test_string_conversion() {
        let array = StringArray::from(vec!["x", "", "y"]);
        let typed = typed_array_from_arrow(&array).unwrap();
        assert_eq!(typed, TypedArray::from(vec!["x", "", "y"]));
        assert_eq!(raw_value_size(&array), 2);
    }

    #[test]
    fn test_sliced_array_uses_visible_values_only() {
        let array = UInt16Array::from(vec![1, 2, 3, 4]);
        let sliced = array.slice(1, 2);
        assert_eq!(
            typed_array_from_arrow(&sliced).unwrap(),
            TypedArray::UInt16(vec![2, 3])
        );
        assert_eq!(raw_value_size(&sliced), 4);
    }

    #[test]
    fn test_nulls_and_unsupported_types_are_rejected() {
        let with_nulls = Int32Array::from(vec![Some(1), None]);
        assert!(matches!(
            typed_array_from_arrow(&with_nulls),
            Err(CodecError::InvalidInput(_))
        ));

        let wide = arrow::array::Int64Array::from(vec![1i64]);
        let err = typed_array_from_arrow(&wide).unwrap_err();
        assert!(err.to_string().contains("Unsupported Arrow type"));
    }
}
