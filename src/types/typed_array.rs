//! The owned, homogeneous column value consumed and produced by the codec.

use num_traits::NumCast;
use serde::{Deserialize, Serialize};

use super::{ElementType, ValueKind};
use crate::error::CodecError;

/// A homogeneous, fixed-element-size sequence of numbers, or a sequence of strings.
///
/// The codec only ever borrows a `TypedArray` on the encode path and returns a
/// freshly allocated one on the decode path.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Utf8(Vec<String>),
}

macro_rules! impl_from_vec {
    ($T:ty, $variant:ident) => {
        impl From<Vec<$T>> for TypedArray {
            fn from(values: Vec<$T>) -> Self {
                TypedArray::$variant(values)
            }
        }
    };
}

impl_from_vec!(i8, Int8);
impl_from_vec!(i16, Int16);
impl_from_vec!(i32, Int32);
impl_from_vec!(u8, UInt8);
impl_from_vec!(u16, UInt16);
impl_from_vec!(u32, UInt32);
impl_from_vec!(f32, Float32);
impl_from_vec!(f64, Float64);
impl_from_vec!(String, Utf8);

impl From<Vec<&str>> for TypedArray {
    fn from(values: Vec<&str>) -> Self {
        TypedArray::Utf8(values.into_iter().map(str::to_owned).collect())
    }
}

impl TypedArray {
    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The numeric element type, or `None` for string arrays.
    pub fn element_type(&self) -> Option<ElementType> {
        match self {
            Self::Int8(_) => Some(ElementType::Int8),
            Self::Int16(_) => Some(ElementType::Int16),
            Self::Int32(_) => Some(ElementType::Int32),
            Self::UInt8(_) => Some(ElementType::UInt8),
            Self::UInt16(_) => Some(ElementType::UInt16),
            Self::UInt32(_) => Some(ElementType::UInt32),
            Self::Float32(_) => Some(ElementType::Float32),
            Self::Float64(_) => Some(ElementType::Float64),
            Self::Utf8(_) => None,
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self.element_type() {
            Some(ty) => ty.value_kind(),
            None => ValueKind::Text,
        }
    }

    /// Short human-readable type name used in log lines and error messages.
    pub fn type_name(&self) -> String {
        match self.element_type() {
            Some(ty) => ty.to_string(),
            None => "Utf8".to_string(),
        }
    }

    /// Widens an integer array to `i64`. Returns `None` for floats and strings.
    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        fn widen<T: Copy + Into<i64>>(v: &[T]) -> Vec<i64> {
            v.iter().map(|&x| x.into()).collect()
        }
        match self {
            Self::Int8(v) => Some(widen(v)),
            Self::Int16(v) => Some(widen(v)),
            Self::Int32(v) => Some(widen(v)),
            Self::UInt8(v) => Some(widen(v)),
            Self::UInt16(v) => Some(widen(v)),
            Self::UInt32(v) => Some(widen(v)),
            Self::Float32(_) | Self::Float64(_) | Self::Utf8(_) => None,
        }
    }

    /// Narrows `i64` values into an integer array of `element_type`.
    ///
    /// Fails if any value does not fit the target type, or the target is a float.
    pub fn from_i64_values(element_type: ElementType, values: &[i64]) -> Result<Self, CodecError> {
        fn narrow<T: NumCast>(values: &[i64], ty: ElementType) -> Result<Vec<T>, CodecError> {
            values
                .iter()
                .map(|&v| {
                    T::from(v).ok_or_else(|| {
                        CodecError::CorruptStream(format!("value {} does not fit {}", v, ty))
                    })
                })
                .collect()
        }
        Ok(match element_type {
            ElementType::Int8 => Self::Int8(narrow(values, element_type)?),
            ElementType::Int16 => Self::Int16(narrow(values, element_type)?),
            ElementType::Int32 => Self::Int32(narrow(values, element_type)?),
            ElementType::UInt8 => Self::UInt8(narrow(values, element_type)?),
            ElementType::UInt16 => Self::UInt16(narrow(values, element_type)?),
            ElementType::UInt32 => Self::UInt32(narrow(values, element_type)?),
            ElementType::Float32 | ElementType::Float64 => {
                return Err(CodecError::CorruptStream(format!(
                    "cannot build a {} array from integer values",
                    element_type
                )))
            }
        })
    }
}
