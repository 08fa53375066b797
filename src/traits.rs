//! This module defines shared traits used across different kernels.

use num_traits::{PrimInt, WrappingAdd, WrappingSub};
use std::fmt::Debug;

use crate::types::{ElementType, TypedArray};

/// A primitive integer type that can appear as a column element or stage value.
///
/// Links the Rust type to its `ElementType` tag and to the `TypedArray` variant
/// that owns a vector of it, so generic kernels can hand typed results back to the
/// executor without a second dispatch.
pub trait IntElement:
    PrimInt + WrappingAdd + WrappingSub + bytemuck::Pod + Debug + Send + Sync + 'static
{
    const ELEMENT_TYPE: ElementType;

    /// The signed type of the same width (`Self` for signed types).
    type Signed: IntElement;

    fn into_typed_array(values: Vec<Self>) -> TypedArray;

    /// Borrows the values of `array` if it holds exactly this type.
    fn slice_of(array: &TypedArray) -> Option<&[Self]>;

    /// Reinterprets the bits as the signed type of the same width.
    fn to_signed(self) -> Self::Signed;

    /// Inverse of [`IntElement::to_signed`].
    fn from_signed(value: Self::Signed) -> Self;
}

// Implement the trait for every integer element type the codec supports.
macro_rules! impl_int_element {
    ($T:ty, $variant:ident, $S:ty) => {
        impl IntElement for $T {
            const ELEMENT_TYPE: ElementType = ElementType::$variant;

            type Signed = $S;

            fn into_typed_array(values: Vec<Self>) -> TypedArray {
                TypedArray::$variant(values)
            }

            fn slice_of(array: &TypedArray) -> Option<&[Self]> {
                match array {
                    TypedArray::$variant(values) => Some(values),
                    _ => None,
                }
            }

            fn to_signed(self) -> $S {
                self as $S
            }

            fn from_signed(value: $S) -> Self {
                value as $T
            }
        }
    };
}

impl_int_element!(i8, Int8, i8);
impl_int_element!(i16, Int16, i16);
impl_int_element!(i32, Int32, i32);
impl_int_element!(u8, UInt8, i8);
impl_int_element!(u16, UInt16, i16);
impl_int_element!(u32, UInt32, i32);
