//! This module defines the canonical, type-safe representation of element types
//! used throughout the bincol pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The physical element type of a numeric column or an intermediate stage.
///
/// These names are part of the descriptor wire format (`"src_type": "Float64"`),
/// so renaming a variant is a breaking change.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementType {
    Int8,
    Int16,
    Int32,
    UInt8,
    UInt16,
    UInt32,
    Float32,
    Float64,
}

/// The coarse kind of value flowing between two pipeline steps.
///
/// Chaining is validated on kinds rather than element types because some steps
/// (Integer Packing) only settle their concrete output type once they see data.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Integer,
    Text,
    Bytes,
}

impl ElementType {
    /// Size of one element in bytes.
    pub fn byte_width(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Returns `true` for signed integers and floats.
    pub fn is_signed(&self) -> bool {
        !matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32)
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    pub fn value_kind(&self) -> ValueKind {
        if self.is_float() {
            ValueKind::Float
        } else {
            ValueKind::Integer
        }
    }

    /// Resolves the `(byte_width, signed, float)` triple carried by a Byte-Array
    /// descriptor back into an element type. Returns `None` for layouts that name
    /// no supported type (e.g. an unsigned float or an 8-byte integer).
    pub fn from_layout(byte_width: u8, signed: bool, float: bool) -> Option<Self> {
        match (byte_width, signed, float) {
            (1, true, false) => Some(Self::Int8),
            (2, true, false) => Some(Self::Int16),
            (4, true, false) => Some(Self::Int32),
            (1, false, false) => Some(Self::UInt8),
            (2, false, false) => Some(Self::UInt16),
            (4, false, false) => Some(Self::UInt32),
            (4, true, true) => Some(Self::Float32),
            (8, true, true) => Some(Self::Float64),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches the serde representation used in descriptors.
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
