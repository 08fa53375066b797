//! Integer Packing: re-encodes an integer stream into 1- or 2-byte elements.
//!
//! Values that do not fit the narrow width are written with a sentinel-overflow
//! convention. For width `w`, the sentinels are the extreme values of the narrow
//! type: `upper = max` for both signed and unsigned packing, and `lower = min` for
//! signed packing only.
//!
//! * a value `v >= 0` is written as `upper` repeated while `v >= upper` (subtracting
//!   `upper` each time), followed by the residual;
//! * a value `v < 0` is written as `lower` repeated while `v <= lower` (subtracting
//!   `lower` each time), followed by the residual.
//!
//! The residual is always strictly inside the sentinels, so a decoder reconstructs
//! a value by summing elements until it meets a non-sentinel one. A value equal to
//! a sentinel is therefore written as `[sentinel, 0]`, and a stream that ends on a
//! sentinel is truncated. Everything in this file is one invariant-bearing unit:
//! the width choice, the element count and the encoder all assume the same rule.

use num_traits::{NumCast, ToPrimitive};

use crate::error::CodecError;
use crate::traits::IntElement;
use crate::types::{ElementType, TypedArray};

//==================================================================================
// 1. Layout
//==================================================================================

/// The narrow representation chosen for one packed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackingLayout {
    pub byte_width: u8,
    pub signed: bool,
}

impl PackingLayout {
    /// Validates a `(byte_width, signed)` pair read from a descriptor or config.
    pub fn new(byte_width: u8, signed: bool) -> Result<Self, CodecError> {
        match byte_width {
            1 | 2 => Ok(Self { byte_width, signed }),
            w => Err(CodecError::InvalidParameter {
                step: "IntegerPacking",
                reason: format!("byte width must be 1 or 2, got {}", w),
            }),
        }
    }

    /// The narrow element type of the packed stream.
    pub fn element_type(&self) -> ElementType {
        match (self.byte_width, self.signed) {
            (1, true) => ElementType::Int8,
            (1, false) => ElementType::UInt8,
            (_, true) => ElementType::Int16,
            (_, false) => ElementType::UInt16,
        }
    }

    /// The `(upper, lower)` sentinels. `lower` is `None` for unsigned packing.
    fn sentinels(&self) -> (i64, Option<i64>) {
        match (self.byte_width, self.signed) {
            (1, true) => (i8::MAX as i64, Some(i8::MIN as i64)),
            (1, false) => (u8::MAX as i64, None),
            (_, true) => (i16::MAX as i64, Some(i16::MIN as i64)),
            (_, false) => (u16::MAX as i64, None),
        }
    }

    fn is_sentinel(&self, t: i64) -> bool {
        let (upper, lower) = self.sentinels();
        t == upper || Some(t) == lower
    }
}

/// Picks the packing layout for `values`.
///
/// Signedness follows the data: the stream is packed unsigned unless a value is
/// negative. With `fixed_width` the caller's width is used; otherwise the width
/// with the smaller packed byte size wins, ties going to 1 byte.
pub fn choose_layout(values: &[i64], fixed_width: Option<u8>) -> Result<PackingLayout, CodecError> {
    let signed = values.iter().any(|&v| v < 0);
    if let Some(width) = fixed_width {
        return PackingLayout::new(width, signed);
    }
    let one = PackingLayout { byte_width: 1, signed };
    let two = PackingLayout { byte_width: 2, signed };
    let size_one = packed_len(values, one);
    let size_two = packed_len(values, two).saturating_mul(2);
    Ok(if size_one <= size_two { one } else { two })
}

/// Number of narrow elements `values` occupies under `layout`.
pub fn packed_len(values: &[i64], layout: PackingLayout) -> usize {
    values
        .iter()
        .map(|&v| element_count(v, layout))
        .fold(0usize, |acc, n| acc.saturating_add(n))
}

fn element_count(value: i64, layout: PackingLayout) -> usize {
    let (upper, lower) = layout.sentinels();
    let sentinel_run = if value >= 0 {
        value / upper
    } else {
        // Only reachable for signed layouts, see `choose_layout`.
        value / lower.unwrap_or(i64::MIN)
    };
    sentinel_run as usize + 1
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Packs `values` under `layout`.
///
/// The output is written straight into the narrow element type, so the packed
/// stream costs `packed_len(values, layout) * byte_width` bytes of memory.
///
/// # Errors
/// Returns `CodecError::InvalidInput` if a negative value is packed unsigned.
pub fn encode(values: &[i64], layout: PackingLayout) -> Result<TypedArray, CodecError> {
    Ok(match layout.element_type() {
        ElementType::Int8 => TypedArray::Int8(pack_into(values, layout)?),
        ElementType::UInt8 => TypedArray::UInt8(pack_into(values, layout)?),
        ElementType::Int16 => TypedArray::Int16(pack_into(values, layout)?),
        _ => TypedArray::UInt16(pack_into(values, layout)?),
    })
}

fn pack_into<N: IntElement>(values: &[i64], layout: PackingLayout) -> Result<Vec<N>, CodecError> {
    let (upper, lower) = layout.sentinels();
    let upper_n: N = narrow(upper)?;
    let lower_n: Option<N> = lower.map(narrow).transpose()?;
    let mut packed: Vec<N> = Vec::with_capacity(packed_len(values, layout));

    for &value in values {
        let mut v = value;
        if v >= 0 {
            while v >= upper {
                packed.push(upper_n);
                v -= upper;
            }
        } else {
            let (lower, lower_n) = lower.zip(lower_n).ok_or_else(|| {
                CodecError::InvalidInput(format!(
                    "negative value {} cannot be packed unsigned",
                    value
                ))
            })?;
            while v <= lower {
                packed.push(lower_n);
                v -= lower;
            }
        }
        // The residual lies strictly between the sentinels.
        packed.push(narrow(v)?);
    }
    Ok(packed)
}

fn narrow<N: IntElement>(v: i64) -> Result<N, CodecError> {
    <N as NumCast>::from(v).ok_or_else(|| {
        CodecError::InvalidInput(format!("{} does not fit {}", v, N::ELEMENT_TYPE))
    })
}

/// Reconstructs `src_size` full-width values from a packed stream.
///
/// # Errors
/// * `CodecError::TruncatedSentinelRun` if the stream ends inside a sentinel run.
/// * `CodecError::CorruptStream` if the stream yields a different number of values
///   than `src_size`, or an accumulated value overflows.
pub fn decode<N: IntElement>(
    packed: &[N],
    layout: PackingLayout,
    src_size: usize,
) -> Result<Vec<i64>, CodecError> {
    let mut output = Vec::with_capacity(src_size.min(packed.len()));
    let mut elements = packed.iter().map(|t| t.to_i64().unwrap_or_default());
    let mut consumed = 0;

    while let Some(first) = elements.next() {
        consumed += 1;
        let mut value: i64 = 0;
        let mut t = first;
        while layout.is_sentinel(t) {
            value = accumulate(value, t)?;
            t = elements
                .next()
                .ok_or(CodecError::TruncatedSentinelRun(consumed))?;
            consumed += 1;
        }
        value = accumulate(value, t)?;

        if output.len() == src_size {
            return Err(CodecError::CorruptStream(format!(
                "packed stream holds more than the declared {} values",
                src_size
            )));
        }
        output.push(value);
    }

    if output.len() != src_size {
        return Err(CodecError::CorruptStream(format!(
            "packed stream holds {} values, but expected {}",
            output.len(),
            src_size
        )));
    }
    Ok(output)
}

fn accumulate(value: i64, t: i64) -> Result<i64, CodecError> {
    value
        .checked_add(t)
        .ok_or_else(|| CodecError::CorruptStream("packed value overflows i64".to_string()))
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
