//! Target byte order and endian-aware decoding of raw value bytes.
//!
//! Bytes captured from a target process are stored exactly as they appeared in target memory.
//! The target's byte order can differ from the host's, so every scalar decode in the formatter
//! goes through this module instead of reinterpreting host memory.
//!
//! # Key Components
//!
//! - [`crate::target::io::ByteOrder`] - Byte order of the target process
//! - [`crate::target::io::TargetIO`] - Trait defining endian-aware decoding for primitive types
//! - [`crate::target::io::read_target`] - Decode a fixed-size primitive from the start of a buffer
//! - [`crate::target::io::unpack_unsigned`] / [`crate::target::io::unpack_signed`] - Decode
//!   integers of any width from 1 to 8 bytes, with zero or sign extension
//! - [`crate::target::io::most_significant_first`] - Normalize a buffer of any width into
//!   most-significant-byte-first order
//!
//! # Supported Types
//! The [`crate::target::io::TargetIO`] trait is implemented for:
//! - **Unsigned integers**: `u8`, `u16`, `u32`, `u64`
//! - **Signed integers**: `i8`, `i16`, `i32`, `i64`
//! - **Floating point**: `f32`, `f64`
//!
//! # Examples
//!
//! ```rust
//! use valscope::target::{read_target, unpack_signed, ByteOrder};
//!
//! let data = [0x00, 0x00, 0x00, 0x01];
//! let value: u32 = read_target(&data, ByteOrder::Big)?;
//! assert_eq!(value, 1);
//!
//! // A two byte target `short` holding -2
//! assert_eq!(unpack_signed(&[0xFE, 0xFF], ByteOrder::Little), -2);
//! # Ok::<(), valscope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! [`crate::target::io::read_target`] returns [`crate::Error::Malformed`] if the buffer holds
//! fewer bytes than the requested type. The `unpack_*` helpers never fail; callers guarantee
//! widths of at most eight bytes.

use std::borrow::Cow;

use crate::Result;

/// Byte order of the target process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ByteOrder {
    /// Least significant byte at the lowest address.
    Little,
    /// Most significant byte at the lowest address.
    Big,
}

impl ByteOrder {
    /// Returns the byte order of the machine running the formatter.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::host()
    }
}

/// Trait for decoding primitive types from target bytes.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait TargetIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_target_io {
    ($($ty:ty => $n:literal),* $(,)?) => {
        $(
            impl TargetIO for $ty {
                type Bytes = [u8; $n];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }
            }
        )*
    };
}

impl_target_io! {
    u8 => 1, i8 => 1,
    u16 => 2, i16 => 2,
    u32 => 4, i32 => 4,
    u64 => 8, i64 => 8,
    f32 => 4, f64 => 8,
}

/// Decodes a `T` from the start of `data` using the target byte order.
///
/// # Arguments
/// * `data` - The buffer to read from
/// * `order` - Byte order of the target that produced `data`
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `data` is shorter than `T`.
pub fn read_target<T: TargetIO>(data: &[u8], order: ByteOrder) -> Result<T> {
    let size = std::mem::size_of::<T>();
    let Some(slice) = data.get(..size) else {
        return Err(malformed_error!(
            "need {} bytes, buffer holds {}",
            size,
            data.len()
        ));
    };

    let Ok(bytes) = T::Bytes::try_from(slice) else {
        return Err(malformed_error!("byte conversion failed for {} bytes", size));
    };

    Ok(match order {
        ByteOrder::Little => T::from_le_bytes(bytes),
        ByteOrder::Big => T::from_be_bytes(bytes),
    })
}

/// Returns `data` ordered most-significant byte first.
///
/// Big-endian input is borrowed unchanged, little-endian input is reversed into a new buffer.
#[must_use]
pub fn most_significant_first(data: &[u8], order: ByteOrder) -> Cow<'_, [u8]> {
    match order {
        ByteOrder::Big => Cow::Borrowed(data),
        ByteOrder::Little => Cow::Owned(data.iter().rev().copied().collect()),
    }
}

/// Decodes an unsigned integer of `data.len()` bytes (at most 8), zero extended.
///
/// Bytes beyond the eighth most significant one are ignored.
#[must_use]
pub fn unpack_unsigned(data: &[u8], order: ByteOrder) -> u64 {
    let msb_first = most_significant_first(data, order);
    let start = msb_first.len().saturating_sub(8);
    msb_first[start..]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Decodes a signed two's complement integer of `data.len()` bytes (at most 8), sign extended.
#[must_use]
#[allow(clippy::cast_possible_wrap)] // Reinterpretation is the point
pub fn unpack_signed(data: &[u8], order: ByteOrder) -> i64 {
    let width = data.len().min(8);
    let raw = unpack_unsigned(data, order);
    if width == 0 || width == 8 {
        return raw as i64;
    }
    let shift = 64 - width * 8;
    ((raw << shift) as i64) >> shift
}
