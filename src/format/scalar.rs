//! Integer rendering.
//!
//! Integers up to the host's native width (8 bytes) are decoded in target byte order and printed
//! according to a [`FormatLetter`]. Wider integers cannot go through native arithmetic:
//!
//! - **Unsigned**: leading zero bytes are skipped from the most significant end. If the
//!   remaining significant bytes fit in 8 bytes the value prints in decimal, otherwise as one
//!   contiguous hexadecimal string.
//! - **Signed**: always printed as a hexadecimal byte dump. Reconstructing a decimal rendering
//!   of a two's complement value wider than native arithmetic is not attempted.
//!
//! Hexadecimal dumps are normalized to most significant byte first regardless of the target
//! byte order, each byte as two digits.

use std::fmt::Write;

use crate::{
    format::PrintStream,
    target::{most_significant_first, unpack_signed, unpack_unsigned, ByteOrder},
    types::Type,
    Error, Result,
};

/// Width of the host's native integer arithmetic, in bytes.
pub const NATIVE_INT_WIDTH: usize = 8;

/// A single-character directive selecting numeric base and digit grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum FormatLetter {
    /// `d` - signed decimal.
    Decimal,
    /// `u` - unsigned decimal.
    Unsigned,
    /// `x` - hexadecimal with `0x` prefix.
    Hex,
    /// `o` - octal with `0` prefix.
    Octal,
    /// `b` - hexadecimal zero padded to one byte.
    Byte,
    /// `h` - hexadecimal zero padded to two bytes.
    Halfword,
    /// `w` - hexadecimal zero padded to four bytes.
    Word,
    /// `g` - hexadecimal zero padded to eight bytes.
    Giant,
}

impl FormatLetter {
    /// Returns the letter users type for this format.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            FormatLetter::Decimal => 'd',
            FormatLetter::Unsigned => 'u',
            FormatLetter::Hex => 'x',
            FormatLetter::Octal => 'o',
            FormatLetter::Byte => 'b',
            FormatLetter::Halfword => 'h',
            FormatLetter::Word => 'w',
            FormatLetter::Giant => 'g',
        }
    }

    /// Returns `true` for formats that interpret the value as signed.
    #[must_use]
    pub fn is_signed(self) -> bool {
        self == FormatLetter::Decimal
    }
}

impl TryFrom<char> for FormatLetter {
    type Error = Error;

    fn try_from(letter: char) -> Result<Self> {
        Ok(match letter {
            'd' => FormatLetter::Decimal,
            'u' => FormatLetter::Unsigned,
            'x' => FormatLetter::Hex,
            'o' => FormatLetter::Octal,
            'b' => FormatLetter::Byte,
            'h' => FormatLetter::Halfword,
            'w' => FormatLetter::Word,
            'g' => FormatLetter::Giant,
            other => return Err(Error::UnknownFormat(other)),
        })
    }
}

/// Prints a native-width integer according to `format`.
///
/// `value` carries the bits; signed formats reinterpret them as two's complement.
///
/// # Errors
///
/// Returns [`Error::Format`] if the stream rejects the write.
#[allow(clippy::cast_possible_wrap)] // Two's complement reinterpretation
pub fn print_longest(out: &mut PrintStream, format: FormatLetter, value: u64) -> Result<()> {
    match format {
        FormatLetter::Decimal => write!(out, "{}", value as i64)?,
        FormatLetter::Unsigned => write!(out, "{value}")?,
        FormatLetter::Hex => write!(out, "0x{value:x}")?,
        FormatLetter::Octal if value == 0 => write!(out, "0")?,
        FormatLetter::Octal => write!(out, "0{value:o}")?,
        FormatLetter::Byte => write!(out, "0x{value:02x}")?,
        FormatLetter::Halfword => write!(out, "0x{value:04x}")?,
        FormatLetter::Word => write!(out, "0x{value:08x}")?,
        FormatLetter::Giant => write!(out, "0x{value:016x}")?,
    }
    Ok(())
}

/// Prints `bytes` as one hexadecimal number, most significant byte first.
///
/// # Errors
///
/// Returns [`Error::Format`] if the stream rejects the write.
pub fn print_hex_chars(out: &mut PrintStream, bytes: &[u8], order: ByteOrder) -> Result<()> {
    out.write_str("0x")?;
    for byte in most_significant_first(bytes, order).iter() {
        write!(out, "{byte:02x}")?;
    }
    Ok(())
}

/// Prints an integer of type `ty` stored in `bytes`.
///
/// Without an explicit `format`, unsigned types print as unsigned decimal and signed types as
/// signed decimal. Non-decimal formats see the value masked to the type's width, so a
/// two-byte `-1` prints as `0xffff`.
///
/// # Errors
///
/// Returns [`Error::Malformed`] if `bytes` is shorter than the type, [`Error::Format`] if the
/// stream rejects the write.
pub fn print_int(
    out: &mut PrintStream,
    ty: &Type,
    bytes: &[u8],
    order: ByteOrder,
    format: Option<FormatLetter>,
) -> Result<()> {
    let len = ty.length();
    let Some(bytes) = bytes.get(..len) else {
        return Err(malformed_error!(
            "integer of {} bytes backed by {} bytes",
            len,
            bytes.len()
        ));
    };

    if len > NATIVE_INT_WIDTH {
        return print_wide_int(out, bytes, ty.is_unsigned(), order);
    }

    #[allow(clippy::cast_sign_loss)] // Bits are kept, signedness is chosen by the format
    let value = if ty.is_unsigned() {
        unpack_unsigned(bytes, order)
    } else {
        unpack_signed(bytes, order) as u64
    };

    let format = format.unwrap_or(if ty.is_unsigned() {
        FormatLetter::Unsigned
    } else {
        FormatLetter::Decimal
    });

    if format.is_signed() || len == 0 {
        return print_longest(out, format, value);
    }
    let mask = if len >= NATIVE_INT_WIDTH {
        u64::MAX
    } else {
        (1u64 << (len * 8)) - 1
    };
    print_longest(out, format, value & mask)
}

fn print_wide_int(
    out: &mut PrintStream,
    bytes: &[u8],
    unsigned: bool,
    order: ByteOrder,
) -> Result<()> {
    if !unsigned {
        return print_hex_chars(out, bytes, order);
    }

    let msb_first = most_significant_first(bytes, order);
    let leading_zeros = msb_first.iter().take_while(|&&b| b == 0).count();
    let skip = leading_zeros.min(msb_first.len() - NATIVE_INT_WIDTH);
    let significant = &msb_first[skip..];

    if significant.len() <= NATIVE_INT_WIDTH {
        let value = unpack_unsigned(significant, ByteOrder::Big);
        return print_longest(out, FormatLetter::Unsigned, value);
    }
    print_hex_chars(out, significant, ByteOrder::Big)
}
