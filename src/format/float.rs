//! Floating point rendering.
//!
//! Bit patterns are decoded in target byte order and inspected before any host floating point
//! arithmetic touches them. A Not-a-Number pattern prints as `NaN(0x<mantissa>)`, with a leading
//! `-` when the sign bit is set, so that the payload survives regardless of how the host FPU
//! treats signalling NaNs.
//!
//! # Supported layouts
//!
//! | Length | Layout | Significant digits |
//! |--------|--------|--------------------|
//! | 4 | IEEE-754 single | 9 |
//! | 8 | IEEE-754 double | 17 |
//! | 10, 12, 16 | x87 80-bit extended, stored in the low 10 bytes | 17 |
//!
//! Any other length, and extended values with the explicit integer bit clear, print as
//! `<invalid float value>`.

use std::fmt::Write;

use crate::{
    format::PrintStream,
    target::{read_target, ByteOrder},
    Result,
};

/// Placeholder printed for bit patterns that do not decode to a number.
pub const INVALID_FLOAT: &str = "<invalid float value>";

const EXTENDED_EXPONENT_BIAS: i32 = 16383;
const EXTENDED_EXPONENT_MAX: u16 = 0x7FFF;

/// Result of decoding a floating point bit pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatBits {
    /// A Not-a-Number pattern with its sign and mantissa payload.
    NaN {
        /// Sign bit was set
        negative: bool,
        /// Mantissa field, without the exponent and sign
        mantissa: u64,
    },
    /// An ordinary value (including infinities and zeros).
    Number(f64),
    /// The pattern has no valid interpretation.
    Invalid,
}

/// Decodes `bytes` as a floating point value of `len` bytes.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if `bytes` holds fewer than `len` bytes.
pub fn decode_float(bytes: &[u8], len: usize, order: ByteOrder) -> Result<FloatBits> {
    if bytes.len() < len {
        return Err(malformed_error!(
            "float of {} bytes backed by {} bytes",
            len,
            bytes.len()
        ));
    }

    Ok(match len {
        4 => {
            let bits = read_target::<u32>(bytes, order)?;
            let exponent = (bits >> 23) & 0xFF;
            let mantissa = bits & 0x007F_FFFF;
            if exponent == 0xFF && mantissa != 0 {
                FloatBits::NaN {
                    negative: bits >> 31 != 0,
                    mantissa: u64::from(mantissa),
                }
            } else {
                FloatBits::Number(f64::from(f32::from_bits(bits)))
            }
        }
        8 => {
            let bits = read_target::<u64>(bytes, order)?;
            let exponent = (bits >> 52) & 0x7FF;
            let mantissa = bits & 0x000F_FFFF_FFFF_FFFF;
            if exponent == 0x7FF && mantissa != 0 {
                FloatBits::NaN {
                    negative: bits >> 63 != 0,
                    mantissa,
                }
            } else {
                FloatBits::Number(f64::from_bits(bits))
            }
        }
        10 | 12 | 16 => decode_extended(&bytes[..10], order)?,
        _ => FloatBits::Invalid,
    })
}

fn decode_extended(bytes: &[u8], order: ByteOrder) -> Result<FloatBits> {
    let (significand, sign_exponent) = match order {
        ByteOrder::Little => (
            read_target::<u64>(&bytes[..8], order)?,
            read_target::<u16>(&bytes[8..], order)?,
        ),
        ByteOrder::Big => (
            read_target::<u64>(&bytes[2..], order)?,
            read_target::<u16>(&bytes[..2], order)?,
        ),
    };

    let negative = sign_exponent & 0x8000 != 0;
    let exponent = sign_exponent & EXTENDED_EXPONENT_MAX;
    let integer_bit = significand >> 63 != 0;
    let fraction = significand & 0x7FFF_FFFF_FFFF_FFFF;

    if exponent == EXTENDED_EXPONENT_MAX {
        if fraction != 0 {
            return Ok(FloatBits::NaN {
                negative,
                mantissa: fraction,
            });
        }
        let infinity = if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Ok(FloatBits::Number(infinity));
    }
    if exponent != 0 && !integer_bit {
        return Ok(FloatBits::Invalid);
    }

    // Denormals use the minimum exponent with an implicit integer bit of 0
    let unbiased = i32::from(exponent.max(1)) - EXTENDED_EXPONENT_BIAS - 63;
    #[allow(clippy::cast_precision_loss)] // Only 53 of the 64 significand bits survive
    let magnitude = scale(significand as f64, unbiased);
    Ok(FloatBits::Number(if negative { -magnitude } else { magnitude }))
}

/// Multiplies `value` by 2^`exponent` without overflowing the intermediate power.
fn scale(mut value: f64, mut exponent: i32) -> f64 {
    while exponent > 1000 {
        value *= 2f64.powi(1000);
        exponent -= 1000;
    }
    while exponent < -1000 {
        value *= 2f64.powi(-1000);
        exponent += 1000;
    }
    value * 2f64.powi(exponent)
}

/// Prints a floating point value of `len` bytes stored in `bytes`.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if `bytes` holds fewer than `len` bytes,
/// [`crate::Error::Format`] if the stream rejects the write.
pub fn print_float(
    out: &mut PrintStream,
    bytes: &[u8],
    len: usize,
    order: ByteOrder,
) -> Result<()> {
    match decode_float(bytes, len, order)? {
        FloatBits::NaN { negative, mantissa } => {
            if negative {
                write!(out, "-NaN(0x{mantissa:x})")?;
            } else {
                write!(out, "NaN(0x{mantissa:x})")?;
            }
        }
        FloatBits::Number(value) => {
            let digits = if len == 4 { 9 } else { 17 };
            out.write_str(&format_general(value, digits))?;
        }
        FloatBits::Invalid => out.write_str(INVALID_FLOAT)?,
    }
    Ok(())
}

/// Formats `value` with `precision` significant digits, choosing between fixed and exponent
/// notation the way C's `%g` does, with trailing zeros removed.
#[must_use]
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return if value.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let precision_exp = precision as i32;
    if exponent < -4 || exponent >= precision_exp {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        #[allow(clippy::cast_sign_loss)] // exponent < precision
        let decimals = (precision_exp - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bytes: &[u8], order: ByteOrder) -> String {
        let mut out = PrintStream::new();
        print_float(&mut out, bytes, bytes.len(), order).unwrap();
        out.into_string()
    }

    #[test]
    fn test_single_nan() {
        assert_eq!(render(&0x7FC0_0000u32.to_le_bytes(), ByteOrder::Little), "NaN(0x400000)");
        assert_eq!(render(&0x7FC0_0000u32.to_be_bytes(), ByteOrder::Big), "NaN(0x400000)");
        assert_eq!(render(&0xFFC0_0001u32.to_le_bytes(), ByteOrder::Little), "-NaN(0x400001)");
    }

    #[test]
    fn test_double_nan() {
        let quiet = 0x7FF8_0000_0000_0000u64;
        assert_eq!(render(&quiet.to_le_bytes(), ByteOrder::Little), "NaN(0x8000000000000)");

        let low_only = 0xFFF0_0000_0000_0001u64;
        assert_eq!(render(&low_only.to_be_bytes(), ByteOrder::Big), "-NaN(0x1)");
    }

    #[test]
    fn test_ordinary_values() {
        assert_eq!(render(&1.5f32.to_le_bytes(), ByteOrder::Little), "1.5");
        assert_eq!(render(&0.1f32.to_le_bytes(), ByteOrder::Little), "0.100000001");
        assert_eq!(render(&0.1f64.to_le_bytes(), ByteOrder::Little), "0.10000000000000001");
        assert_eq!(render(&(-2.0f64).to_be_bytes(), ByteOrder::Big), "-2");
        assert_eq!(render(&f32::INFINITY.to_le_bytes(), ByteOrder::Little), "inf");
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(render(&[0u8; 6], ByteOrder::Little), INVALID_FLOAT);
    }

    #[test]
    fn test_extended() {
        // 1.0: exponent 0x3FFF, integer bit set
        let mut one = [0u8; 16];
        one[7] = 0x80;
        one[8] = 0xFF;
        one[9] = 0x3F;
        assert_eq!(render(&one, ByteOrder::Little), "1");

        let mut nan = one;
        nan[0] = 0x01;
        nan[8] = 0xFF;
        nan[9] = 0x7F;
        assert_eq!(render(&nan[..10], ByteOrder::Little), "NaN(0x1)");

        let mut unnormal = one;
        unnormal[7] = 0x00;
        assert_eq!(render(&unnormal[..12], ByteOrder::Little), INVALID_FLOAT);
    }

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(100.0, 9), "100");
        assert_eq!(format_general(1e10, 9), "1e+10");
        assert_eq!(format_general(1.25e-5, 9), "1.25e-05");
        assert_eq!(format_general(123_456_789.0, 9), "123456789");
        assert_eq!(format_general(1_234_567_890.0, 9), "1.23456789e+09");
        assert_eq!(format_general(0.0001, 17), "0.0001");
        assert_eq!(format_general(-0.0, 17), "-0");
    }
}
