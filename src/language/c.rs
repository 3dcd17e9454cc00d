//! C syntax.
//!
//! | Object | Rendering |
//! |--------|-----------|
//! | pointer | `0x2000` |
//! | pointer to a one-byte integer | `0x3000 "text"`, or `0x0` when null |
//! | reference | `@0x2000: 42` |
//! | struct / union | `{a = 1, b = {x = 2}}` |
//! | union nested in an aggregate, unions off | `{...}` |
//! | enum | `GREEN`, or the integer when no enumerator matches |
//! | string | `"ab", 'c' <repeats 30 times>, "d"...` |

use std::fmt::Write;

use log::warn;

use crate::{
    format::{
        print_int, print_target_string, sequence::repeat_run, PrintStream, Slot, ValuePrinter,
        ELLIPSIS, INCOMPLETE_TYPE,
    },
    language::Language,
    policy::PrintPolicy,
    target::{unpack_signed, unpack_unsigned, ReadFault},
    types::{Type, TypeCode},
    Error, Result,
};

/// The C language.
#[derive(Debug, Clone, Copy, Default)]
pub struct CLanguage;

impl Language for CLanguage {
    fn name(&self) -> &'static str {
        "c"
    }

    fn type_name(&self, ty: &Type) -> String {
        match ty.code() {
            TypeCode::Pointer | TypeCode::Reference => {
                let suffix = if ty.code() == TypeCode::Pointer {
                    '*'
                } else {
                    '&'
                };
                let base = ty
                    .target()
                    .map_or_else(|| "void".to_string(), |target| self.type_name(target));
                if base.ends_with('*') || base.ends_with('&') {
                    format!("{base}{suffix}")
                } else {
                    format!("{base} {suffix}")
                }
            }
            TypeCode::Array => {
                let base = ty
                    .target()
                    .map_or_else(|| "void".to_string(), |target| self.type_name(target));
                format!("{base} [{}]", ty.element_count())
            }
            TypeCode::Struct => tagged("struct", ty),
            TypeCode::Union => tagged("union", ty),
            TypeCode::Enum => tagged("enum", ty),
            TypeCode::Int | TypeCode::Float => ty.name().map_or_else(
                || format!("<{}-byte {}>", ty.length(), ty.code()),
                str::to_string,
            ),
        }
    }

    fn render_aggregate(
        &self,
        printer: &ValuePrinter<'_>,
        out: &mut PrintStream,
        slot: Slot<'_>,
    ) -> Result<usize> {
        match slot.ty.code() {
            TypeCode::Pointer => self.print_pointer(printer, out, slot),
            TypeCode::Reference => print_reference(printer, out, slot),
            TypeCode::Struct | TypeCode::Union => print_fields(printer, out, slot),
            TypeCode::Enum => print_enum(printer, out, slot),
            other => Err(malformed_error!("{} is not an aggregate", other)),
        }
    }

    fn render_string(
        &self,
        out: &mut PrintStream,
        bytes: &[u8],
        truncated: bool,
        policy: &PrintPolicy,
    ) -> Result<()> {
        // A trailing NUL of a complete string is not shown
        let length = match bytes.last() {
            Some(0) if !truncated => bytes.len() - 1,
            _ => bytes.len(),
        };
        if length == 0 {
            out.write_str("\"\"")?;
            if truncated {
                out.write_str(ELLIPSIS)?;
            }
            return Ok(());
        }

        let budget = policy.elements().get();
        let threshold = policy.repeats().get();
        let mut printed = 0usize;
        let mut in_quotes = false;
        let mut need_comma = false;
        let mut index = 0;

        while index < length && printed < budget {
            let reps = repeat_run(bytes, 1, index, length);
            let ch = bytes[index];

            if reps > threshold {
                if in_quotes {
                    out.write_str("\", ")?;
                    in_quotes = false;
                } else if need_comma {
                    out.write_str(", ")?;
                }
                out.write_char('\'')?;
                emit_char(out, ch, b'\'')?;
                write!(out, "' <repeats {reps} times>")?;
                index += reps;
                printed = printed.saturating_add(threshold);
                need_comma = true;
            } else {
                if !in_quotes {
                    if need_comma {
                        out.write_str(", ")?;
                    }
                    out.write_char('"')?;
                    in_quotes = true;
                }
                emit_char(out, ch, b'"')?;
                index += 1;
                printed += 1;
            }
        }

        if in_quotes {
            out.write_char('"')?;
        }
        if truncated || index < length {
            out.write_str(ELLIPSIS)?;
        }
        Ok(())
    }
}

impl CLanguage {
    fn print_pointer(
        &self,
        printer: &ValuePrinter<'_>,
        out: &mut PrintStream,
        slot: Slot<'_>,
    ) -> Result<usize> {
        let bytes = object_bytes(&slot)?;
        if slot.options.format.is_some() {
            print_int(out, slot.ty, bytes, printer.byte_order(), slot.options.format)?;
            return Ok(0);
        }

        let address = unpack_unsigned(bytes, printer.byte_order());
        let points_to_chars = slot
            .ty
            .target()
            .is_some_and(|target| target.is_byte_sized_int());

        if points_to_chars && address != 0 {
            let policy = printer.policy();
            if policy.addresses() {
                write!(out, "0x{address:x}")?;
            }
            return print_target_string(
                out,
                printer.memory(),
                self,
                policy,
                address,
                0,
                printer.cancellation(),
            );
        }

        write!(out, "0x{address:x}")?;
        Ok(0)
    }
}

fn tagged(keyword: &str, ty: &Type) -> String {
    match ty.name() {
        Some(name) => format!("{keyword} {name}"),
        None => format!("{keyword} {{...}}"),
    }
}

fn object_bytes<'a>(slot: &Slot<'a>) -> Result<&'a [u8]> {
    let length = slot.ty.length();
    slot.bytes.get(..length).ok_or_else(|| {
        malformed_error!(
            "{} of {} bytes backed by {} bytes",
            slot.ty.code(),
            length,
            slot.bytes.len()
        )
    })
}

fn print_reference(
    printer: &ValuePrinter<'_>,
    out: &mut PrintStream,
    slot: Slot<'_>,
) -> Result<usize> {
    let address = unpack_unsigned(object_bytes(&slot)?, printer.byte_order());
    let deref = slot.options.deref_refs;

    if printer.policy().addresses() {
        write!(out, "@0x{address:x}")?;
        if deref {
            out.write_str(": ")?;
        }
    }
    if !deref {
        return Ok(0);
    }

    let Some(target) = slot.ty.target() else {
        return Err(malformed_error!("reference type without target type"));
    };
    let Some(target) = printer.resolve(target) else {
        out.write_str(INCOMPLETE_TYPE)?;
        return Ok(0);
    };

    let mut referent = vec![0u8; target.length()];
    match printer.memory().read_exact(address, &mut referent) {
        Ok(()) => printer.val_print(
            out,
            Slot {
                ty: &target,
                bytes: &referent,
                address: Some(address),
                options: slot.options.nested(),
            },
        ),
        Err(ReadFault::OutOfBounds) => {
            warn!("reference to unmapped address 0x{address:x}");
            write!(out, "<Address 0x{address:x} out of bounds>")?;
            Ok(0)
        }
        Err(ReadFault::Transport(reason)) => Err(Error::MemoryRead { address, reason }),
    }
}

fn print_fields(printer: &ValuePrinter<'_>, out: &mut PrintStream, slot: Slot<'_>) -> Result<usize> {
    let policy = printer.policy();
    let fields = slot.ty.fields();
    if fields.is_empty() {
        out.write_str("{<No data fields>}")?;
        return Ok(0);
    }

    let pretty = slot.options.pretty.structs(policy);
    let indent = 2 + 2 * slot.options.depth;

    out.write_char('{')?;
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.write_str(if pretty { "," } else { ", " })?;
        }
        if pretty {
            out.write_char('\n')?;
            out.print_spaces(indent);
        } else {
            out.wrap_here(indent);
        }
        write!(out, "{} = ", field.name)?;

        let Some(member_ty) = printer.resolve(&field.ty) else {
            out.write_str(INCOMPLETE_TYPE)?;
            continue;
        };
        if member_ty.code() == TypeCode::Union && !policy.unions() {
            out.write_str("{...}")?;
            continue;
        }

        let end = field.offset + member_ty.length();
        let Some(bytes) = slot.bytes.get(field.offset..end) else {
            return Err(malformed_error!(
                "member '{}' at {}..{} exceeds {} bytes",
                field.name,
                field.offset,
                end,
                slot.bytes.len()
            ));
        };
        let offset = field.offset as u64;
        printer.val_print(
            out,
            Slot {
                ty: &member_ty,
                bytes,
                address: slot.address.map(|base| base.wrapping_add(offset)),
                options: slot.options.nested(),
            },
        )?;
    }
    if pretty {
        out.write_char('\n')?;
        out.print_spaces(2 * slot.options.depth);
    }
    out.write_char('}')?;
    Ok(0)
}

fn print_enum(printer: &ValuePrinter<'_>, out: &mut PrintStream, slot: Slot<'_>) -> Result<usize> {
    let bytes = object_bytes(&slot)?;
    if slot.options.format.is_some() {
        print_int(out, slot.ty, bytes, printer.byte_order(), slot.options.format)?;
        return Ok(0);
    }

    #[allow(clippy::cast_possible_wrap)] // Enumerator values are stored signed
    let value = if slot.ty.is_unsigned() {
        unpack_unsigned(bytes, printer.byte_order()) as i64
    } else {
        unpack_signed(bytes, printer.byte_order())
    };
    match slot.ty.enumerator_for(value) {
        Some(enumerator) => out.write_str(&enumerator.name)?,
        None => write!(out, "{value}")?,
    }
    Ok(0)
}

/// Writes one character of a C string or character literal, escaped for `quoter`.
fn emit_char(out: &mut PrintStream, ch: u8, quoter: u8) -> Result<()> {
    match ch {
        b'\n' => out.write_str("\\n")?,
        0x08 => out.write_str("\\b")?,
        b'\t' => out.write_str("\\t")?,
        0x0C => out.write_str("\\f")?,
        b'\r' => out.write_str("\\r")?,
        0x1B => out.write_str("\\e")?,
        0x07 => out.write_str("\\a")?,
        b'\\' => out.write_str("\\\\")?,
        c if c == quoter => write!(out, "\\{}", char::from(c))?,
        0x20..=0x7E => out.write_char(char::from(ch))?,
        _ => write!(out, "\\{ch:03o}")?,
    }
    Ok(())
}
