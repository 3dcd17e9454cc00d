//! The value formatter.
//!
//! [`ValuePrinter`] ties the pieces together for one print operation: it borrows the policy
//! snapshot, the target memory, a stub resolver and a [`Language`], and walks a value
//! recursively. Two entry points exist:
//!
//! - [`ValuePrinter::print_value`] prints a top-level [`Value`]. It handles placeholders for
//!   missing contents, repeated values, and the `(type) ` annotation in front of pointers.
//! - [`ValuePrinter::val_print`] prints raw bytes of a type. Languages call it back for struct
//!   members and referents. It resolves stubs and dispatches on the type code.
//!
//! Integers and floats go to the scalar formatter, arrays and repeated values to the sequence
//! compressor, everything else to the language.
//!
//! # Example
//!
//! ```rust
//! use valscope::{MemoryImage, PrintPolicy, PrintStream, Type, Value, ValuePrinter};
//!
//! let policy = PrintPolicy::new();
//! let memory = MemoryImage::new();
//! let printer = ValuePrinter::new(&policy, &memory);
//!
//! let int = Type::int("int", 4, false);
//! let value = Value::repeated(int, [5u8, 0, 0, 0].repeat(12), 12)?;
//!
//! let mut out = PrintStream::new();
//! printer.print_value(&value, &mut out, Default::default())?;
//! assert_eq!(out.as_str(), "{5 <repeats 12 times>}");
//! # Ok::<(), valscope::Error>(())
//! ```

use std::fmt::Write;

use crate::{
    cancel::CancellationToken,
    format::{
        float::print_float,
        scalar::{print_int, FormatLetter},
        sequence::{print_sequence, Sequence, SequenceSummary},
        PrintStream,
    },
    language::{CLanguage, Language},
    policy::PrintPolicy,
    target::{ByteOrder, TargetMemory},
    types::{NoStubs, Type, TypeCode, TypeRef, TypeResolver},
    value::Value,
    Result,
};

/// Printed in place of a type that is only a stub and could not be resolved.
pub const INCOMPLETE_TYPE: &str = "<incomplete type>";
/// Printed in place of a value the compiler optimized away.
pub const OPTIMIZED_OUT: &str = "<value optimized out>";
/// Printed in place of a value without contents.
pub const ADDRESS_UNKNOWN: &str = "<address of value unknown>";

/// Structure layout request of a single print call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pretty {
    /// Follow the policy's pretty structure setting.
    #[default]
    Default,
    /// One member per line.
    Pretty,
    /// Everything on one line.
    Flat,
}

impl Pretty {
    /// Returns `true` if structures print one member per line under `policy`.
    #[must_use]
    pub fn structs(self, policy: &PrintPolicy) -> bool {
        match self {
            Pretty::Default => policy.pretty_structs(),
            Pretty::Pretty => true,
            Pretty::Flat => false,
        }
    }
}

/// Per-call rendering options, forwarded down the recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Explicit format letter, `None` for the type's natural format
    pub format: Option<FormatLetter>,
    /// Print the referent of references, not just their address
    pub deref_refs: bool,
    /// Nesting depth of the current value
    pub depth: usize,
    /// Structure layout
    pub pretty: Pretty,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            format: None,
            deref_refs: true,
            depth: 0,
            pretty: Pretty::Default,
        }
    }
}

impl PrintOptions {
    /// Creates options for natural formatting at depth 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit format letter.
    #[must_use]
    pub fn with_format(mut self, format: Option<FormatLetter>) -> Self {
        self.format = format;
        self
    }

    /// Sets whether references are followed.
    #[must_use]
    pub fn with_deref_refs(mut self, deref_refs: bool) -> Self {
        self.deref_refs = deref_refs;
        self
    }

    /// Sets the structure layout.
    #[must_use]
    pub fn with_pretty(mut self, pretty: Pretty) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the nesting depth.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Returns the options for a value nested one level deeper.
    #[must_use]
    pub fn nested(self) -> Self {
        self.with_depth(self.depth + 1)
    }
}

/// Raw bytes of one typed object, as handed through the recursion.
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    /// Type of the object
    pub ty: &'a Type,
    /// Object bytes in target order, at least `ty.length()` long
    pub bytes: &'a [u8],
    /// Target address of the object, when it lives in target memory
    pub address: Option<u64>,
    /// Rendering options
    pub options: PrintOptions,
}

/// Prints values for one print operation.
pub struct ValuePrinter<'a> {
    policy: &'a PrintPolicy,
    memory: &'a dyn TargetMemory,
    resolver: &'a dyn TypeResolver,
    language: &'a dyn Language,
    byte_order: ByteOrder,
    cancel: CancellationToken,
}

impl<'a> ValuePrinter<'a> {
    /// Creates a printer over `memory` with C syntax, the host byte order and no stub
    /// resolution.
    #[must_use]
    pub fn new(policy: &'a PrintPolicy, memory: &'a dyn TargetMemory) -> Self {
        ValuePrinter {
            policy,
            memory,
            resolver: &NoStubs,
            language: &CLanguage,
            byte_order: ByteOrder::host(),
            cancel: CancellationToken::new(),
        }
    }

    /// Sets the resolver used to complete stub types.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a dyn TypeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Sets the language whose syntax is printed.
    #[must_use]
    pub fn with_language(mut self, language: &'a dyn Language) -> Self {
        self.language = language;
        self
    }

    /// Sets the byte order of the target.
    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Sets the token checked for cancellation requests.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the policy snapshot of this print operation.
    #[must_use]
    pub fn policy(&self) -> &PrintPolicy {
        self.policy
    }

    /// Returns the target memory.
    #[must_use]
    pub fn memory(&self) -> &dyn TargetMemory {
        self.memory
    }

    /// Returns the language.
    #[must_use]
    pub fn language(&self) -> &dyn Language {
        self.language
    }

    /// Returns the target byte order.
    #[must_use]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Returns the cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns `ty` itself, or its complete definition if it is a stub. `None` if a stub could
    /// not be resolved.
    #[must_use]
    pub fn resolve(&self, ty: &TypeRef) -> Option<TypeRef> {
        if !ty.is_stub() {
            return Some(ty.clone());
        }
        self.resolver
            .resolve_stub(ty)
            .filter(|resolved| !resolved.is_stub())
    }

    /// Prints a top-level value.
    ///
    /// Returns `repetitions * length` for repeated values, the number of string characters
    /// printed for string pointers, and 0 otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MemoryRead`] if following a pointer or reference hit a transport
    /// fault, [`crate::Error::Cancelled`] if the operation was cancelled.
    pub fn print_value(
        &self,
        value: &Value,
        out: &mut PrintStream,
        options: PrintOptions,
    ) -> Result<usize> {
        if value.is_optimized_out() {
            out.write_str(OPTIMIZED_OUT)?;
            return Ok(0);
        }
        let Some(contents) = value.contents() else {
            out.write_str(ADDRESS_UNKNOWN)?;
            return Ok(0);
        };
        let ty = value.ty();

        if value.is_repeated() {
            let count = value.repetitions();
            out.write_str("{")?;
            if ty.is_byte_sized_int() && options.format.is_none() {
                let len = count * ty.length();
                let Some(chars) = contents.get(..len) else {
                    return Err(malformed_error!(
                        "repeated value needs {len} bytes, has {}",
                        contents.len()
                    ));
                };
                self.language.render_string(out, chars, false, self.policy)?;
            } else {
                self.print_elements(out, ty, contents, count, value.address(), options)?;
            }
            out.write_str("}")?;
            return Ok(count * ty.length());
        }

        if self.wants_type_annotation(ty) {
            write!(out, "({}) ", self.language.type_name(ty))?;
        }
        self.print_typed(out, ty, contents, value.address(), options)
    }

    /// Prints `bytes` as an object of type `ty`.
    ///
    /// This is the recursive entry point: languages call it back for members, referents and
    /// elements.
    ///
    /// # Errors
    ///
    /// See [`ValuePrinter::print_value`].
    pub fn val_print(&self, out: &mut PrintStream, slot: Slot<'_>) -> Result<usize> {
        self.cancel.checkpoint()?;

        let mut options = slot.options;
        if options.pretty == Pretty::Default {
            options.pretty = if self.policy.pretty_structs() {
                Pretty::Pretty
            } else {
                Pretty::Flat
            };
        }

        if slot.ty.is_stub() {
            let Some(resolved) = self.resolver.resolve_stub(slot.ty).filter(|t| !t.is_stub())
            else {
                out.write_str(INCOMPLETE_TYPE)?;
                return Ok(0);
            };
            return self.dispatch(out, &resolved, slot.bytes, slot.address, options);
        }
        self.dispatch(out, slot.ty, slot.bytes, slot.address, options)
    }

    /// Prints `count` consecutive elements of type `element` through the sequence compressor,
    /// without delimiters.
    ///
    /// `options.depth` is the depth of the container. Elements are printed one level deeper.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if `bytes` is too short, or any error raised while
    /// printing an element.
    pub fn print_elements(
        &self,
        out: &mut PrintStream,
        element: &Type,
        bytes: &[u8],
        count: usize,
        address: Option<u64>,
        options: PrintOptions,
    ) -> Result<SequenceSummary> {
        let sequence = Sequence::new(bytes, element.length(), count)?.at(address);
        print_sequence(
            out,
            &sequence,
            self.policy,
            options.depth,
            &self.cancel,
            |out, item| {
                self.val_print(
                    out,
                    Slot {
                        ty: element,
                        bytes: item.bytes,
                        address: item.address,
                        options: options.nested().with_deref_refs(true),
                    },
                )
                .map(|_| ())
            },
        )
    }

    fn print_typed(
        &self,
        out: &mut PrintStream,
        ty: &TypeRef,
        bytes: &[u8],
        address: Option<u64>,
        options: PrintOptions,
    ) -> Result<usize> {
        self.val_print(
            out,
            Slot {
                ty,
                bytes,
                address,
                options,
            },
        )
    }

    fn wants_type_annotation(&self, ty: &Type) -> bool {
        match ty.code() {
            TypeCode::Pointer => !ty
                .target()
                .is_some_and(|target| target.is_byte_sized_int() && !target.is_unsigned()),
            TypeCode::Reference => true,
            _ => false,
        }
    }

    fn dispatch(
        &self,
        out: &mut PrintStream,
        ty: &Type,
        bytes: &[u8],
        address: Option<u64>,
        options: PrintOptions,
    ) -> Result<usize> {
        match ty.code() {
            TypeCode::Int => {
                let format = options.format.or_else(|| self.policy.output_format());
                print_int(out, ty, bytes, self.byte_order, format)?;
                Ok(0)
            }
            TypeCode::Float => {
                print_float(out, bytes, ty.length(), self.byte_order)?;
                Ok(0)
            }
            TypeCode::Array => {
                let Some(element) = ty.target() else {
                    return Err(malformed_error!("array type without element type"));
                };
                let Some(element) = self.resolve(element) else {
                    out.write_str(INCOMPLETE_TYPE)?;
                    return Ok(0);
                };
                let count = if element.length() == 0 {
                    0
                } else {
                    ty.length() / element.length()
                };
                out.write_str("{")?;
                self.print_elements(out, &element, bytes, count, address, options)?;
                out.write_str("}")?;
                Ok(0)
            }
            TypeCode::Pointer
            | TypeCode::Reference
            | TypeCode::Struct
            | TypeCode::Union
            | TypeCode::Enum => self.language.render_aggregate(
                self,
                out,
                Slot {
                    ty,
                    bytes,
                    address,
                    options,
                },
            ),
        }
    }
}
