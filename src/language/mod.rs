//! Source-language syntax.
//!
//! The value formatter decodes bytes but leaves surface syntax to a [`Language`]: how a pointer,
//! reference, structure, union or enumeration reads, how strings are quoted and escaped, and
//! how type names are spelled. The language is picked by whoever owns the debugging session and
//! handed to [`crate::ValuePrinter::with_language`].
//!
//! [`CLanguage`] renders C syntax.

mod c;

pub use c::CLanguage;

use crate::{
    format::{PrintStream, Slot, ValuePrinter},
    policy::PrintPolicy,
    types::Type,
    Result,
};

/// Syntax hooks of one source language.
pub trait Language: Send + Sync {
    /// Returns the language name, e.g. `"c"`.
    fn name(&self) -> &'static str;

    /// Returns the spelling of `ty` as used in a type annotation.
    fn type_name(&self, ty: &Type) -> String;

    /// Prints a pointer, reference, structure, union or enumeration.
    ///
    /// Nested objects are printed by calling back into [`ValuePrinter::val_print`]. Returns the
    /// number of string characters printed when the object rendered as a string, 0 otherwise.
    ///
    /// # Errors
    ///
    /// Propagates fatal errors raised while printing nested objects or reading target memory.
    fn render_aggregate(
        &self,
        printer: &ValuePrinter<'_>,
        out: &mut PrintStream,
        slot: Slot<'_>,
    ) -> Result<usize>;

    /// Prints `bytes` as a string literal.
    ///
    /// At most `policy.elements()` characters are shown. `truncated` forces a trailing
    /// ellipsis even when every byte was shown.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Format`] if the stream rejects the write.
    fn render_string(
        &self,
        out: &mut PrintStream,
        bytes: &[u8],
        truncated: bool,
        policy: &PrintPolicy,
    ) -> Result<()>;
}
