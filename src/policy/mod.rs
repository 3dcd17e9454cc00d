//! Print policy: the user-tunable limits and layout switches of the formatter.
//!
//! A [`PrintPolicy`] is an immutable snapshot. Print operations borrow one for their whole
//! duration; configuration commands (see [`settings`]) produce a new snapshot that later print
//! operations observe. Nothing in the formatter mutates a policy.
//!
//! # Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | elements | 200 |
//! | repeats | 10 |
//! | pretty structs | off |
//! | pretty arrays | off |
//! | unions | on |
//! | addresses | on |
//! | input / output radix | 10 / 10 |
//!
//! # Example
//!
//! ```rust
//! use valscope::{FormatLetter, PrintPolicy};
//!
//! let policy = PrintPolicy::new()
//!     .with_elements(0)
//!     .with_pretty_arrays(true)
//!     .with_output_radix(16)?;
//!
//! assert!(policy.elements().is_unlimited());
//! assert_eq!(policy.output_format(), Some(FormatLetter::Hex));
//! # Ok::<(), valscope::Error>(())
//! ```

pub mod settings;

use std::fmt;

use crate::{format::FormatLetter, Error, Result};

/// Default value of [`PrintPolicy::elements`].
pub const PRINT_MAX_DEFAULT: usize = 200;

/// Default value of [`PrintPolicy::repeats`].
pub const REPEAT_COUNT_THRESHOLD_DEFAULT: usize = 10;

/// A count limit where the user-facing value 0 means "unlimited".
///
/// Zero is never stored: it would make the formatter print nothing. It is mapped to the maximum
/// representable count instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrintLimit(usize);

impl PrintLimit {
    /// A limit that is never reached.
    pub const UNLIMITED: PrintLimit = PrintLimit(usize::MAX);

    /// Creates a limit from the value a user typed: 0 means unlimited.
    #[must_use]
    pub const fn from_user(value: usize) -> Self {
        if value == 0 {
            Self::UNLIMITED
        } else {
            PrintLimit(value)
        }
    }

    /// Returns the limit as a count.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns `true` if this limit is unlimited.
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        self.0 == usize::MAX
    }
}

impl fmt::Display for PrintLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            write!(f, "unlimited")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Snapshot of the print configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintPolicy {
    elements: PrintLimit,
    repeats: PrintLimit,
    pretty_structs: bool,
    pretty_arrays: bool,
    unions: bool,
    addresses: bool,
    input_radix: u32,
    output_radix: u32,
}

impl Default for PrintPolicy {
    fn default() -> Self {
        PrintPolicy {
            elements: PrintLimit(PRINT_MAX_DEFAULT),
            repeats: PrintLimit(REPEAT_COUNT_THRESHOLD_DEFAULT),
            pretty_structs: false,
            pretty_arrays: false,
            unions: true,
            addresses: true,
            input_radix: 10,
            output_radix: 10,
        }
    }
}

impl PrintPolicy {
    /// Creates a policy with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of elements or string characters printed per value.
    /// 0 means unlimited.
    #[must_use]
    pub fn with_elements(mut self, elements: usize) -> Self {
        self.elements = PrintLimit::from_user(elements);
        self
    }

    /// Sets the run length above which repeated elements are compressed.
    /// 0 means never compress.
    #[must_use]
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = PrintLimit::from_user(repeats);
        self
    }

    /// Enables multi-line layout of structures.
    #[must_use]
    pub fn with_pretty_structs(mut self, enabled: bool) -> Self {
        self.pretty_structs = enabled;
        self
    }

    /// Enables one element per line for arrays.
    #[must_use]
    pub fn with_pretty_arrays(mut self, enabled: bool) -> Self {
        self.pretty_arrays = enabled;
        self
    }

    /// Enables expansion of unions nested inside structures.
    #[must_use]
    pub fn with_unions(mut self, enabled: bool) -> Self {
        self.unions = enabled;
        self
    }

    /// Enables printing of target addresses in front of strings and pointers.
    #[must_use]
    pub fn with_addresses(mut self, enabled: bool) -> Self {
        self.addresses = enabled;
        self
    }

    /// Sets the radix used to parse numbers typed by the user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for radixes below 2.
    pub fn with_input_radix(mut self, radix: u32) -> Result<Self> {
        if radix < 2 {
            return Err(Error::Configuration(format!(
                "Nonsense input radix ``decimal {radix}''; input radix unchanged."
            )));
        }
        self.input_radix = radix;
        Ok(self)
    }

    /// Sets the radix integers are displayed in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for anything but 8, 10 and 16.
    pub fn with_output_radix(mut self, radix: u32) -> Result<Self> {
        if !matches!(radix, 8 | 10 | 16) {
            return Err(Error::Configuration(format!(
                "Unsupported output radix ``decimal {radix}''; output radix unchanged."
            )));
        }
        self.output_radix = radix;
        Ok(self)
    }

    /// Returns the element budget.
    #[must_use]
    pub fn elements(&self) -> PrintLimit {
        self.elements
    }

    /// Returns the repeat threshold.
    #[must_use]
    pub fn repeats(&self) -> PrintLimit {
        self.repeats
    }

    /// Returns `true` if structures print one member per line.
    #[must_use]
    pub fn pretty_structs(&self) -> bool {
        self.pretty_structs
    }

    /// Returns `true` if arrays print one element per line.
    #[must_use]
    pub fn pretty_arrays(&self) -> bool {
        self.pretty_arrays
    }

    /// Returns `true` if unions nested in structures are expanded.
    #[must_use]
    pub fn unions(&self) -> bool {
        self.unions
    }

    /// Returns `true` if target addresses are printed.
    #[must_use]
    pub fn addresses(&self) -> bool {
        self.addresses
    }

    /// Returns the input radix.
    #[must_use]
    pub fn input_radix(&self) -> u32 {
        self.input_radix
    }

    /// Returns the output radix.
    #[must_use]
    pub fn output_radix(&self) -> u32 {
        self.output_radix
    }

    /// Returns the format letter implied by the output radix, `None` for natural (decimal)
    /// output.
    #[must_use]
    pub fn output_format(&self) -> Option<FormatLetter> {
        match self.output_radix {
            16 => Some(FormatLetter::Hex),
            8 => Some(FormatLetter::Octal),
            _ => None,
        }
    }
}
