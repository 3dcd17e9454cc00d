// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(clippy::too_many_arguments)]

//! # valscope
//!
//! Debugger-style rendering of values read out of a target process. Given raw bytes, a type
//! descriptor and access to the target's memory, `valscope` prints what a debugger user expects
//! to see: integers in the requested radix, floats with their NaN payloads intact, arrays with
//! repeat runs compressed, strings fetched out of target memory, and structures in source
//! language syntax.
//!
//! ## Features
//!
//! - **Byte order aware** - targets of either endianness, independent of the host
//! - **Wide integers** - integers beyond 64 bits print in decimal when they fit, as hex otherwise
//! - **Bounded output** - element budget and repeat compression keep huge arrays readable
//! - **Graceful degradation** - unmapped memory, stub types and bad floats print inline
//!   placeholders, only transport failures abort a print
//! - **Cooperative cancellation** - long prints unwind cleanly on request
//!
//! ## Quick Start
//!
//! ```rust
//! use valscope::prelude::*;
//!
//! let mut memory = MemoryImage::new();
//! memory.map(0x1000, b"hello\0".to_vec(), ".rodata")?;
//!
//! let char_ptr = Type::pointer_to(Type::int("char", 1, false), 8);
//! let value = Value::new(char_ptr, 0x1000u64.to_le_bytes().to_vec())?;
//!
//! let policy = PrintPolicy::new();
//! let printer = ValuePrinter::new(&policy, &memory).with_byte_order(ByteOrder::Little);
//!
//! let mut out = PrintStream::new();
//! printer.print_value(&value, &mut out, PrintOptions::new())?;
//! assert_eq!(out.as_str(), "0x1000 \"hello\"");
//! # Ok::<(), valscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`format`] - the formatter: scalars, sequences, strings and the recursive value printer
//! - [`policy`] - the print policy snapshot and the `set` / `show` command layer
//! - [`target`] - byte order decoding and the target memory interface
//! - [`types`] - type descriptors and stub resolution
//! - [`language`] - source language syntax hooks
//! - [`prelude`] - convenient re-exports
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`](Result):
//!
//! ```rust
//! use valscope::{Error, PrintPolicy};
//!
//! match PrintPolicy::new().with_output_radix(7) {
//!     Ok(_) => println!("radix changed"),
//!     Err(Error::Configuration(message)) => println!("{message}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! cargo +nightly fuzz run formatting --release
//! ```

#[macro_use]
pub(crate) mod error;
pub(crate) mod cancel;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

pub mod format;
pub mod language;
pub mod policy;
pub mod target;
pub mod types;
pub mod value;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use valscope::{Result, Type, Value};
///
/// fn small_int(value: i32) -> Result<Value> {
///     Value::new(Type::int("int", 4, false), value.to_le_bytes().to_vec())
/// }
/// # small_int(5).unwrap();
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `valscope` Error type
///
/// Covers every failure this crate can report. Only transport faults, cancellation and
/// rejected configuration reach the caller, everything else prints inline.
pub use error::Error;

pub use cancel::CancellationToken;
pub use format::{
    FetchedString, FormatLetter, Pretty, PrintOptions, PrintStream, SequenceSummary, ValuePrinter,
};
pub use language::{CLanguage, Language};
pub use policy::{
    settings::{PrintSetting, PrintSettings},
    PrintLimit, PrintPolicy,
};
pub use target::{ByteOrder, MemoryImage, MemoryProtection, MemoryRegion, ReadFault, TargetMemory};
pub use types::{Field, NoStubs, Type, TypeCode, TypeRef, TypeResolver, TypeTable};
pub use value::Value;
