//! Rendering of target values into text.
//!
//! # Architecture
//!
//! - [`stream`] - buffered output with line-wrap hints
//! - [`scalar`] - integers and format letters
//! - [`float`] - IEEE-754 and x87 extended bit patterns
//! - [`sequence`] - the repeat-compressing sequence printer shared by arrays and repeated values
//! - [`string`] - fetching strings out of target memory
//! - [`value`] - the recursive value formatter driving all of the above
//!
//! Recoverable anomalies (stub types, missing contents, invalid float encodings, unmapped string
//! tails) print inline placeholders. Only transport faults and cancellation abort a print.

pub mod float;
pub mod scalar;
pub mod sequence;
pub mod stream;
pub mod string;
pub mod value;

pub use float::{format_general, print_float, INVALID_FLOAT};
pub use scalar::{print_hex_chars, print_int, print_longest, FormatLetter};
pub use sequence::{print_sequence, Sequence, SequenceSummary, ELLIPSIS};
pub use stream::PrintStream;
pub use string::{fetch_string, print_target_string, FetchedString, FETCH_CHUNK_SIZE};
pub use value::{
    PrintOptions, Pretty, Slot, ValuePrinter, ADDRESS_UNKNOWN, INCOMPLETE_TYPE, OPTIMIZED_OUT,
};
