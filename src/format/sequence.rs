//! Repeat-compressing sequence printer.
//!
//! Arrays and repeated values both print through [`print_sequence`]. Starting at an element, the
//! run of byte-identical elements that follow it is measured. A run longer than the repeat
//! threshold prints the element once followed by `<repeats N times>` and charges the print
//! budget only the threshold, so one long uniform run cannot consume the whole budget. Every
//! other element is printed individually and charges one. When the budget runs out before the
//! last element, `...` is appended.
//!
//! Element layout (braces, separators inside elements) is the caller's business: the compressor
//! writes separators and repeat annotations, and hands each element to a callback.

use std::fmt::Write;

use log::trace;

use crate::{cancel::CancellationToken, format::PrintStream, policy::PrintPolicy, Result};

/// Ellipsis appended to sequences cut short by the print budget.
pub const ELLIPSIS: &str = "...";

/// A run of fixed-size elements laid out back to back.
#[derive(Debug, Clone, Copy)]
pub struct Sequence<'a> {
    bytes: &'a [u8],
    stride: usize,
    count: usize,
    address: Option<u64>,
}

impl<'a> Sequence<'a> {
    /// Creates a sequence of `count` elements of `stride` bytes each, stored in `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if `bytes` is shorter than `count * stride`.
    pub fn new(bytes: &'a [u8], stride: usize, count: usize) -> Result<Self> {
        let needed = stride.checked_mul(count).ok_or_else(|| {
            malformed_error!("sequence of {} elements of {} bytes overflows", count, stride)
        })?;
        if bytes.len() < needed {
            return Err(malformed_error!(
                "sequence of {} elements of {} bytes backed by {} bytes",
                count,
                stride,
                bytes.len()
            ));
        }
        Ok(Sequence {
            bytes,
            stride,
            count,
            address: None,
        })
    }

    /// Records the target address of the first element.
    #[must_use]
    pub fn at(mut self, address: Option<u64>) -> Self {
        self.address = address;
        self
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the sequence has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the bytes of element `index`.
    #[must_use]
    pub fn element(&self, index: usize) -> &'a [u8] {
        let start = index * self.stride;
        &self.bytes[start..start + self.stride]
    }

    /// Returns the target address of element `index`, if the sequence has one.
    #[must_use]
    pub fn element_address(&self, index: usize) -> Option<u64> {
        let offset = u64::try_from(index * self.stride).ok()?;
        self.address.map(|base| base.wrapping_add(offset))
    }

    /// Returns the length of the run of elements identical to element `start`, including it.
    #[must_use]
    pub fn run_length(&self, start: usize) -> usize {
        repeat_run(self.bytes, self.stride, start, self.count)
    }
}

/// Returns how many consecutive `stride`-byte blocks starting at block `start` are identical
/// to it, stopping at block `count`.
#[must_use]
pub fn repeat_run(bytes: &[u8], stride: usize, start: usize, count: usize) -> usize {
    let block = |i: usize| &bytes[i * stride..(i + 1) * stride];
    let first = block(start);
    1 + (start + 1..count).take_while(|&i| block(i) == first).count()
}

/// One element handed to the element printer.
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    /// Position within the sequence
    pub index: usize,
    /// Raw element bytes, in target order
    pub bytes: &'a [u8],
    /// Target address of the element, when the sequence has one
    pub address: Option<u64>,
}

/// What a call to [`print_sequence`] printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceSummary {
    /// Number of elements covered by the output, counting every member of a compressed run
    pub rendered: usize,
    /// Print budget charged
    pub budget_used: usize,
    /// `true` if the budget ran out before the last element
    pub truncated: bool,
}

/// Prints the elements of `sequence`, compressing repeat runs and honouring the print budget.
///
/// `depth` is the nesting level of the enclosing aggregate. It sets the indentation of
/// continuation lines, and of every element when pretty array printing is on.
///
/// # Errors
///
/// Returns [`crate::Error::Cancelled`] when `cancel` is triggered, or any error raised by
/// `print_element`.
pub fn print_sequence<F>(
    out: &mut PrintStream,
    sequence: &Sequence<'_>,
    policy: &PrintPolicy,
    depth: usize,
    cancel: &CancellationToken,
    mut print_element: F,
) -> Result<SequenceSummary>
where
    F: FnMut(&mut PrintStream, Element<'_>) -> Result<()>,
{
    let budget = policy.elements().get();
    let threshold = policy.repeats().get();
    let indent = 2 + 2 * depth;

    let mut summary = SequenceSummary::default();
    let mut index = 0;
    while index < sequence.len() && summary.budget_used < budget {
        cancel.checkpoint()?;

        if index != 0 {
            if policy.pretty_arrays() {
                out.write_str(",\n")?;
                out.print_spaces(indent);
            } else {
                out.write_str(", ")?;
            }
        }
        out.wrap_here(indent);

        let reps = sequence.run_length(index);
        print_element(
            out,
            Element {
                index,
                bytes: sequence.element(index),
                address: sequence.element_address(index),
            },
        )?;

        if reps > threshold {
            trace!("run of {reps} identical elements at index {index}");
            write!(out, " <repeats {reps} times>")?;
            index += reps;
            summary.rendered += reps;
            summary.budget_used = summary.budget_used.saturating_add(threshold);
        } else {
            index += 1;
            summary.rendered += 1;
            summary.budget_used += 1;
        }
    }

    if index < sequence.len() {
        out.write_str(ELLIPSIS)?;
        summary.truncated = true;
    }
    Ok(summary)
}
