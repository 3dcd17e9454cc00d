//! Target string fetching.
//!
//! [`fetch_string`] reads a string out of target memory in one of two modes:
//!
//! - **Terminator search** (`requested_len == 0`): chunks of at most [`FETCH_CHUNK_SIZE`]
//!   bytes are read until a NUL byte shows up, the print budget is reached, or the target
//!   stops delivering. When the budget runs out first, one more byte is peeked to decide whether
//!   the string really continues.
//! - **Fixed length**: exactly `min(requested_len, budget)` bytes are read in one attempt,
//!   embedded NUL bytes included.
//!
//! A fetch that stopped on a read fault and came out truncated is handled by fault kind. An
//! unmapped address is reported inline after the string (`<Address 0x.. out of bounds>`). Any
//! other fault aborts the print operation with [`Error::MemoryRead`].

use std::fmt::Write;

use log::{debug, warn};

use crate::{
    cancel::CancellationToken,
    format::PrintStream,
    language::Language,
    policy::{PrintLimit, PrintPolicy},
    target::{ReadFault, TargetMemory},
    Error, Result,
};

/// Largest single read issued while searching for a terminator.
pub const FETCH_CHUNK_SIZE: usize = 200;

/// A string read from target memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedString {
    bytes: Vec<u8>,
    truncated: bool,
    out_of_bounds: Option<u64>,
}

impl FetchedString {
    /// Returns the string bytes, without the terminator.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of characters fetched.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the string continues past what was fetched, or could not be read to
    /// its end.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Returns the address at which the fetch ran out of mapped memory, if it did.
    #[must_use]
    pub fn out_of_bounds(&self) -> Option<u64> {
        self.out_of_bounds
    }
}

/// Reads a string starting at `address`.
///
/// `requested_len` of zero searches for a NUL terminator, any other value fetches that many
/// bytes. Either way at most `budget` bytes are fetched.
///
/// # Errors
///
/// Returns [`Error::MemoryRead`] if the target fails for a reason other than an unmapped address,
/// [`Error::Cancelled`] if `cancel` is triggered between chunks.
pub fn fetch_string(
    memory: &dyn TargetMemory,
    address: u64,
    requested_len: usize,
    budget: PrintLimit,
    cancel: &CancellationToken,
) -> Result<FetchedString> {
    let searching = requested_len == 0;
    let ceiling = if searching {
        budget.get()
    } else {
        requested_len.min(budget.get())
    };
    let chunk_size = if searching {
        FETCH_CHUNK_SIZE.min(ceiling)
    } else {
        ceiling
    };

    let mut buffer: Vec<u8> = Vec::new();
    let mut fault = None;
    let mut terminated = false;

    while buffer.len() < ceiling {
        cancel.checkpoint()?;

        let start = buffer.len();
        let wanted = chunk_size.min(ceiling - start);
        buffer.resize(start + wanted, 0);

        let chunk_address = offset_address(address, start);
        let read = memory.read_partial(chunk_address, &mut buffer[start..]);
        let delivered = read.delivered.min(wanted);
        buffer.truncate(start + delivered);
        debug!("fetched {delivered} of {wanted} string bytes at 0x{chunk_address:x}");

        if searching {
            if let Some(nul) = buffer[start..].iter().position(|&b| b == 0) {
                buffer.truncate(start + nul);
                terminated = true;
                break;
            }
        }
        if read.fault.is_some() || delivered == 0 {
            fault = read.fault;
            break;
        }
    }

    let end = offset_address(address, buffer.len());
    let truncated = if searching {
        !terminated && !peek_terminator(memory, end)
    } else {
        fault.is_some() || buffer.len() < requested_len
    };

    let mut out_of_bounds = None;
    if truncated {
        match fault {
            Some(ReadFault::OutOfBounds) => {
                warn!("string at 0x{address:x} runs out of mapped memory at 0x{end:x}");
                out_of_bounds = Some(end);
            }
            Some(ReadFault::Transport(reason)) => {
                return Err(Error::MemoryRead {
                    address: end,
                    reason,
                });
            }
            None => {}
        }
    }

    Ok(FetchedString {
        bytes: buffer,
        truncated,
        out_of_bounds,
    })
}

/// Returns `true` if the byte at `address` is readable and a NUL terminator.
fn peek_terminator(memory: &dyn TargetMemory, address: u64) -> bool {
    let mut peek = [0u8; 1];
    memory.read_exact(address, &mut peek).is_ok() && peek[0] == 0
}

fn offset_address(address: u64, offset: usize) -> u64 {
    address.wrapping_add(offset as u64)
}

/// Fetches a string from `address` and prints it in the syntax of `language`.
///
/// With address printing enabled, a single space precedes the string so that it reads well after
/// a pointer value. A string that ran out of mapped memory is still printed, followed by the
/// out-of-bounds annotation. Returns the number of characters fetched.
///
/// # Errors
///
/// See [`fetch_string`]. Nothing is printed when fetching fails.
pub fn print_target_string(
    out: &mut PrintStream,
    memory: &dyn TargetMemory,
    language: &dyn Language,
    policy: &PrintPolicy,
    address: u64,
    requested_len: usize,
    cancel: &CancellationToken,
) -> Result<usize> {
    let fetched = fetch_string(memory, address, requested_len, policy.elements(), cancel)?;
    cancel.checkpoint()?;

    if policy.addresses() {
        out.write_str(" ")?;
    }
    language.render_string(out, fetched.bytes(), fetched.is_truncated(), policy)?;
    if let Some(fault_address) = fetched.out_of_bounds() {
        write!(out, " <Address 0x{fault_address:x} out of bounds>")?;
    }
    Ok(fetched.char_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        language::CLanguage,
        target::{MemoryImage, MemoryProtection, MemoryRegion},
        test::image_with,
    };

    fn fetch(image: &MemoryImage, address: u64, len: usize, budget: usize) -> Result<FetchedString> {
        fetch_string(
            image,
            address,
            len,
            PrintLimit::from_user(budget),
            &CancellationToken::new(),
        )
    }

    fn image(bytes: &[u8]) -> MemoryImage {
        image_with(0x1000, bytes)
    }

    #[test]
    fn test_terminated() {
        let image = image(b"abc\0xyz");
        let fetched = fetch(&image, 0x1000, 0, 200).unwrap();
        assert_eq!(fetched.bytes(), b"abc");
        assert_eq!(fetched.char_count(), 3);
        assert!(!fetched.is_truncated());
    }

    #[test]
    fn test_budget_reached() {
        let image = image(&[b'a'; 500]);
        let fetched = fetch(&image, 0x1000, 0, 50).unwrap();
        assert_eq!(fetched.char_count(), 50);
        assert!(fetched.is_truncated());
        assert_eq!(fetched.out_of_bounds(), None);
    }

    #[test]
    fn test_budget_reached_at_terminator() {
        let mut bytes = vec![b'a'; 50];
        bytes.push(0);
        let image = image(&bytes);
        let fetched = fetch(&image, 0x1000, 0, 50).unwrap();
        assert_eq!(fetched.char_count(), 50);
        assert!(!fetched.is_truncated());
    }

    #[test]
    fn test_multiple_chunks() {
        let mut bytes = vec![b'z'; 450];
        bytes.push(0);
        let image = image(&bytes);
        let fetched = fetch(&image, 0x1000, 0, 0).unwrap();
        assert_eq!(fetched.char_count(), 450);
        assert!(!fetched.is_truncated());
    }

    #[test]
    fn test_runs_off_mapped_memory() {
        let image = image(b"abcd");
        let fetched = fetch(&image, 0x1000, 0, 200).unwrap();
        assert_eq!(fetched.bytes(), b"abcd");
        assert!(fetched.is_truncated());
        assert_eq!(fetched.out_of_bounds(), Some(0x1004));
    }

    #[test]
    fn test_fixed_length_keeps_nul() {
        let image = image(b"ab\0cd");
        let fetched = fetch(&image, 0x1000, 5, 200).unwrap();
        assert_eq!(fetched.bytes(), b"ab\0cd");
        assert!(!fetched.is_truncated());

        let limited = fetch(&image, 0x1000, 5, 2).unwrap();
        assert_eq!(limited.bytes(), b"ab");
        assert!(limited.is_truncated());
    }

    #[test]
    fn test_transport_fault_is_fatal() {
        let mut image = image(b"ab");
        image
            .map_region(MemoryRegion::new(
                0x1002,
                b"cd".to_vec(),
                MemoryProtection::WRITE,
                ".guard",
            ))
            .unwrap();
        let err = fetch(&image, 0x1000, 0, 200).unwrap_err();
        assert!(matches!(err, Error::MemoryRead { address: 0x1002, .. }));
    }

    #[test]
    fn test_print_target_string() {
        let image = image(b"hi");
        let mut out = PrintStream::new();
        let count = print_target_string(
            &mut out,
            &image,
            &CLanguage,
            &PrintPolicy::new(),
            0x1000,
            0,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(count, 2);
        assert_eq!(out.as_str(), " \"hi\"... <Address 0x1002 out of bounds>");
    }

    #[test]
    fn test_print_unmapped_string() {
        let image = image(b"hi");
        let mut out = PrintStream::new();
        let count = print_target_string(
            &mut out,
            &image,
            &CLanguage,
            &PrintPolicy::new().with_addresses(false),
            0x9000,
            0,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(count, 0);
        assert_eq!(out.as_str(), "\"\"... <Address 0x9000 out of bounds>");
    }

    #[test]
    fn test_fixed_length_runs_off_mapped_memory() {
        let image = image(b"abcd");
        let fetched = fetch(&image, 0x1000, 8, 200).unwrap();
        assert_eq!(fetched.bytes(), b"abcd");
        assert!(fetched.is_truncated());
        assert_eq!(fetched.out_of_bounds(), Some(0x1004));

        let mut out = PrintStream::new();
        let count = print_target_string(
            &mut out,
            &image,
            &CLanguage,
            &PrintPolicy::new(),
            0x1000,
            8,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(count, 4);
        assert_eq!(out.as_str(), " \"abcd\"... <Address 0x1004 out of bounds>");
    }

    /// Memory that raises the cancellation flag on every read.
    struct CancellingMemory<'a> {
        inner: &'a MemoryImage,
        cancel: CancellationToken,
    }

    impl TargetMemory for CancellingMemory<'_> {
        fn read_partial(&self, address: u64, buf: &mut [u8]) -> crate::target::PartialRead {
            self.cancel.cancel();
            self.inner.read_partial(address, buf)
        }
    }

    #[test]
    fn test_cancelled_between_chunks() {
        let image = image(&[b'x'; 1000]);
        let cancel = CancellationToken::new();
        let memory = CancellingMemory {
            inner: &image,
            cancel: cancel.clone(),
        };

        let result = fetch_string(&memory, 0x1000, 0, PrintLimit::from_user(0), &cancel);
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
