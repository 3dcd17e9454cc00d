//! The target process: byte order and memory access.
//!
//! - [`io`] decodes raw bytes according to the target's byte order
//! - [`memory`] defines the read primitive the formatter consumes and a region-based
//!   [`MemoryImage`] implementing it

pub mod io;
pub mod memory;

pub use io::{
    most_significant_first, read_target, unpack_signed, unpack_unsigned, ByteOrder, TargetIO,
};
pub use memory::{
    MemoryImage, MemoryProtection, MemoryRegion, PartialRead, ReadFault, TargetMemory,
};
