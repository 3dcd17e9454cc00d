//! Access to the memory of the target process.
//!
//! The formatter never owns target memory. It reads through the [`TargetMemory`] trait, whose
//! primitive operation may deliver fewer bytes than requested without that being an error in
//! itself. A [`ReadFault`] describes why delivery stopped; the formatter distinguishes an
//! unmapped address (recoverable, reported inline) from every other transport failure (fatal).
//!
//! [`MemoryImage`] is a concrete target made of labelled regions. It backs the command line
//! front end, which loads images from disk, and the tests.
//!
//! # Example
//!
//! ```rust
//! use valscope::target::{MemoryImage, TargetMemory, ReadFault};
//!
//! let mut image = MemoryImage::new();
//! image.map(0x1000, b"abc\0".to_vec(), ".rodata")?;
//!
//! let mut buf = [0u8; 8];
//! let read = image.read_partial(0x1000, &mut buf);
//! assert_eq!(read.delivered, 4);
//! assert_eq!(read.fault, Some(ReadFault::OutOfBounds));
//! # Ok::<(), valscope::Error>(())
//! ```

use bitflags::bitflags;
use thiserror::Error;

use crate::Result;

/// Reason a target read stopped short.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadFault {
    /// The address is not mapped in the target.
    #[error("address out of bounds")]
    OutOfBounds,

    /// Any other failure of the transport (permissions, lost connection, ...).
    #[error("{0}")]
    Transport(String),
}

/// Outcome of a partial read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRead {
    /// Number of bytes written to the front of the destination buffer.
    pub delivered: usize,
    /// Why delivery stopped before the buffer was filled, if it did.
    pub fault: Option<ReadFault>,
}

impl PartialRead {
    /// A read that filled `delivered` bytes without fault.
    #[must_use]
    pub fn complete(delivered: usize) -> Self {
        PartialRead {
            delivered,
            fault: None,
        }
    }
}

/// Read access to the memory of a target process.
pub trait TargetMemory {
    /// Reads up to `buf.len()` bytes starting at `address`.
    ///
    /// Delivers the longest readable prefix. When fewer bytes than requested arrive,
    /// [`PartialRead::fault`] explains why.
    fn read_partial(&self, address: u64, buf: &mut [u8]) -> PartialRead;

    /// Reads exactly `buf.len()` bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns the fault that stopped delivery if the buffer could not be filled.
    fn read_exact(&self, address: u64, buf: &mut [u8]) -> std::result::Result<(), ReadFault> {
        let read = self.read_partial(address, buf);
        if read.delivered == buf.len() {
            return Ok(());
        }
        Err(read.fault.unwrap_or(ReadFault::OutOfBounds))
    }
}

impl<T: TargetMemory + ?Sized> TargetMemory for &T {
    fn read_partial(&self, address: u64, buf: &mut [u8]) -> PartialRead {
        (**self).read_partial(address, buf)
    }
}

bitflags! {
    /// Access rights of a [`MemoryRegion`].
    ///
    /// A region without [`READ`](Self::READ) is mapped but unreadable: reads that reach it
    /// fail with a transport fault instead of an out-of-bounds fault.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MemoryProtection: u32 {
        /// Region is readable.
        const READ = 0x01;
        /// Region is writable.
        const WRITE = 0x02;
        /// Read and write access.
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

/// A contiguous block of target memory.
#[derive(Clone, Debug)]
pub struct MemoryRegion {
    base: u64,
    data: Vec<u8>,
    protection: MemoryProtection,
    label: String,
}

impl MemoryRegion {
    /// Creates a region holding `data` at `base`.
    #[must_use]
    pub fn new(
        base: u64,
        data: Vec<u8>,
        protection: MemoryProtection,
        label: impl Into<String>,
    ) -> Self {
        MemoryRegion {
            base,
            data,
            protection,
            label: label.into(),
        }
    }

    /// Returns the base address of this region.
    #[must_use]
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Returns the first address past the end of this region.
    ///
    /// Saturates at `u64::MAX` for a region that would run past the address space, which
    /// [`MemoryImage::map_region`] refuses to map.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.base.saturating_add(self.data.len() as u64)
    }

    /// Returns the size of this region in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the label of this region.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the protection of this region.
    #[must_use]
    pub fn protection(&self) -> MemoryProtection {
        self.protection
    }

    /// Returns `true` if `address` falls inside this region.
    #[must_use]
    pub fn contains(&self, address: u64) -> bool {
        address >= self.base && address < self.end()
    }

    fn bytes_from(&self, address: u64) -> &[u8] {
        #[allow(clippy::cast_possible_truncation)] // Offset bounded by region size
        let offset = (address - self.base) as usize;
        &self.data[offset..]
    }
}

/// A target address space assembled from non-overlapping regions.
///
/// Regions are kept sorted by base address, so reads that cross from one region into an
/// adjacent one continue seamlessly.
#[derive(Clone, Debug, Default)]
pub struct MemoryImage {
    regions: Vec<MemoryRegion>,
}

impl MemoryImage {
    /// Creates an empty image. Every read faults with [`ReadFault::OutOfBounds`].
    #[must_use]
    pub fn new() -> Self {
        MemoryImage {
            regions: Vec::new(),
        }
    }

    /// Maps readable and writable `data` at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new region runs past the end of the address space or overlaps
    /// an existing one.
    pub fn map(&mut self, address: u64, data: Vec<u8>, label: impl Into<String>) -> Result<()> {
        self.map_region(MemoryRegion::new(
            address,
            data,
            MemoryProtection::READ_WRITE,
            label,
        ))
    }

    /// Maps a prepared region.
    ///
    /// # Errors
    ///
    /// Returns an error if the new region runs past the end of the address space or overlaps
    /// an existing one.
    pub fn map_region(&mut self, region: MemoryRegion) -> Result<()> {
        if region.base.checked_add(region.data.len() as u64).is_none() {
            return Err(malformed_error!(
                "region '{}' at 0x{:x} with {} bytes runs past the end of the address space",
                region.label,
                region.base,
                region.data.len()
            ));
        }

        if let Some(existing) = self
            .regions
            .iter()
            .find(|r| region.base < r.end() && r.base < region.end())
        {
            return Err(malformed_error!(
                "region '{}' at 0x{:x} overlaps '{}' at 0x{:x}",
                region.label,
                region.base,
                existing.label,
                existing.base
            ));
        }

        let index = self
            .regions
            .partition_point(|r| r.base < region.base);
        self.regions.insert(index, region);
        Ok(())
    }

    /// Returns all mapped regions ordered by base address.
    #[must_use]
    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    /// Returns the region containing `address`, if any.
    #[must_use]
    pub fn region_at(&self, address: u64) -> Option<&MemoryRegion> {
        self.regions.iter().find(|r| r.contains(address))
    }
}

impl TargetMemory for MemoryImage {
    fn read_partial(&self, address: u64, buf: &mut [u8]) -> PartialRead {
        let mut delivered = 0;
        let mut cursor = address;

        while delivered < buf.len() {
            let Some(region) = self.region_at(cursor) else {
                return PartialRead {
                    delivered,
                    fault: Some(ReadFault::OutOfBounds),
                };
            };
            if !region.protection.contains(MemoryProtection::READ) {
                return PartialRead {
                    delivered,
                    fault: Some(ReadFault::Transport("permission denied".to_string())),
                };
            }

            let available = region.bytes_from(cursor);
            let count = available.len().min(buf.len() - delivered);
            buf[delivered..delivered + count].copy_from_slice(&available[..count]);
            delivered += count;
            cursor += count as u64;
        }

        PartialRead::complete(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_within_region() {
        let mut image = MemoryImage::new();
        image.map(0x1000, vec![1, 2, 3, 4], "data").unwrap();

        let mut buf = [0u8; 2];
        image.read_exact(0x1001, &mut buf).unwrap();
        assert_eq!(buf, [2, 3]);
    }

    #[test]
    fn test_partial_read_stops_at_end() {
        let mut image = MemoryImage::new();
        image.map(0x1000, vec![1, 2, 3, 4], "data").unwrap();

        let mut buf = [0u8; 8];
        let read = image.read_partial(0x1002, &mut buf);
        assert_eq!(read.delivered, 2);
        assert_eq!(read.fault, Some(ReadFault::OutOfBounds));
        assert_eq!(&buf[..2], &[3, 4]);
    }

    #[test]
    fn test_region_past_address_space_rejected() {
        let mut image = MemoryImage::new();
        assert!(image.map(u64::MAX - 1, vec![1, 2], "top").is_err());
        assert!(image.regions().is_empty());

        image.map(u64::MAX - 1, vec![7], "top").unwrap();
        assert_eq!(image.regions()[0].end(), u64::MAX);

        let mut buf = [0u8; 2];
        let read = image.read_partial(u64::MAX - 1, &mut buf);
        assert_eq!(read.delivered, 1);
        assert_eq!(read.fault, Some(ReadFault::OutOfBounds));
        assert_eq!(buf[0], 7);
    }

    #[test]
    fn test_read_spans_adjacent_regions() {
        let mut image = MemoryImage::new();
        image.map(0x2004, vec![5, 6], "high").unwrap();
        image.map(0x2000, vec![1, 2, 3, 4], "low").unwrap();

        let mut buf = [0u8; 6];
        image.read_exact(0x2000, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 5, 6]);
        assert_eq!(image.regions()[0].label(), "low");
    }

    #[test]
    fn test_unreadable_region_is_transport_fault() {
        let mut image = MemoryImage::new();
        image.map(0x1000, vec![0x41, 0x41], "data").unwrap();
        image
            .map_region(MemoryRegion::new(
                0x1002,
                vec![0; 16],
                MemoryProtection::WRITE,
                "guard",
            ))
            .unwrap();

        let mut buf = [0u8; 4];
        let read = image.read_partial(0x1000, &mut buf);
        assert_eq!(read.delivered, 2);
        assert_eq!(
            read.fault,
            Some(ReadFault::Transport("permission denied".to_string()))
        );
    }

    #[test]
    fn test_overlap_rejected() {
        let mut image = MemoryImage::new();
        image.map(0x1000, vec![0; 16], "a").unwrap();
        assert!(image.map(0x100F, vec![0; 4], "b").is_err());
        assert!(image.map(0x1010, vec![0; 4], "c").is_ok());
    }

    #[test]
    fn test_read_exact_unmapped() {
        let image = MemoryImage::new();
        let mut buf = [0u8; 1];
        assert_eq!(image.read_exact(0, &mut buf), Err(ReadFault::OutOfBounds));
    }
}
