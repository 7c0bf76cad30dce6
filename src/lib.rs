//! Read-path driver for FAT32 volumes.
//!
//! The crate translates raw disk sectors into a directory/file view that a
//! virtual filesystem layer can consume: it decodes the boot sector and the
//! FS Information Sector, caches them per volume identity, resolves a path
//! into a directory listing and reports free space.
//!
//! Disk access is abstracted behind [`SectorRead`], so the driver can run on
//! top of any block layer (or an in-memory image in tests).
#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic, clippy::nursery)]

extern crate alloc;

use thiserror::Error;

pub mod fat32;
pub mod volume;

pub use fat32::driver::Fat32Driver;

#[macro_export]
macro_rules! static_assert {
    ($condition:expr $(, $($arg:tt)+)?) => {
        const _: () = assert!($condition $(, $($arg)+)?);
    };
}

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
/// An error that can occur when performing sector-level disk operations.
pub enum DeviceError {
    #[error("I/O error")]
    Io,
    #[error("Out of bounds")]
    OutOfBounds,
    #[error("Unsupported operation")]
    Unsupported,
}

/// A source of raw disk sectors.
///
/// This is the seam between the driver and the block layer: a request names
/// the disk, the first absolute sector and a sector count, and either fills
/// the destination buffer or fails.
pub trait SectorRead {
    /// Size of one sector in bytes.
    const SECTOR_SIZE: usize = 512;

    /// Reads `count` consecutive sectors starting at `first_sector` from the
    /// given disk into `dst`.
    ///
    /// `dst` must be at least `count * Self::SECTOR_SIZE` bytes long.
    ///
    /// ## Errors
    ///
    /// Returns an error if the read failed; `dst` contents are unspecified
    /// in that case.
    fn read_sectors(
        &mut self,
        disk: volume::DiskId,
        first_sector: u64,
        count: u32,
        dst: &mut [u8],
    ) -> Result<(), DeviceError>;
}
