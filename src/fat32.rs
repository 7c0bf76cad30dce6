//! FAT32 read path: metadata sectors, directory entry codec, volume
//! metadata cache and the listing/free-space driver.
pub mod bs;
pub mod cache;
pub mod dirent;
pub mod driver;

pub use bs::{BootSector, FsInfo};
pub use cache::{FetchError, MetadataCache, VolumeMetadata};
pub use dirent::{EntryKind, FileRecord};
pub use driver::{Fat32Driver, ListError, cluster_to_sector};

/// Size of one metadata sector in bytes.
///
/// The boot sector and the FS Information Sector are exactly one 512-byte
/// sector each, regardless of the logical sector size the volume reports.
pub const SECTOR_SIZE: usize = 512;

/// Size of one FAT entry in bytes (FAT32 entries are 32-bit).
pub const FAT_ENTRY_SIZE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A FAT32 cluster number.
pub struct Cluster(u32);

impl Cluster {
    /// Mask for the 28 significant bits of a FAT32 entry.
    pub const MASK: u32 = 0x0FFF_FFFF;
    /// First cluster number that maps to the data region.
    ///
    /// Clusters 0 and 1 are reserved and never address data.
    pub const FIRST_DATA: u32 = 2;
    /// Smallest end-of-chain marker.
    pub const END_OF_CHAIN: u32 = 0x0FFF_FFF8;
    /// Bad cluster marker.
    pub const BAD: u32 = 0x0FFF_FFF7;

    #[must_use]
    #[inline]
    pub const fn new(cluster: u32) -> Self {
        Self(cluster)
    }

    #[must_use]
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    #[must_use]
    #[inline]
    /// Returns true if the cluster addresses the data region.
    pub const fn is_valid(&self) -> bool {
        self.0 >= Self::FIRST_DATA && self.0 <= 0x0FFF_FFF6
    }

    #[must_use]
    #[inline]
    pub const fn is_end_of_chain(&self) -> bool {
        self.0 >= Self::END_OF_CHAIN && self.0 <= 0x0FFF_FFFF
    }

    #[must_use]
    #[inline]
    pub const fn is_bad(&self) -> bool {
        self.0 == Self::BAD
    }

    #[must_use]
    #[inline]
    pub const fn is_free(&self) -> bool {
        self.0 == 0
    }
}
