//! FAT32 boot sector and FS Information Sector.
use crate::static_assert;

use super::{Cluster, SECTOR_SIZE};

/// FAT32 boot sector.
///
/// First sector of the volume; carries the geometry and layout parameters
/// every address computation derives from.
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct BootSector {
    /// Jump instruction.
    boot_jump: [u8; 3],
    /// OEM name.
    oem_name: [u8; 8],
    /// Bytes per sector.
    ///
    /// This field is either 512, 1024, 2048, or 4096.
    bytes_per_sector: u16,
    /// Sectors per cluster.
    sectors_per_cluster: u8,
    /// Reserved sectors, including this one.
    reserved_sectors: u16,
    /// Number of FAT copies.
    fat_count: u8,
    /// Root directory entries.
    ///
    /// Must be zero on FAT32 file systems.
    root_entries: u16,
    /// Total sectors in the file system.
    ///
    /// Must be zero on FAT32 file systems; see `total_sectors_large`.
    total_sectors: u16,
    /// Media descriptor.
    media_descriptor: u8,
    /// Sectors per FAT (16-bit form).
    ///
    /// Must be zero on FAT32 file systems; see `sectors_per_fat_large`.
    sectors_per_fat: u16,
    /// Sectors per track.
    sectors_per_track: u16,
    /// Number of heads.
    heads: u16,
    /// Hidden sectors.
    hidden_sectors: u32,
    /// Total sectors in the file system (32-bit form).
    total_sectors_large: u32,
    /// Sectors per FAT (32-bit form).
    sectors_per_fat_large: u32,
    /// Mirroring flags.
    flags: u16,
    /// Filesystem version.
    version: u16,
    /// Cluster number of the root directory.
    root_cluster: u32,
    /// Sector offset of the FS Information Sector, relative to the
    /// partition start.
    fs_info_sector: u16,
    /// Sector offset of the backup boot sector.
    backup_boot_sector: u16,
    /// Reserved.
    _reserved: [u8; 12],
    /// Logical drive number.
    drive_number: u8,
    /// Reserved.
    _reserved2: u8,
    /// Extended boot signature.
    boot_flag: u8,
    /// Volume serial number.
    volume_id: u32,
    /// Volume label.
    volume_label: [u8; 11],
    /// File system type tag.
    fs_type: [u8; 8],
    boot_code: [u8; 420],
    /// End signature.
    signature: [u8; 2],
}
static_assert!(
    size_of::<BootSector>() == SECTOR_SIZE,
    "BootSector size is not 512 bytes"
);

impl BootSector {
    /// End signature value.
    pub const SIGNATURE: [u8; 2] = [0x55, 0xAA];
    /// File system type tag of a FAT32 volume.
    pub const FS_TYPE_FAT32: &'static [u8; 8] = b"FAT32   ";

    #[must_use]
    /// Reads a boot sector out of a raw sector buffer.
    pub fn from_sector(sector: &[u8; SECTOR_SIZE]) -> Self {
        // `repr(packed)` makes the alignment 1, so a plain read is fine.
        unsafe { sector.as_ptr().cast::<Self>().read() }
    }

    #[must_use]
    #[inline]
    /// Returns the number of bytes per sector.
    pub const fn bytes_per_sector(&self) -> u16 {
        self.bytes_per_sector
    }

    #[must_use]
    #[inline]
    /// Returns the number of sectors per cluster.
    pub const fn sectors_per_cluster(&self) -> u8 {
        self.sectors_per_cluster
    }

    #[must_use]
    #[inline]
    /// Returns the number of reserved sectors.
    pub const fn reserved_sectors(&self) -> u16 {
        self.reserved_sectors
    }

    #[must_use]
    #[inline]
    /// Returns the number of FAT copies.
    pub const fn fat_count(&self) -> u8 {
        self.fat_count
    }

    #[must_use]
    #[inline]
    /// Returns the number of sectors per FAT.
    pub const fn sectors_per_fat(&self) -> u32 {
        self.sectors_per_fat_large
    }

    #[must_use]
    #[inline]
    /// Returns the cluster number of the root directory.
    pub const fn root_cluster(&self) -> Cluster {
        Cluster::new(self.root_cluster)
    }

    #[must_use]
    #[inline]
    /// Returns the sector offset of the FS Information Sector, relative to
    /// the partition start.
    pub const fn fs_info_sector(&self) -> u16 {
        self.fs_info_sector
    }

    #[must_use]
    #[inline]
    /// Returns the volume label.
    pub const fn volume_label(&self) -> [u8; 11] {
        self.volume_label
    }

    #[must_use]
    #[inline]
    /// Returns the file system type tag.
    pub const fn fs_type(&self) -> [u8; 8] {
        self.fs_type
    }

    #[must_use]
    #[inline]
    /// Returns the number of bytes per cluster.
    pub fn bytes_per_cluster(&self) -> u32 {
        u32::from(self.bytes_per_sector()) * u32::from(self.sectors_per_cluster())
    }

    #[must_use]
    /// Validates the boot sector before any of its geometry is trusted.
    ///
    /// Checks the end signature, the file system type tag and the basic
    /// geometry constraints of a FAT32 volume. A volume failing any of
    /// these is rejected rather than read with bogus geometry.
    pub fn validate(&self) -> bool {
        /// Maximum number of supported FAT copies.
        const MAX_FAT_COUNT: u8 = 2;

        if self.signature != Self::SIGNATURE {
            return false;
        }

        if &self.fs_type != Self::FS_TYPE_FAT32 {
            return false;
        }

        // Check bytes per sector
        if !self.bytes_per_sector().is_power_of_two()
            || self.bytes_per_sector() < 512
            || self.bytes_per_sector() > 4096
        {
            return false;
        }

        // Check sectors per cluster
        if self.sectors_per_cluster() == 0 || !self.sectors_per_cluster().is_power_of_two() {
            return false;
        }

        // Check reserved sectors
        if self.reserved_sectors() == 0 {
            return false;
        }

        // Check FAT count
        if self.fat_count() == 0 || self.fat_count() > MAX_FAT_COUNT {
            return false;
        }

        // These fields take their 16-bit forms on FAT12/16 only.
        if self.root_entries != 0 || self.sectors_per_fat != 0 {
            return false;
        }

        // Check sectors per FAT
        if self.sectors_per_fat_large == 0 {
            return false;
        }

        // Check root cluster
        if !self.root_cluster().is_valid() {
            return false;
        }

        true
    }
}

/// FS Information Sector.
///
/// Caches the free-cluster and allocated-cluster counters so free-space
/// queries need not scan the FAT.
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct FsInfo {
    /// Leading signature.
    lead_signature: u32,
    /// Reserved.
    _reserved: [u8; 480],
    /// Middle signature.
    struct_signature: u32,
    /// Free cluster count.
    free_clusters: u32,
    /// Allocated cluster count.
    allocated_clusters: u32,
    /// Reserved.
    _reserved2: [u8; 12],
    /// Trailing signature.
    trail_signature: u32,
}
static_assert!(
    size_of::<FsInfo>() == SECTOR_SIZE,
    "FsInfo size is not 512 bytes"
);

impl FsInfo {
    /// Leading signature value.
    pub const LEAD_SIGNATURE: u32 = 0x4161_5252;
    /// Middle signature value.
    pub const STRUCT_SIGNATURE: u32 = 0x6141_7272;
    /// Trailing signature value.
    pub const TRAIL_SIGNATURE: u32 = 0xAA55_0000;

    #[must_use]
    /// Reads an FS Information Sector out of a raw sector buffer.
    pub fn from_sector(sector: &[u8; SECTOR_SIZE]) -> Self {
        unsafe { sector.as_ptr().cast::<Self>().read() }
    }

    #[must_use]
    #[inline]
    /// Returns the free cluster count.
    pub const fn free_clusters(&self) -> u32 {
        self.free_clusters
    }

    #[must_use]
    #[inline]
    /// Returns the allocated cluster count.
    pub const fn allocated_clusters(&self) -> u32 {
        self.allocated_clusters
    }

    #[must_use]
    #[inline]
    /// Validates the three fixed signatures.
    pub const fn validate(&self) -> bool {
        self.lead_signature == Self::LEAD_SIGNATURE
            && self.struct_signature == Self::STRUCT_SIGNATURE
            && self.trail_signature == Self::TRAIL_SIGNATURE
    }
}
