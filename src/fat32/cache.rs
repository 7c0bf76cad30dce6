//! Single-slot volume metadata cache.
//!
//! The cache owns the parsed boot sector and FS Information Sector for
//! exactly one volume identity at a time. A request for a different
//! identity replaces the slot; a request for the cached identity replays
//! the stored outcome without touching the disk, including a stored
//! failure, so a permanently broken volume is not re-fetched on every call.
use super::SECTOR_SIZE;
use super::bs::{BootSector, FsInfo};
use crate::volume::{DiskId, Partition, VolumeId};
use crate::SectorRead;
use thiserror::Error;

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
/// An error that can occur while fetching volume metadata.
pub enum FetchError {
    #[error("Boot sector unreadable")]
    BootSectorUnreadable,
    #[error("FS Information Sector unreadable")]
    InfoSectorUnreadable,
    #[error("Invalid signature")]
    InvalidSignature,
}

/// Parsed metadata of one volume, valid only for the identity it was
/// fetched under.
///
/// Owned by [`MetadataCache`]; consumers borrow it for the duration of one
/// operation. The two sectors carry independent outcomes: a volume with a
/// valid boot sector but an unreadable FS Information Sector can still be
/// listed, while free-space queries fail.
#[derive(Debug, Clone)]
pub struct VolumeMetadata {
    id: VolumeId,
    boot: Result<BootSector, FetchError>,
    info: Result<FsInfo, FetchError>,
}

impl VolumeMetadata {
    #[must_use]
    #[inline]
    /// Returns the identity this metadata was fetched under.
    pub const fn id(&self) -> VolumeId {
        self.id
    }

    #[inline]
    /// Returns the boot sector, or the failure recorded while fetching it.
    ///
    /// ## Errors
    ///
    /// Replays [`FetchError::BootSectorUnreadable`] or
    /// [`FetchError::InvalidSignature`] from the fetch.
    pub fn boot(&self) -> Result<&BootSector, FetchError> {
        self.boot.as_ref().map_err(|&e| e)
    }

    #[inline]
    /// Returns the FS Information Sector, or the failure recorded while
    /// fetching it.
    ///
    /// ## Errors
    ///
    /// Replays the fetch failure; additionally fails with the boot sector's
    /// own error when the boot sector never parsed.
    pub fn fs_info(&self) -> Result<&FsInfo, FetchError> {
        self.info.as_ref().map_err(|&e| e)
    }
}

/// Single-slot metadata cache keyed by [`VolumeId`].
#[derive(Debug, Default)]
pub struct MetadataCache {
    slot: Option<VolumeMetadata>,
}

impl MetadataCache {
    #[must_use]
    #[inline]
    /// Creates an empty cache.
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Returns fresh metadata for the requested volume identity.
    ///
    /// A cache hit performs no I/O. A miss reads the boot sector at the
    /// partition start and, when that parses and validates, the FS
    /// Information Sector it points at. The slot identity is updated
    /// unconditionally once a fetch was attempted, whatever its outcome.
    pub fn ensure_fresh<D: SectorRead>(
        &mut self,
        device: &mut D,
        disk: DiskId,
        partition: &Partition,
    ) -> &VolumeMetadata {
        let id = VolumeId::new(disk, partition.id());

        match self.slot {
            Some(ref cached) if cached.id() == id => {}
            _ => {
                self.slot = Some(Self::fetch(device, disk, partition, id));
            }
        }
        self.slot.as_ref().expect("slot populated above")
    }

    fn fetch<D: SectorRead>(
        device: &mut D,
        disk: DiskId,
        partition: &Partition,
        id: VolumeId,
    ) -> VolumeMetadata {
        let mut sector = [0u8; SECTOR_SIZE];

        if device
            .read_sectors(disk, partition.first_sector(), 1, &mut sector)
            .is_err()
        {
            log::warn!("fat32: boot sector unreadable for {id:?}");
            return VolumeMetadata {
                id,
                boot: Err(FetchError::BootSectorUnreadable),
                info: Err(FetchError::BootSectorUnreadable),
            };
        }

        let boot = BootSector::from_sector(&sector);
        if !boot.validate() {
            log::warn!("fat32: boot sector failed validation for {id:?}, not a FAT32 volume?");
            return VolumeMetadata {
                id,
                boot: Err(FetchError::InvalidSignature),
                info: Err(FetchError::InvalidSignature),
            };
        }

        let info_sector = partition.first_sector() + u64::from(boot.fs_info_sector());
        let info = if device
            .read_sectors(disk, info_sector, 1, &mut sector)
            .is_err()
        {
            log::warn!("fat32: FS Information Sector unreadable for {id:?}");
            Err(FetchError::InfoSectorUnreadable)
        } else {
            let info = FsInfo::from_sector(&sector);
            if info.validate() {
                Ok(info)
            } else {
                log::warn!("fat32: FS Information Sector failed validation for {id:?}");
                Err(FetchError::InvalidSignature)
            }
        };

        log::debug!("fat32: cached metadata for {id:?}");
        VolumeMetadata {
            id,
            boot: Ok(boot),
            info,
        }
    }
}
