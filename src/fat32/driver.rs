//! Path resolution, directory listing and free-space reporting.
use super::cache::{FetchError, MetadataCache};
use super::dirent::{self, DIR_ENTRY_SIZE, EntryKind, FileRecord};
use super::bs::BootSector;
use super::{Cluster, FAT_ENTRY_SIZE};
use crate::volume::{DiskId, Partition};
use crate::SectorRead;
use alloc::vec;
use alloc::vec::Vec;
use spin::Mutex;
use thiserror::Error;

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
/// An error that can occur while listing a directory.
pub enum ListError {
    #[error("Volume metadata unavailable: {0}")]
    VolumeUnavailable(#[from] FetchError),
    #[error("I/O error")]
    IoFailure,
    #[error("Not found")]
    NotFound,
}

#[must_use]
/// Maps a cluster number to its first absolute sector.
///
/// Pure geometry: the data region starts after the reserved sectors and the
/// FAT copies, and cluster 2 is its first cluster.
///
/// ## Panics
///
/// Clusters 0 and 1 never map to data; passing one is a caller bug and
/// panics in debug builds.
pub fn cluster_to_sector(boot: &BootSector, partition_start: u64, cluster: Cluster) -> u64 {
    debug_assert!(
        cluster.value() >= Cluster::FIRST_DATA,
        "clusters 0 and 1 never map to the data region"
    );

    let fat_region = partition_start + u64::from(boot.reserved_sectors());
    let data_region = fat_region + u64::from(boot.fat_count()) * u64::from(boot.sectors_per_fat());

    data_region + u64::from(cluster.value() - Cluster::FIRST_DATA) * u64::from(boot.sectors_per_cluster())
}

/// Read-path FAT32 driver.
///
/// Owns the sector source and the metadata cache behind one lock, so the
/// cache's read-check-fetch-write sequence is serialized even when the
/// driver is entered from multiple kernel contexts.
pub struct Fat32Driver<D: SectorRead> {
    inner: Mutex<Inner<D>>,
}

struct Inner<D> {
    device: D,
    cache: MetadataCache,
}

impl<D: SectorRead> Fat32Driver<D> {
    #[must_use]
    #[inline]
    /// Creates a driver on top of the given sector source.
    pub const fn new(device: D) -> Self {
        Self {
            inner: Mutex::new(Inner {
                device,
                cache: MetadataCache::new(),
            }),
        }
    }

    /// Lists the directory at `path` on the given volume.
    ///
    /// An empty path lists the root directory. A single-segment path is
    /// matched (ASCII case-insensitively) against the root entries and must
    /// name a subdirectory, whose contents are then returned. Records come
    /// back in on-disk order.
    ///
    /// ## Errors
    ///
    /// Fails with [`ListError::VolumeUnavailable`] when the boot sector
    /// could not be fetched, [`ListError::IoFailure`] on a failed cluster
    /// read, and [`ListError::NotFound`] when the path segment does not
    /// name a subdirectory.
    pub fn list(
        &self,
        disk: DiskId,
        partition: &Partition,
        path: &str,
    ) -> Result<Vec<FileRecord>, ListError> {
        let mut guard = self.inner.lock();
        let Inner { device, cache } = &mut *guard;

        let metadata = cache.ensure_fresh(&mut *device, disk, partition);
        let boot = *metadata.boot()?;

        let root = read_directory(
            &mut *device,
            disk,
            &boot,
            partition.first_sector(),
            boot.root_cluster(),
        )?;
        if path.is_empty() {
            return Ok(root);
        }

        for record in &root {
            if record.directory() && record.name().eq_ignore_ascii_case(path) {
                return read_directory(
                    &mut *device,
                    disk,
                    &boot,
                    partition.first_sector(),
                    record.first_cluster(),
                );
            }
        }

        Err(ListError::NotFound)
    }

    /// Reports the free space of the given volume in bytes.
    ///
    /// ## Errors
    ///
    /// Requires both metadata sectors; replays the fetch failure otherwise.
    pub fn free_bytes(&self, disk: DiskId, partition: &Partition) -> Result<u64, FetchError> {
        let mut guard = self.inner.lock();
        let Inner { device, cache } = &mut *guard;

        let metadata = cache.ensure_fresh(&mut *device, disk, partition);
        let boot = metadata.boot()?;
        let info = metadata.fs_info()?;

        Ok(u64::from(info.free_clusters())
            * u64::from(boot.sectors_per_cluster())
            * u64::from(boot.bytes_per_sector()))
    }
}

/// Decodes the directory starting at `first_cluster`, walking its FAT chain.
///
/// Scanning stops at the end-of-directory sentinel, so stale records past a
/// shrunk directory are never surfaced. The walk is bounded by the FAT
/// entry count, so a corrupted cyclic chain terminates.
fn read_directory<D: SectorRead>(
    device: &mut D,
    disk: DiskId,
    boot: &BootSector,
    partition_start: u64,
    first_cluster: Cluster,
) -> Result<Vec<FileRecord>, ListError> {
    let sectors_per_cluster = u32::from(boot.sectors_per_cluster());
    let cluster_bytes = boot.bytes_per_cluster() as usize;

    let mut records = Vec::new();
    let mut buffer = vec![0u8; cluster_bytes];

    let fat_entries = boot.sectors_per_fat() * (u32::from(boot.bytes_per_sector()) / FAT_ENTRY_SIZE);
    let mut walked = 0u32;

    let mut cluster = first_cluster;
    while cluster.is_valid() && walked < fat_entries {
        walked += 1;

        let sector = cluster_to_sector(boot, partition_start, cluster);
        device
            .read_sectors(disk, sector, sectors_per_cluster, &mut buffer)
            .map_err(|_| ListError::IoFailure)?;

        for raw in buffer.chunks_exact(DIR_ENTRY_SIZE) {
            match dirent::decode(raw.try_into().unwrap()) {
                EntryKind::EndOfDirectory => return Ok(records),
                EntryKind::Deleted | EntryKind::LongNameFragment => {}
                EntryKind::Short(record) => records.push(record),
            }
        }

        cluster = next_cluster(device, disk, boot, partition_start, cluster)?;
    }

    Ok(records)
}

/// Reads the FAT entry of `cluster` and returns the chain's next cluster.
fn next_cluster<D: SectorRead>(
    device: &mut D,
    disk: DiskId,
    boot: &BootSector,
    partition_start: u64,
    cluster: Cluster,
) -> Result<Cluster, ListError> {
    let bytes_per_sector = u64::from(boot.bytes_per_sector());
    let offset = u64::from(cluster.value()) * u64::from(FAT_ENTRY_SIZE);

    let sector = partition_start + u64::from(boot.reserved_sectors()) + offset / bytes_per_sector;
    let byte = usize::try_from(offset % bytes_per_sector).unwrap();

    let mut buffer = vec![0u8; usize::from(boot.bytes_per_sector())];
    device
        .read_sectors(disk, sector, 1, &mut buffer)
        .map_err(|_| ListError::IoFailure)?;

    let raw = u32::from_le_bytes(buffer[byte..byte + 4].try_into().unwrap());
    Ok(Cluster::new(raw & Cluster::MASK))
}
