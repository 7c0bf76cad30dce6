//! Volume identities and partition descriptors.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Opaque identifier of a physical disk.
pub struct DiskId(u64);

impl DiskId {
    #[must_use]
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Opaque identifier of a partition on a disk.
pub struct PartitionId(u64);

impl PartitionId {
    #[must_use]
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The (disk, partition) pair identifying one volume.
///
/// Used solely as the key for metadata-cache freshness.
pub struct VolumeId {
    disk: DiskId,
    partition: PartitionId,
}

impl VolumeId {
    #[must_use]
    #[inline]
    pub const fn new(disk: DiskId, partition: PartitionId) -> Self {
        Self { disk, partition }
    }

    #[must_use]
    #[inline]
    pub const fn disk(&self) -> DiskId {
        self.disk
    }

    #[must_use]
    #[inline]
    pub const fn partition(&self) -> PartitionId {
        self.partition
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A partition's identity and its first absolute sector.
///
/// Supplied by the caller on every operation and never stored beyond it.
pub struct Partition {
    id: PartitionId,
    first_sector: u64,
}

impl Partition {
    #[must_use]
    #[inline]
    pub const fn new(id: PartitionId, first_sector: u64) -> Self {
        Self { id, first_sector }
    }

    #[must_use]
    #[inline]
    pub const fn id(&self) -> PartitionId {
        self.id
    }

    #[must_use]
    #[inline]
    pub const fn first_sector(&self) -> u64 {
        self.first_sector
    }
}
