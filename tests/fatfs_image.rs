//! Driver tests against a volume formatted by the `fatfs` crate, so the
//! on-disk layout comes from an independent implementation.

use std::io::{Cursor, Write};

use fat32_vol::volume::{DiskId, Partition, PartitionId};
use fat32_vol::{DeviceError, Fat32Driver, SectorRead};

const SECTOR_SIZE: usize = 512;
const IMAGE_SIZE: usize = 40 * 1024 * 1024;

struct ImageDisk {
    image: Vec<u8>,
}

impl SectorRead for ImageDisk {
    fn read_sectors(
        &mut self,
        _disk: DiskId,
        first_sector: u64,
        count: u32,
        dst: &mut [u8],
    ) -> Result<(), DeviceError> {
        let start = usize::try_from(first_sector).unwrap() * SECTOR_SIZE;
        let len = count as usize * SECTOR_SIZE;
        if start + len > self.image.len() {
            return Err(DeviceError::OutOfBounds);
        }
        dst[..len].copy_from_slice(&self.image[start..start + len]);
        Ok(())
    }
}

/// Formats a 40 MiB FAT32 image holding a root file and a populated
/// subdirectory, and returns it along with its free cluster count and
/// cluster size.
fn build_image() -> (Vec<u8>, u64) {
    let mut image = vec![0u8; IMAGE_SIZE];

    fatfs::format_volume(
        Cursor::new(&mut image[..]),
        fatfs::FormatVolumeOptions::new().fat_type(fatfs::FatType::Fat32),
    )
    .unwrap();

    let free_bytes;
    {
        let fs = fatfs::FileSystem::new(Cursor::new(&mut image[..]), fatfs::FsOptions::new())
            .unwrap();
        let root = fs.root_dir();

        root.create_file("README.TXT")
            .unwrap()
            .write_all(b"hello")
            .unwrap();
        let boot = root.create_dir("BOOT").unwrap();
        boot.create_file("KERNEL.BIN")
            .unwrap()
            .write_all(&[0xAA; 4096])
            .unwrap();

        let stats = fs.stats().unwrap();
        free_bytes = u64::from(stats.free_clusters()) * u64::from(stats.cluster_size());
        // Dropping the filesystem flushes the FS Information Sector.
    }

    (image, free_bytes)
}

fn disk() -> DiskId {
    DiskId::new(0)
}

fn partition() -> Partition {
    Partition::new(PartitionId::new(0), 0)
}

#[test]
fn test_list_formatted_volume() {
    let (image, _) = build_image();
    let driver = Fat32Driver::new(ImageDisk { image });

    let root = driver.list(disk(), &partition(), "").unwrap();

    let readme = root
        .iter()
        .find(|r| r.name() == "README.TXT")
        .expect("README.TXT in root");
    assert!(!readme.directory());
    assert_eq!(readme.size(), 5);

    let boot = root.iter().find(|r| r.name() == "BOOT").expect("BOOT in root");
    assert!(boot.directory());

    let boot_contents = driver.list(disk(), &partition(), "BOOT").unwrap();
    let kernel = boot_contents
        .iter()
        .find(|r| r.name() == "KERNEL.BIN")
        .expect("KERNEL.BIN in BOOT");
    assert!(!kernel.directory());
    assert_eq!(kernel.size(), 4096);
}

#[test]
fn test_free_bytes_matches_formatter() {
    let (image, expected) = build_image();
    let driver = Fat32Driver::new(ImageDisk { image });

    assert_eq!(driver.free_bytes(disk(), &partition()), Ok(expected));
}
