//! Directory entry codec.
//!
//! Decodes raw 32-byte directory records into a tagged classification, so
//! the sentinel byte values (end marker, deleted marker, long-name
//! attribute) are tested in exactly one place.
use crate::static_assert;

use super::Cluster;
use alloc::string::String;

/// Size of a directory entry in bytes (always 32 bytes).
pub const DIR_ENTRY_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Directory entry attributes.
pub struct Attributes(u8);

impl Attributes {
    /// Hidden attribute.
    pub const HIDDEN: u8 = 0x01;
    /// System attribute.
    pub const SYSTEM: u8 = 0x02;
    /// Directory attribute.
    pub const DIRECTORY: u8 = 0x10;
    /// Long file name marker (the whole attribute byte).
    pub const LONG_NAME: u8 = 0x0F;

    #[must_use]
    #[inline]
    /// Creates a new attribute set.
    pub const fn new(attributes: u8) -> Self {
        Self(attributes)
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is hidden.
    pub const fn is_hidden(&self) -> bool {
        self.0 & Self::HIDDEN != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a system file.
    pub const fn is_system(&self) -> bool {
        self.0 & Self::SYSTEM != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a directory.
    pub const fn is_directory(&self) -> bool {
        self.0 & Self::DIRECTORY != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a long file name fragment.
    pub const fn is_long_name(&self) -> bool {
        self.0 == Self::LONG_NAME
    }
}

/// FAT directory entry.
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct DirEntry {
    /// Filename (8 bytes).
    name: [u8; 8],
    /// Extension (3 bytes).
    ext: [u8; 3],
    /// File attributes.
    attr: u8,
    /// Reserved for Windows NT.
    nt_res: u8,
    /// Creation time, tenths of a second.
    creation_time_tenths: u8,
    /// Creation time.
    creation_time: u16,
    /// Creation date.
    creation_date: u16,
    /// Last access date.
    last_access_date: u16,
    /// High word of the first cluster number.
    first_cluster_high: u16,
    /// Last modification time.
    write_time: u16,
    /// Last modification date.
    write_date: u16,
    /// Low word of the first cluster number.
    first_cluster_low: u16,
    /// File size in bytes.
    file_size: u32,
}
static_assert!(
    size_of::<DirEntry>() == DIR_ENTRY_SIZE,
    "DirEntry size is not 32 bytes"
);

impl DirEntry {
    /// Deleted entry marker (first byte).
    pub const DELETED_ENTRY: u8 = 0xE5;
    /// End of directory marker (first byte).
    pub const END_OF_ENTRIES: u8 = 0x00;

    #[must_use]
    #[inline]
    /// Returns the file attributes.
    pub const fn attributes(&self) -> Attributes {
        Attributes::new(self.attr)
    }

    #[must_use]
    #[inline]
    /// Returns the first cluster number, reconstructed from its two halves.
    pub const fn first_cluster(&self) -> Cluster {
        Cluster::new((self.first_cluster_high as u32) << 16 | self.first_cluster_low as u32)
    }

    #[must_use]
    #[inline]
    /// Returns the file size in bytes.
    pub const fn file_size(&self) -> u32 {
        self.file_size
    }

    #[must_use]
    /// Returns the 8.3 name with trailing space padding trimmed, the
    /// extension joined with a dot when present.
    pub fn short_name(&self) -> String {
        let base_len = self.name.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
        let ext_len = self.ext.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);

        let mut name = String::with_capacity(base_len + 1 + ext_len);
        for &b in &self.name[..base_len] {
            name.push(char::from(b));
        }
        if ext_len > 0 {
            name.push('.');
            for &b in &self.ext[..ext_len] {
                name.push(char::from(b));
            }
        }
        name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A decoded file or subdirectory, the only entity handed to the VFS.
pub struct FileRecord {
    name: String,
    hidden: bool,
    system: bool,
    directory: bool,
    size: u32,
    first_cluster: Cluster,
}

impl FileRecord {
    #[must_use]
    #[inline]
    /// Returns the decoded name.
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is hidden.
    pub const fn hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a system file.
    pub const fn system(&self) -> bool {
        self.system
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a subdirectory.
    pub const fn directory(&self) -> bool {
        self.directory
    }

    #[must_use]
    #[inline]
    /// Returns the file size in bytes.
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    #[inline]
    /// Returns the first cluster of the entry's data.
    pub const fn first_cluster(&self) -> Cluster {
        self.first_cluster
    }
}

impl From<&DirEntry> for FileRecord {
    fn from(entry: &DirEntry) -> Self {
        let attributes = entry.attributes();
        Self {
            name: entry.short_name(),
            hidden: attributes.is_hidden(),
            system: attributes.is_system(),
            directory: attributes.is_directory(),
            size: entry.file_size(),
            first_cluster: entry.first_cluster(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Classification of one raw directory record.
pub enum EntryKind {
    /// First byte 0x00: no further entries in this directory.
    EndOfDirectory,
    /// First byte 0xE5: deleted, skip and keep scanning.
    Deleted,
    /// Attribute byte 0x0F: part of a long file name, skipped.
    LongNameFragment,
    /// A live short-name entry.
    Short(FileRecord),
}

#[must_use]
/// Classifies a raw 32-byte directory record.
///
/// Total over all inputs: the sentinel first-byte values win over every
/// other field, then the long-name attribute, then a decoded short entry.
pub fn decode(raw: &[u8; DIR_ENTRY_SIZE]) -> EntryKind {
    match raw[0] {
        DirEntry::END_OF_ENTRIES => return EntryKind::EndOfDirectory,
        DirEntry::DELETED_ENTRY => return EntryKind::Deleted,
        _ => {}
    }

    // `repr(packed)` makes the alignment 1, so a plain read is fine.
    let entry = unsafe { raw.as_ptr().cast::<DirEntry>().read() };

    if entry.attributes().is_long_name() {
        EntryKind::LongNameFragment
    } else {
        EntryKind::Short(FileRecord::from(&entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_entry(name: &[u8; 8], ext: &[u8; 3], attr: u8, cluster: u32, size: u32) -> [u8; 32] {
        let mut raw = [0u8; 32];
        raw[..8].copy_from_slice(name);
        raw[8..11].copy_from_slice(ext);
        raw[11] = attr;
        raw[20..22].copy_from_slice(&(((cluster >> 16) & 0xFFFF) as u16).to_le_bytes());
        raw[26..28].copy_from_slice(&((cluster & 0xFFFF) as u16).to_le_bytes());
        raw[28..32].copy_from_slice(&size.to_le_bytes());
        raw
    }

    #[test]
    fn test_end_marker_wins_over_remaining_bytes() {
        let mut raw = [0xFFu8; 32];
        raw[0] = 0x00;
        assert_eq!(decode(&raw), EntryKind::EndOfDirectory);
    }

    #[test]
    fn test_deleted_marker() {
        let mut raw = raw_entry(b"GONE    ", b"TXT", 0, 5, 10);
        raw[0] = 0xE5;
        assert_eq!(decode(&raw), EntryKind::Deleted);
    }

    #[test]
    fn test_long_name_fragment() {
        let raw = raw_entry(b"\x41AAAAAAA", b"AAA", Attributes::LONG_NAME, 0, 0);
        assert_eq!(decode(&raw), EntryKind::LongNameFragment);
    }

    #[test]
    fn test_short_entry_decoding() {
        let raw = raw_entry(b"REPORT  ", b"TXT", 0, 0x0005_0002, 1234);
        let EntryKind::Short(record) = decode(&raw) else {
            panic!("expected a short entry");
        };

        assert_eq!(record.name(), "REPORT.TXT");
        assert_eq!(record.size(), 1234);
        assert_eq!(record.first_cluster(), Cluster::new(0x0005_0002));
        assert!(!record.hidden());
        assert!(!record.system());
        assert!(!record.directory());
    }

    #[test]
    fn test_name_without_extension() {
        let raw = raw_entry(b"KERNEL  ", b"   ", 0, 2, 0);
        let EntryKind::Short(record) = decode(&raw) else {
            panic!("expected a short entry");
        };
        assert_eq!(record.name(), "KERNEL");
    }

    #[test]
    fn test_attribute_flags() {
        let attr = Attributes::HIDDEN | Attributes::SYSTEM | Attributes::DIRECTORY;
        let raw = raw_entry(b"SYSDIR  ", b"   ", attr, 9, 0);
        let EntryKind::Short(record) = decode(&raw) else {
            panic!("expected a short entry");
        };

        assert!(record.hidden());
        assert!(record.system());
        assert!(record.directory());
    }

    #[test]
    fn test_attributes() {
        let attr = Attributes::new(Attributes::HIDDEN | Attributes::DIRECTORY);
        assert!(attr.is_hidden());
        assert!(!attr.is_system());
        assert!(attr.is_directory());
        assert!(!attr.is_long_name());

        // Directory bit alongside long-name bits is not a long-name record.
        assert!(!Attributes::new(0x1F).is_long_name());
        assert!(Attributes::new(0x0F).is_long_name());
    }

    #[test]
    fn test_cluster_halves_reconstruction() {
        let raw = raw_entry(b"BIG     ", b"BIN", 0, 0xABCD_1234, 1);
        let EntryKind::Short(record) = decode(&raw) else {
            panic!("expected a short entry");
        };
        assert_eq!(record.first_cluster().value(), 0xABCD_1234);
    }
}
