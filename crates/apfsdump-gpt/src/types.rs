//! GPT partition types and structures

use std::fmt;

/// GPT partition type GUID
///
/// Stored in on-disk byte order (mixed-endian per the UEFI spec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionTypeGuid(pub [u8; 16]);

impl PartitionTypeGuid {
    /// Unused entry
    pub const UNUSED: Self = Self([0; 16]);

    /// EFI System Partition
    pub const EFI_SYSTEM: Self = Self([
        0x28, 0x73, 0x2a, 0xc1, 0x1f, 0xf8, 0xd2, 0x11,
        0xba, 0x4b, 0x00, 0xa0, 0xc9, 0x3e, 0xc9, 0x3b,
    ]);

    /// Apple APFS (7C3457EF-0000-11AA-AA11-00306543ECAC)
    pub const APPLE_APFS: Self = Self([
        0xef, 0x57, 0x34, 0x7c, 0x00, 0x00, 0xaa, 0x11,
        0xaa, 0x11, 0x00, 0x30, 0x65, 0x43, 0xec, 0xac,
    ]);

    /// Apple HFS+
    pub const APPLE_HFS: Self = Self([
        0x00, 0x53, 0x46, 0x48, 0x00, 0x00, 0xaa, 0x11,
        0xaa, 0x11, 0x00, 0x30, 0x65, 0x43, 0xec, 0xac,
    ]);

    /// Microsoft Basic Data (FAT, NTFS, exFAT)
    pub const MICROSOFT_BASIC_DATA: Self = Self([
        0xa2, 0xa0, 0xd0, 0xeb, 0xe5, 0xb9, 0x33, 0x44,
        0x87, 0xc0, 0x68, 0xb6, 0xb7, 0x26, 0x99, 0xc7,
    ]);

    /// True if this is the Apple APFS partition type
    pub fn is_apfs(&self) -> bool {
        *self == Self::APPLE_APFS
    }

    /// Get a human-readable name for this partition type
    pub fn name(&self) -> &str {
        match *self {
            Self::UNUSED => "Unused",
            Self::EFI_SYSTEM => "EFI System",
            Self::APPLE_APFS => "Apple APFS",
            Self::APPLE_HFS => "Apple HFS+",
            Self::MICROSOFT_BASIC_DATA => "Microsoft Basic Data",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for PartitionTypeGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// GPT partition entry
///
/// Each partition entry is 128 bytes and describes one partition on the disk.
#[derive(Debug, Clone)]
pub struct GptPartitionEntry {
    /// Partition type GUID
    pub partition_type_guid: PartitionTypeGuid,
    /// Unique partition GUID
    pub unique_partition_guid: [u8; 16],
    /// First LBA (inclusive)
    pub first_lba: u64,
    /// Last LBA (inclusive)
    pub last_lba: u64,
    /// Attribute flags
    pub attributes: u64,
    /// Partition name (UTF-16LE, 72 bytes = 36 characters)
    pub name: String,
}

impl GptPartitionEntry {
    /// Size of a partition entry in bytes
    pub const ENTRY_SIZE: usize = 128;

    /// Parse a partition entry from bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= Self::ENTRY_SIZE);

        let mut partition_type_guid = [0u8; 16];
        partition_type_guid.copy_from_slice(&bytes[0..16]);
        let partition_type_guid = PartitionTypeGuid(partition_type_guid);

        let mut unique_partition_guid = [0u8; 16];
        unique_partition_guid.copy_from_slice(&bytes[16..32]);

        let first_lba = u64::from_le_bytes(bytes[32..40].try_into().unwrap());
        let last_lba = u64::from_le_bytes(bytes[40..48].try_into().unwrap());
        let attributes = u64::from_le_bytes(bytes[48..56].try_into().unwrap());

        let name = Self::parse_name(&bytes[56..128]);

        Self {
            partition_type_guid,
            unique_partition_guid,
            first_lba,
            last_lba,
            attributes,
            name,
        }
    }

    /// Check if this entry is unused
    pub fn is_unused(&self) -> bool {
        self.partition_type_guid == PartitionTypeGuid::UNUSED
    }

    /// Get the size of this partition in LBA sectors
    pub fn size_lba(&self) -> u64 {
        if self.last_lba >= self.first_lba {
            self.last_lba - self.first_lba + 1
        } else {
            0
        }
    }

    /// Parse UTF-16LE partition name from bytes
    fn parse_name(bytes: &[u8]) -> String {
        let mut utf16_chars = Vec::new();
        for chunk in bytes.chunks_exact(2) {
            let char_code = u16::from_le_bytes([chunk[0], chunk[1]]);
            if char_code == 0 {
                break; // Null terminator
            }
            utf16_chars.push(char_code);
        }

        String::from_utf16_lossy(&utf16_chars)
    }
}

/// GPT header
///
/// The GPT header contains metadata about the partition table.
#[derive(Debug, Clone)]
pub struct GptHeader {
    /// Header signature ("EFI PART")
    pub signature: [u8; 8],
    /// GPT revision (usually 0x00010000)
    pub revision: u32,
    /// Header size in bytes (usually 92)
    pub header_size: u32,
    /// CRC32 checksum of header
    pub header_crc32: u32,
    /// Current LBA (location of this header)
    pub current_lba: u64,
    /// Backup LBA (location of backup header)
    pub backup_lba: u64,
    /// First usable LBA for partitions
    pub first_usable_lba: u64,
    /// Last usable LBA for partitions
    pub last_usable_lba: u64,
    /// Disk GUID
    pub disk_guid: [u8; 16],
    /// Starting LBA of partition entries
    pub partition_entries_lba: u64,
    /// Number of partition entries
    pub num_partition_entries: u32,
    /// Size of each partition entry
    pub partition_entry_size: u32,
    /// CRC32 of partition entries array
    pub partition_entries_crc32: u32,
}

impl GptHeader {
    /// GPT header signature
    pub const SIGNATURE: &'static [u8; 8] = b"EFI PART";

    /// Typical GPT header size
    pub const HEADER_SIZE: usize = 92;

    /// Parse GPT header from bytes, or `None` if the signature is absent
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::HEADER_SIZE {
            return None;
        }

        let mut signature = [0u8; 8];
        signature.copy_from_slice(&bytes[0..8]);

        if &signature != Self::SIGNATURE {
            return None;
        }

        let revision = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
        let header_size = u32::from_le_bytes(bytes[12..16].try_into().unwrap());
        let header_crc32 = u32::from_le_bytes(bytes[16..20].try_into().unwrap());
        let current_lba = u64::from_le_bytes(bytes[24..32].try_into().unwrap());
        let backup_lba = u64::from_le_bytes(bytes[32..40].try_into().unwrap());
        let first_usable_lba = u64::from_le_bytes(bytes[40..48].try_into().unwrap());
        let last_usable_lba = u64::from_le_bytes(bytes[48..56].try_into().unwrap());

        let mut disk_guid = [0u8; 16];
        disk_guid.copy_from_slice(&bytes[56..72]);

        let partition_entries_lba = u64::from_le_bytes(bytes[72..80].try_into().unwrap());
        let num_partition_entries = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        let partition_entry_size = u32::from_le_bytes(bytes[84..88].try_into().unwrap());
        let partition_entries_crc32 = u32::from_le_bytes(bytes[88..92].try_into().unwrap());

        Some(Self {
            signature,
            revision,
            header_size,
            header_crc32,
            current_lba,
            backup_lba,
            first_usable_lba,
            last_usable_lba,
            disk_guid,
            partition_entries_lba,
            num_partition_entries,
            partition_entry_size,
            partition_entries_crc32,
        })
    }

    /// Verify the header CRC32 checksum
    ///
    /// The checksum covers the header with its own CRC32 field zeroed.
    pub fn verify_header_crc32(&self, header_bytes: &[u8]) -> bool {
        if header_bytes.len() < self.header_size as usize {
            return false;
        }

        let mut header_for_crc = header_bytes[..self.header_size as usize].to_vec();
        header_for_crc[16..20].fill(0);

        crc32fast::hash(&header_for_crc) == self.header_crc32
    }

    /// Verify the partition entries array CRC32 checksum
    pub fn verify_partition_entries_crc32(&self, partition_entries_bytes: &[u8]) -> bool {
        let expected_size =
            self.num_partition_entries as usize * self.partition_entry_size as usize;

        if partition_entries_bytes.len() < expected_size {
            return false;
        }

        crc32fast::hash(&partition_entries_bytes[..expected_size]) == self.partition_entries_crc32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_type_guid_names() {
        assert_eq!(PartitionTypeGuid::UNUSED.name(), "Unused");
        assert_eq!(PartitionTypeGuid::APPLE_APFS.name(), "Apple APFS");
        assert_eq!(PartitionTypeGuid::EFI_SYSTEM.name(), "EFI System");
    }

    #[test]
    fn test_apfs_guid_detection() {
        assert!(PartitionTypeGuid::APPLE_APFS.is_apfs());
        assert!(!PartitionTypeGuid::APPLE_HFS.is_apfs());
        assert!(!PartitionTypeGuid::UNUSED.is_apfs());
    }

    #[test]
    fn test_partition_entry_is_unused() {
        let mut entry_bytes = vec![0u8; GptPartitionEntry::ENTRY_SIZE];
        let entry = GptPartitionEntry::from_bytes(&entry_bytes);
        assert!(entry.is_unused());

        entry_bytes[0] = 0x01;
        let entry = GptPartitionEntry::from_bytes(&entry_bytes);
        assert!(!entry.is_unused());
    }

    #[test]
    fn test_partition_entry_size_lba() {
        let mut entry_bytes = vec![0u8; GptPartitionEntry::ENTRY_SIZE];

        // first_lba = 100, last_lba = 199 (100 sectors)
        entry_bytes[32..40].copy_from_slice(&100u64.to_le_bytes());
        entry_bytes[40..48].copy_from_slice(&199u64.to_le_bytes());

        let entry = GptPartitionEntry::from_bytes(&entry_bytes);
        assert_eq!(entry.size_lba(), 100);
    }

    #[test]
    fn test_gpt_header_signature_validation() {
        let mut header_bytes = vec![0u8; GptHeader::HEADER_SIZE];

        assert!(GptHeader::from_bytes(&header_bytes).is_none());

        header_bytes[0..8].copy_from_slice(b"EFI PART");
        assert!(GptHeader::from_bytes(&header_bytes).is_some());
    }
}
