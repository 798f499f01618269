//! Synthetic GPT disk images for tests

use crate::types::PartitionTypeGuid;

const SECTOR_SIZE: usize = 512;
const NUM_ENTRIES: usize = 128;
const ENTRY_SIZE: usize = 128;

/// Build a minimal valid GPT disk image with the given partitions
///
/// Each partition is `(type_guid, first_lba, last_lba, name)`. Header and
/// entry-array CRC32s are computed so the image passes verification.
pub fn gpt_disk_with_partitions(parts: &[(PartitionTypeGuid, u64, u64, &str)]) -> Vec<u8> {
    let total_sectors = 1000;
    let mut disk = vec![0u8; total_sectors * SECTOR_SIZE];

    // LBA 1: GPT header
    let header_offset = SECTOR_SIZE;
    disk[header_offset..header_offset + 8].copy_from_slice(b"EFI PART");

    // Revision 1.0
    disk[header_offset + 8..header_offset + 12].copy_from_slice(&0x00010000u32.to_le_bytes());

    // Header size (92 bytes)
    disk[header_offset + 12..header_offset + 16].copy_from_slice(&92u32.to_le_bytes());

    // Current LBA (1), backup LBA (999)
    disk[header_offset + 24..header_offset + 32].copy_from_slice(&1u64.to_le_bytes());
    disk[header_offset + 32..header_offset + 40].copy_from_slice(&999u64.to_le_bytes());

    // First/last usable LBA
    disk[header_offset + 40..header_offset + 48].copy_from_slice(&34u64.to_le_bytes());
    disk[header_offset + 48..header_offset + 56].copy_from_slice(&966u64.to_le_bytes());

    // Disk GUID
    let disk_guid = [
        0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0,
        0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0,
    ];
    disk[header_offset + 56..header_offset + 72].copy_from_slice(&disk_guid);

    // Partition entries LBA (2), count, entry size
    disk[header_offset + 72..header_offset + 80].copy_from_slice(&2u64.to_le_bytes());
    disk[header_offset + 80..header_offset + 84]
        .copy_from_slice(&(NUM_ENTRIES as u32).to_le_bytes());
    disk[header_offset + 84..header_offset + 88]
        .copy_from_slice(&(ENTRY_SIZE as u32).to_le_bytes());

    // LBA 2+: partition entries
    let entries_offset = 2 * SECTOR_SIZE;
    for (i, (type_guid, first_lba, last_lba, name)) in parts.iter().enumerate() {
        let entry_offset = entries_offset + i * ENTRY_SIZE;

        disk[entry_offset..entry_offset + 16].copy_from_slice(&type_guid.0);

        // Unique partition GUID: index-derived, just needs to be non-zero
        disk[entry_offset + 16] = i as u8 + 1;

        disk[entry_offset + 32..entry_offset + 40].copy_from_slice(&first_lba.to_le_bytes());
        disk[entry_offset + 40..entry_offset + 48].copy_from_slice(&last_lba.to_le_bytes());

        // Partition name (UTF-16LE)
        for (j, code) in name.encode_utf16().enumerate() {
            let bytes = code.to_le_bytes();
            disk[entry_offset + 56 + j * 2] = bytes[0];
            disk[entry_offset + 56 + j * 2 + 1] = bytes[1];
        }
    }

    // Entry-array CRC32
    let entries_size = NUM_ENTRIES * ENTRY_SIZE;
    let entries_crc = crc32fast::hash(&disk[entries_offset..entries_offset + entries_size]);
    disk[header_offset + 88..header_offset + 92].copy_from_slice(&entries_crc.to_le_bytes());

    // Header CRC32 (computed with the CRC32 field zeroed)
    let mut header_for_crc = disk[header_offset..header_offset + 92].to_vec();
    header_for_crc[16..20].fill(0);
    let header_crc = crc32fast::hash(&header_for_crc);
    disk[header_offset + 16..header_offset + 20].copy_from_slice(&header_crc.to_le_bytes());

    disk
}
