//! GUID Partition Table parsing

use crate::types::{GptHeader, GptPartitionEntry, PartitionTypeGuid};
use apfsdump_core::{Error, ReadSeek, Result};
use std::fmt;
use std::io::{Read, Seek, SeekFrom};

/// Largest entry count accepted from a header; the standard array holds 128
const MAX_PARTITION_ENTRIES: u32 = 512;

/// Largest per-entry size accepted from a header
const MAX_PARTITION_ENTRY_SIZE: usize = 4096;

/// A used partition described by the GPT
#[derive(Debug, Clone)]
pub struct Partition {
    /// Index of the entry within the table
    pub index: usize,

    /// Offset from start of device in bytes
    pub offset: u64,

    /// Length in bytes
    pub length: u64,

    /// Partition type GUID
    pub type_guid: PartitionTypeGuid,

    /// Partition name from the entry (may be empty)
    pub name: String,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Partition {} [{} @ 0x{:08X}, {} bytes]",
            self.index, self.type_guid, self.offset, self.length
        )?;
        if !self.name.is_empty() {
            write!(f, " \"{}\"", self.name)?;
        }
        Ok(())
    }
}

/// A loaded and verified GUID Partition Table
///
/// # Structure
///
/// ```text
/// LBA 0:    Protective MBR (for backward compatibility)
/// LBA 1:    Primary GPT header
/// LBA 2-33: Partition entries array (typically 128 entries)
/// LBA 34+:  Usable disk space
/// ```
#[derive(Debug, Clone)]
pub struct GptTable {
    partitions: Vec<Partition>,
    header: GptHeader,
}

impl GptTable {
    /// Parse and verify a GPT from a stream positioned at the start of the
    /// device
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is absent, the stream cannot be
    /// read, or a CRC32 check fails. Callers that treat "no valid GPT" as
    /// "unpartitioned device" handle all of these the same way.
    pub fn parse(stream: &mut dyn ReadSeek, sector_size: u32) -> Result<Self> {
        // GPT header is at LBA 1 (second sector)
        let header_offset = sector_size as u64;

        stream.seek(SeekFrom::Start(header_offset))?;

        let mut header_bytes = vec![0u8; sector_size as usize];
        stream.read_exact(&mut header_bytes)?;

        let header = GptHeader::from_bytes(&header_bytes)
            .ok_or_else(|| Error::invalid_partition_table("missing GPT header signature"))?;

        if !header.verify_header_crc32(&header_bytes) {
            return Err(Error::invalid_partition_table(
                "GPT header CRC32 verification failed",
            ));
        }

        let entries_offset = header.partition_entries_lba * sector_size as u64;
        let num_entries = header.num_partition_entries;
        let entry_size = header.partition_entry_size as usize;

        // A CRC-valid header still only describes itself; bound the entry
        // geometry before sizing any buffer from it
        if entry_size < GptPartitionEntry::ENTRY_SIZE || entry_size > MAX_PARTITION_ENTRY_SIZE {
            return Err(Error::invalid_partition_table(format!(
                "implausible GPT partition entry size {}",
                entry_size
            )));
        }
        if num_entries == 0 || num_entries > MAX_PARTITION_ENTRIES {
            return Err(Error::invalid_partition_table(format!(
                "implausible GPT partition entry count {}",
                num_entries
            )));
        }

        stream.seek(SeekFrom::Start(entries_offset))?;

        // The entries array is checksummed as a whole
        let total_entries_size = num_entries as usize * entry_size;
        let mut all_entries_bytes = vec![0u8; total_entries_size];
        stream.read_exact(&mut all_entries_bytes)?;

        if !header.verify_partition_entries_crc32(&all_entries_bytes) {
            return Err(Error::invalid_partition_table(
                "GPT partition entries CRC32 verification failed",
            ));
        }

        let mut partitions = Vec::new();

        for i in 0..num_entries {
            let entry_start = i as usize * entry_size;
            let entry_bytes = &all_entries_bytes[entry_start..entry_start + entry_size];

            let entry = GptPartitionEntry::from_bytes(entry_bytes);
            if entry.is_unused() {
                continue;
            }

            partitions.push(Partition {
                index: i as usize,
                offset: entry.first_lba * sector_size as u64,
                length: entry.size_lba() * sector_size as u64,
                type_guid: entry.partition_type_guid,
                name: entry.name,
            });
        }

        Ok(Self { partitions, header })
    }

    /// All used partitions, in table order
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// The first partition whose type GUID is APFS, in table order
    ///
    /// Only the first match is ever extracted, even when several APFS
    /// partitions exist; this mirrors the historical tool's behavior.
    pub fn find_first_apfs(&self) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.type_guid.is_apfs())
    }

    /// Get the disk GUID
    pub fn disk_guid(&self) -> &[u8; 16] {
        &self.header.disk_guid
    }

    /// Get the GPT header
    pub fn header(&self) -> &GptHeader {
        &self.header
    }
}
