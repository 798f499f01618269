//! Memory-mapped read-only stream over a disk image file

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

/// A stream backed by a read-only memory mapping.
///
/// Used for disk-image files; block devices and pipes cannot be mapped and
/// fall back to plain file I/O at the [`crate::Device`] level.
pub struct MmapStream {
    mmap: Mmap,
    position: u64,
}

impl MmapStream {
    /// Create a memory-mapped stream from an opened file
    ///
    /// # Safety
    ///
    /// Uses `unsafe` for the mapping itself. The file is validated to be a
    /// regular file first, the mapping is read-only, and the source is
    /// never written by this process. The file must not be truncated while
    /// the mapping is alive (caller responsibility).
    pub fn from_file(file: &File) -> io::Result<Self> {
        let metadata = file.metadata()?;

        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Only regular files can be memory-mapped",
            ));
        }

        // SAFETY: regular file, valid descriptor, read-only mapping
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }

    /// Get the length of the mapped region
    pub fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Check if the mapped region is empty
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Get the current position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get remaining bytes from current position
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position)
    }
}

impl Read for MmapStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining() as usize;
        if remaining == 0 {
            return Ok(0); // EOF
        }

        let to_read = buf.len().min(remaining);
        let start = self.position as usize;
        let end = start + to_read;

        buf[..to_read].copy_from_slice(&self.mmap[start..end]);
        self.position += to_read as u64;

        Ok(to_read)
    }
}

impl Seek for MmapStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => self.len() as i64 + offset,
            SeekFrom::Current(offset) => self.position as i64 + offset,
        };

        if new_pos < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Seek before beginning of file",
            ));
        }

        // Seeking past EOF is allowed (standard behavior)
        self.position = new_pos as u64;
        Ok(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn image_with_bytes(data: &[u8]) -> NamedTempFile {
        let mut tmpfile = NamedTempFile::new().unwrap();
        tmpfile.write_all(data).unwrap();
        tmpfile.flush().unwrap();
        tmpfile
    }

    #[test]
    fn test_mmap_stream_basic() {
        let data: Vec<u8> = (0..100).collect();
        let tmpfile = image_with_bytes(&data);

        let stream = MmapStream::from_file(tmpfile.as_file()).unwrap();

        assert_eq!(stream.len(), 100);
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.remaining(), 100);
        assert!(!stream.is_empty());
    }

    #[test]
    fn test_mmap_stream_read() {
        let data: Vec<u8> = (0..100).collect();
        let tmpfile = image_with_bytes(&data);

        let mut stream = MmapStream::from_file(tmpfile.as_file()).unwrap();
        let mut buf = [0u8; 10];

        let n = stream.read(&mut buf).unwrap();
        assert_eq!(n, 10);
        assert_eq!(&buf, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(stream.position(), 10);
    }

    #[test]
    fn test_mmap_stream_seek() {
        let data: Vec<u8> = (0..100).collect();
        let tmpfile = image_with_bytes(&data);

        let mut stream = MmapStream::from_file(tmpfile.as_file()).unwrap();

        stream.seek(SeekFrom::Start(50)).unwrap();
        assert_eq!(stream.position(), 50);

        let mut buf = [0u8; 5];
        stream.read(&mut buf).unwrap();
        assert_eq!(&buf, &[50, 51, 52, 53, 54]);
    }
}
