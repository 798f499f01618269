//! Bounded window into a subset of a device stream

use std::io::{self, Read, Seek, SeekFrom};

/// A `Read + Seek` view of a byte range within an underlying stream.
///
/// Used to present the located APFS container span as an independent
/// stream without copying any data.
pub struct DeviceWindow<R: Read + Seek> {
    inner: R,
    start: u64,
    length: u64,
    position: u64,
}

impl<R: Read + Seek> DeviceWindow<R> {
    /// Create a new window over `[start, start + length)` of `inner`
    ///
    /// # Errors
    ///
    /// Returns an error if seeking to the start position fails
    pub fn new(mut inner: R, start: u64, length: u64) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(start))?;

        Ok(Self {
            inner,
            start,
            length,
            position: 0,
        })
    }

    /// Get the start offset of this window within the device
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Get the length of this window
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Get the current position within this window
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get the remaining bytes from current position to end
    pub fn remaining(&self) -> u64 {
        self.length.saturating_sub(self.position)
    }
}

impl<R: Read + Seek> Read for DeviceWindow<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining() as usize;
        if remaining == 0 {
            return Ok(0); // EOF
        }

        let to_read = buf.len().min(remaining);

        let absolute_pos = self.start + self.position;
        self.inner.seek(SeekFrom::Start(absolute_pos))?;

        let bytes_read = self.inner.read(&mut buf[..to_read])?;
        self.position += bytes_read as u64;

        Ok(bytes_read)
    }
}

impl<R: Read + Seek> Seek for DeviceWindow<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => self.length as i64 + offset,
            SeekFrom::Current(offset) => self.position as i64 + offset,
        };

        if new_pos < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Seek before beginning of device window",
            ));
        }

        let new_pos = new_pos as u64;
        if new_pos > self.length {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Seek beyond end of device window",
            ));
        }

        self.position = new_pos;
        Ok(self.position)
    }
}
