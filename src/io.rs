//! Seekable byte sources the decoder can be bound to.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// A seekable input stream.
///
/// Positions are absolute byte offsets from the start of the stream.
pub trait Source {
    fn position(&self) -> u64;

    fn seek_abs(&mut self, position: u64) -> io::Result<()>;

    /// Appends everything from the current position to the end of the stream to `buf`,
    /// returning the number of bytes read.
    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;
}

/// Source reading from a borrowed memory region.
#[derive(Debug, Clone)]
pub struct MemoryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> MemoryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.data.len()
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }
}

impl Source for MemoryReader<'_> {
    fn position(&self) -> u64 {
        self.position as u64
    }

    fn seek_abs(&mut self, position: u64) -> io::Result<()> {
        if position > self.data.len() as u64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("seek to {} beyond end of {} byte buffer", position, self.data.len()),
            ));
        }
        self.position = position as usize;
        Ok(())
    }

    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let remaining = self.remaining();
        buf.extend_from_slice(remaining);
        self.position = self.data.len();
        Ok(remaining.len())
    }
}

/// Source reading from a file on disk.
#[derive(Debug)]
pub struct FileReader {
    file: File,
    position: u64,
}

impl FileReader {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::from_file(File::open(path)?)
    }

    pub fn from_file(mut file: File) -> io::Result<Self> {
        let position = file.stream_position()?;
        Ok(Self { file, position })
    }
}

impl Source for FileReader {
    fn position(&self) -> u64 {
        self.position
    }

    fn seek_abs(&mut self, position: u64) -> io::Result<()> {
        self.position = self.file.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let count = Read::read_to_end(&mut self.file, buf)?;
        self.position += count as u64;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_memory_reader_seek_and_read() -> io::Result<()> {
        let data = [1u8, 2, 3, 4, 5];
        let mut reader = MemoryReader::new(&data);
        reader.seek_abs(2)?;
        assert_eq!(reader.position(), 2);

        let mut buf = Vec::new();
        assert_eq!(reader.read_to_end(&mut buf)?, 3);
        assert_eq!(buf, [3, 4, 5]);
        assert!(reader.is_eof());

        assert!(reader.seek_abs(6).is_err());
        reader.seek_abs(5)?;
        Ok(())
    }

    #[test]
    fn test_file_reader_tracks_position() -> io::Result<()> {
        let mut file = tempfile::tempfile()?;
        file.write_all(&[9, 8, 7, 6])?;
        file.seek(SeekFrom::Start(1))?;

        let mut reader = FileReader::from_file(file)?;
        assert_eq!(reader.position(), 1);

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        assert_eq!(buf, [8, 7, 6]);
        assert_eq!(reader.position(), 4);

        reader.seek_abs(0)?;
        assert_eq!(reader.position(), 0);
        Ok(())
    }
}
