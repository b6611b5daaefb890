use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::db::Database;
use crate::error::DisasmError;

/// Seekable byte window over `[start, end)` of the database.
///
/// Reads fill unloaded bytes with zero. Writes patch the host database and
/// fail when they touch unloaded bytes. Positions are relative to `start`;
/// reads and writes never cross `end`.
#[derive(Debug, Clone)]
pub struct Memory<'a> {
    db: &'a Database,
    start: u64,
    end: u64,
    pos: u64,
}

impl<'a> Memory<'a> {
    pub(crate) fn new(db: &'a Database, start: u64, end: u64) -> Self {
        Self { db, start, end, pos: 0 }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Current offset from `start`.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Address the next read or write starts at.
    pub fn address(&self) -> u64 {
        self.start.saturating_add(self.pos)
    }

    fn remaining(&self) -> usize {
        usize::try_from(self.len().saturating_sub(self.pos)).unwrap_or(usize::MAX)
    }
}

fn to_io_error(err: DisasmError) -> io::Error {
    let kind = if err.is_not_found() { io::ErrorKind::NotFound } else { io::ErrorKind::Other };
    io::Error::new(kind, err)
}

impl Read for Memory<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        if n == 0 {
            return Ok(0);
        }
        let data = self.db.get_bytes(self.address(), n, Some(0)).map_err(to_io_error)?;
        buf[..n].copy_from_slice(&data);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Write for Memory<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        if n == 0 {
            return Ok(0);
        }
        self.db.write_bytes(self.address(), &buf[..n]).map_err(to_io_error)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for Memory<'_> {
    fn seek(&mut self, target: SeekFrom) -> io::Result<u64> {
        let (base, offset) = match target {
            SeekFrom::Start(offset) => {
                self.pos = offset;
                return Ok(offset);
            }
            SeekFrom::End(offset) => (self.len(), offset),
            SeekFrom::Current(offset) => (self.pos, offset),
        };
        match base.checked_add_signed(offset) {
            Some(pos) => {
                self.pos = pos;
                Ok(pos)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}
