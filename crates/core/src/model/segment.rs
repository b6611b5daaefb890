use serde::{Deserialize, Serialize};

use crate::backends::SegmentRecord;
use crate::db::Database;
use crate::error::DisasmResult;
use crate::model::Function;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

/// Named, bounded region of the address space.
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    db: &'a Database,
    record: SegmentRecord,
}

impl<'a> Segment<'a> {
    pub(crate) fn new(db: &'a Database, record: SegmentRecord) -> Self {
        Self { db, record }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn start(&self) -> u64 {
        self.record.start
    }

    /// Exclusive end address.
    pub fn end(&self) -> u64 {
        self.record.end
    }

    pub fn size(&self) -> usize {
        (self.record.end - self.record.start) as usize
    }

    pub fn bit_size(&self) -> u32 {
        self.record.bitness
    }

    pub fn permissions(&self) -> Permissions {
        Permissions {
            read: self.record.readable,
            write: self.record.writable,
            execute: self.record.executable,
        }
    }

    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.record.start && addr < self.record.end
    }

    /// Segment content with unloaded bytes read as zero.
    pub fn data(&self) -> DisasmResult<Vec<u8>> {
        self.db.get_bytes(self.record.start, self.size(), Some(0))
    }

    /// Functions whose entry lies in this segment.
    pub fn functions(&self) -> impl Iterator<Item = DisasmResult<Function<'a>>> + 'a {
        self.db.functions(Some(self.record.start), Some(self.record.end))
    }
}

impl PartialEq for Segment<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}
