use crate::db::Database;
use crate::error::DisasmResult;
use crate::model::Reference;

/// A single listing item (instruction or data definition).
#[derive(Debug, Clone)]
pub struct Line<'a> {
    db: &'a Database,
    address: u64,
}

impl<'a> Line<'a> {
    pub(crate) fn new(db: &'a Database, address: u64) -> Self {
        Self { db, address }
    }

    /// Start of the item.
    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn size(&self) -> usize {
        self.db.host().item_end(self.address).saturating_sub(self.address) as usize
    }

    pub fn is_code(&self) -> bool {
        self.db.host().is_code(self.address)
    }

    pub fn name(&self) -> Option<String> {
        self.db.get_name(self.address).ok()
    }

    pub fn data(&self) -> DisasmResult<Vec<u8>> {
        self.db.get_bytes(self.address, self.size(), None)
    }

    pub fn references_from(&self) -> impl Iterator<Item = DisasmResult<Reference>> + 'a {
        self.db.references_from(self.address)
    }

    pub fn references_to(&self) -> impl Iterator<Item = DisasmResult<Reference>> + 'a {
        self.db.references_to(self.address)
    }
}
