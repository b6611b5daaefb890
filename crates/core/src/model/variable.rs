use crate::db::Database;
use crate::error::DisasmResult;
use crate::model::DataType;

/// Named, non-code item in the listing.
#[derive(Debug, Clone)]
pub struct GlobalVariable<'a> {
    db: &'a Database,
    address: u64,
    name: String,
}

impl<'a> GlobalVariable<'a> {
    pub(crate) fn new(db: &'a Database, address: u64, name: String) -> Self {
        Self { db, address, name }
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.db.host().item_end(self.address).saturating_sub(self.address) as usize
    }

    /// Type applied to the variable, if the host has one.
    pub fn data_type(&self) -> Option<DataType> {
        self.db.host().item_type(self.address).map(DataType::from)
    }

    pub fn data(&self) -> DisasmResult<Vec<u8>> {
        self.db.get_bytes(self.address, self.size(), None)
    }
}
