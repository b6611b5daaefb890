use serde::{Deserialize, Serialize};

use crate::backends::ImportRecord;

/// Symbol pulled in from another module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub address: u64,
    pub name: String,
    /// Library or module the symbol is imported from.
    pub namespace: String,
}

impl From<ImportRecord> for Import {
    fn from(record: ImportRecord) -> Self {
        Self { address: record.address, name: record.name, namespace: record.namespace }
    }
}

/// Entry point exposed by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    pub address: u64,
    pub name: String,
}
