use serde::{Deserialize, Serialize};
use tracing::error;

use crate::backends::XrefRecord;
use crate::error::{DisasmError, DisasmResult};

/// Normalized cross-reference kind shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Unknown,
    DataOffset,
    DataWrite,
    DataRead,
    DataText,
    DataInformational,
    CodeCall,
    CodeJump,
    CodeUser,
    /// Implicit fallthrough to the next instruction.
    OrdinaryFlow,
}

impl ReferenceType {
    /// Classify a raw host reference code.
    ///
    /// Returns `None` for codes outside the host's documented set, including
    /// the symbolic-constant data code (6).
    pub fn from_raw(code: u8) -> Option<Self> {
        let kind = match code {
            0 => ReferenceType::Unknown,
            1 => ReferenceType::DataOffset,
            2 => ReferenceType::DataWrite,
            3 => ReferenceType::DataRead,
            4 => ReferenceType::DataText,
            5 => ReferenceType::DataInformational,
            // far and near calls
            16 | 17 => ReferenceType::CodeCall,
            // far and near jumps
            18 | 19 => ReferenceType::CodeJump,
            20 => ReferenceType::CodeUser,
            21 => ReferenceType::OrdinaryFlow,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            ReferenceType::Unknown => "unknown",
            ReferenceType::DataOffset => "data_offset",
            ReferenceType::DataWrite => "data_write",
            ReferenceType::DataRead => "data_read",
            ReferenceType::DataText => "data_text",
            ReferenceType::DataInformational => "data_informational",
            ReferenceType::CodeCall => "code_call",
            ReferenceType::CodeJump => "code_jump",
            ReferenceType::CodeUser => "code_user",
            ReferenceType::OrdinaryFlow => "ordinary_flow",
        }
    }
}

impl std::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One classified cross-reference edge.
///
/// `is_code` is the host's own flag while `is_data` follows from the
/// classification, so `Unknown`, `CodeUser` and `OrdinaryFlow` references can
/// be neither or only one of them. Do not treat them as complements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub from_address: u64,
    pub to_address: u64,
    #[serde(rename = "type")]
    pub kind: ReferenceType,
    pub is_code: bool,
    pub is_data: bool,
}

impl Reference {
    /// Wrap a raw host record. Fails if its type code has no mapping.
    pub fn from_record(record: &XrefRecord) -> DisasmResult<Self> {
        let kind = ReferenceType::from_raw(record.kind).ok_or_else(|| {
            error!(
                code = record.kind,
                from = record.from,
                to = record.to,
                "reference type code missing from classification table"
            );
            DisasmError::UnexpectedReferenceType(record.kind)
        })?;
        Ok(Self {
            from_address: record.from,
            to_address: record.to,
            kind,
            is_code: record.is_code,
            is_data: kind.name().starts_with("data"),
        })
    }
}
