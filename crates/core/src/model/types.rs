use serde::{Deserialize, Serialize};

use crate::backends::{RegisterRecord, SignatureRecord, TypeRecord};

/// Named type resolved from the host type library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    pub name: String,
    pub size: usize,
    pub is_pointer: bool,
    /// Target type when `is_pointer` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointee: Option<Box<DataType>>,
}

impl From<TypeRecord> for DataType {
    fn from(record: TypeRecord) -> Self {
        let pointee = record.pointee.map(|p| Box::new(DataType::from(*p)));
        Self { name: record.name, size: record.size, is_pointer: pointee.is_some(), pointee }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub data_type: String,
}

/// Prototype of a function as the host understands it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub address: u64,
    pub declaration: String,
    pub return_type: String,
    pub calling_convention: String,
    pub parameters: Vec<Parameter>,
}

impl From<SignatureRecord> for FunctionSignature {
    fn from(record: SignatureRecord) -> Self {
        Self {
            address: record.address,
            declaration: record.declaration,
            return_type: record.return_type,
            calling_convention: record.calling_convention,
            parameters: record
                .parameters
                .into_iter()
                .map(|p| Parameter { name: p.name, data_type: p.type_name })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    pub name: String,
    /// Host register number.
    pub number: u32,
    /// Width in bytes.
    pub size: usize,
}

impl From<RegisterRecord> for Register {
    fn from(record: RegisterRecord) -> Self {
        Self { name: record.name, number: record.number, size: record.size }
    }
}
