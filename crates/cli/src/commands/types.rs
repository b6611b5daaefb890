use anyhow::Result;
use serde::Serialize;
use unidis_core::model::DataType;
use unidis_core::Database;

use crate::print_json;

pub fn data_type_command(db: &Database, name: &str, json: bool) -> Result<()> {
    let data_type = db.get_data_type(name)?;
    if json {
        return print_json(&data_type);
    }
    let kind = if data_type.is_pointer { " pointer" } else { "" };
    println!("{} ({} bytes{kind})", data_type.name, data_type.size);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct VariableView {
    pub address: u64,
    pub name: String,
    pub size: usize,
    pub data_type: Option<DataType>,
}

pub fn variable_command(db: &Database, addr: u64, json: bool) -> Result<()> {
    let var = db.get_variable(addr)?;
    let view = VariableView {
        address: var.address(),
        name: var.name().to_string(),
        size: var.size(),
        data_type: var.data_type(),
    };
    if json {
        return print_json(&view);
    }
    let type_name = view.data_type.as_ref().map(|t| t.name.as_str()).unwrap_or("-");
    println!("0x{:08x} {} [{} bytes, type: {}]", view.address, view.name, view.size, type_name);
    Ok(())
}
