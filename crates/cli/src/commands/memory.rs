use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use unidis_core::Database;

use crate::print_json;

#[derive(Debug, Serialize)]
pub struct BytesView {
    pub address: u64,
    /// Lower-case hex, two digits per byte.
    pub bytes: String,
}

pub fn read_bytes_command(
    db: &Database,
    addr: u64,
    length: usize,
    fill: Option<u8>,
    json: bool,
) -> Result<()> {
    let data = db.get_bytes(addr, length, fill)?;
    let view = BytesView { address: addr, bytes: hex::encode(&data) };
    if json {
        return print_json(&view);
    }
    println!("0x{:08x}: {}", view.address, view.bytes);
    Ok(())
}

pub fn string_command(
    db: &Database,
    addr: u64,
    length: Option<usize>,
    width: Option<u32>,
    json: bool,
) -> Result<()> {
    let data = db.get_string_bytes(addr, length, width)?;
    let text = String::from_utf8_lossy(&data);
    if json {
        let bytes = hex::encode(&data);
        return print_json(&json!({ "address": addr, "bytes": bytes, "text": text }));
    }
    println!("{text}");
    Ok(())
}

pub fn file_offset_command(db: &Database, addr: u64, json: bool) -> Result<()> {
    let offset = db.get_file_offset(addr)?;
    if json {
        return print_json(&json!({ "address": addr, "file_offset": offset }));
    }
    println!("0x{offset:x}");
    Ok(())
}

pub fn virtual_address_command(db: &Database, offset: u64, json: bool) -> Result<()> {
    let addr = db.get_virtual_address(offset)?;
    if json {
        return print_json(&json!({ "file_offset": offset, "address": addr }));
    }
    println!("0x{addr:x}");
    Ok(())
}
