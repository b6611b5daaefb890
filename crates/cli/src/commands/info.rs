use anyhow::Result;
use serde::Serialize;
use unidis_core::db::DatabaseContext;

use crate::{print_json, sha256_file};

#[derive(Debug, Serialize)]
pub struct DatabaseInfo {
    pub snapshot: String,
    pub sha256: String,
    pub host: String,
    pub processor: String,
    pub bit_size: u32,
    pub big_endian: bool,
    pub min_address: u64,
    pub max_address: u64,
    pub cache_capacity: usize,
}

/// Collect database-wide metadata for an open snapshot.
pub fn database_info(ctx: &DatabaseContext) -> Result<DatabaseInfo> {
    let db = &ctx.db;
    Ok(DatabaseInfo {
        snapshot: ctx.snapshot_path.display().to_string(),
        sha256: sha256_file(&ctx.snapshot_path)?,
        host: db.host().name().to_string(),
        processor: db.processor_name().to_string(),
        bit_size: db.bit_size(),
        big_endian: db.is_big_endian(),
        min_address: db.min_address(),
        max_address: db.max_address(),
        cache_capacity: db.cache_capacity(),
    })
}

pub fn info_command(ctx: &DatabaseContext, json: bool) -> Result<()> {
    let info = database_info(ctx)?;
    if json {
        return print_json(&info);
    }

    println!("Database Info");
    println!("=============");
    println!("Snapshot: {}", info.snapshot);
    println!("SHA-256: {}", info.sha256);
    println!("Host: {}", info.host);
    println!("Processor: {}", info.processor);
    println!("Bit size: {}", info.bit_size);
    println!("Endianness: {}", if info.big_endian { "big" } else { "little" });
    println!("Address range: 0x{:x}-0x{:x}", info.min_address, info.max_address);
    Ok(())
}
