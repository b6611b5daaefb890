use anyhow::Result;
use unidis_core::model::{Export, Import};
use unidis_core::Database;

use crate::print_json;

pub fn list_imports_command(db: &Database, json: bool) -> Result<()> {
    let imports: Vec<Import> = db.imports().collect();
    if json {
        return print_json(&imports);
    }

    println!("Imports ({}):", imports.len());
    if imports.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for import in imports {
        println!("  - 0x{:08x} {}!{}", import.address, import.namespace, import.name);
    }
    Ok(())
}

pub fn list_exports_command(db: &Database, json: bool) -> Result<()> {
    let exports: Vec<Export> = db.exports().collect();
    if json {
        return print_json(&exports);
    }

    println!("Exports ({}):", exports.len());
    if exports.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for export in exports {
        println!("  - 0x{:08x} {}", export.address, export.name);
    }
    Ok(())
}
