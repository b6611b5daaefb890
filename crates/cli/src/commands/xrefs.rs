use anyhow::{Context, Result};
use unidis_core::model::Reference;
use unidis_core::Database;

use crate::print_json;

/// Which side of `addr` the references are collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrefDirection {
    From,
    To,
}

pub fn collect_references(
    db: &Database,
    addr: u64,
    direction: XrefDirection,
) -> Result<Vec<Reference>> {
    let refs: Vec<_> = match direction {
        XrefDirection::From => db.references_from(addr).collect(),
        XrefDirection::To => db.references_to(addr).collect(),
    };
    refs.into_iter()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to classify references at 0x{addr:x}"))
}

pub fn xrefs_command(db: &Database, addr: u64, direction: XrefDirection, json: bool) -> Result<()> {
    let refs = collect_references(db, addr, direction)?;
    if json {
        return print_json(&refs);
    }

    let label = match direction {
        XrefDirection::From => "from",
        XrefDirection::To => "to",
    };
    println!("References {label} 0x{addr:x} ({}):", refs.len());
    if refs.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for r in refs {
        println!("  - 0x{:08x} -> 0x{:08x} {}", r.from_address, r.to_address, r.kind);
    }
    Ok(())
}
