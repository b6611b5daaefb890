use anyhow::{Context, Result};
use serde::Serialize;
use unidis_core::model::Function;
use unidis_core::Database;

use crate::print_json;

#[derive(Debug, Serialize)]
pub struct FunctionSummary {
    pub start: u64,
    pub end: u64,
    pub name: String,
}

impl From<&Function<'_>> for FunctionSummary {
    fn from(func: &Function<'_>) -> Self {
        Self { start: func.start(), end: func.end(), name: func.name() }
    }
}

/// Functions with an entry in `[start, end)`.
pub fn collect_functions(
    db: &Database,
    start: Option<u64>,
    end: Option<u64>,
) -> Result<Vec<FunctionSummary>> {
    let mut out = Vec::new();
    for func in db.functions(start, end) {
        let func = func.context("Failed to enumerate functions")?;
        out.push(FunctionSummary::from(&func));
    }
    Ok(out)
}

pub fn list_functions_command(
    db: &Database,
    start: Option<u64>,
    end: Option<u64>,
    json: bool,
) -> Result<()> {
    let functions = collect_functions(db, start, end)?;
    if json {
        return print_json(&functions);
    }

    println!("Functions ({}):", functions.len());
    if functions.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for func in functions {
        println!("  - 0x{:08x}-0x{:08x} {}", func.start, func.end, func.name);
    }
    Ok(())
}
