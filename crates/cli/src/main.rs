use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use unidis::commands::{self, XrefDirection};
use unidis::parse_address;
use unidis_core::db::{load_config, DatabaseContext, UnidisConfig};

/// Disassembler-agnostic query tool over exported analysis databases.
///
/// This CLI is a thin wrapper around `unidis-core`. All substantive logic
/// lives in the library so it can be tested thoroughly and reused from other
/// frontends.
#[derive(Parser, Debug)]
#[command(
    name = "unidis",
    version,
    about = "Query an exported disassembler analysis database",
    long_about = None
)]
struct Cli {
    /// Analysis snapshot to open (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Optional config file (cache capacity, logging).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of human-readable text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show processor, bitness, endianness, and address bounds.
    Info,

    /// List functions whose entry lies in [start, end).
    Functions {
        #[arg(long, value_parser = parse_address)]
        start: Option<u64>,
        #[arg(long, value_parser = parse_address)]
        end: Option<u64>,
    },

    /// List all segments.
    Segments,

    /// Show the segment containing an address, or the segment with a name.
    Segment {
        /// Address (0x-prefixed hex or decimal) or segment name.
        key: String,
    },

    /// References leaving an address (ordinary flow excluded).
    XrefsFrom {
        #[arg(value_parser = parse_address)]
        address: u64,
    },

    /// References arriving at an address.
    XrefsTo {
        #[arg(value_parser = parse_address)]
        address: u64,
    },

    /// List imported symbols.
    Imports,

    /// List exported entry points.
    Exports,

    /// Read raw bytes.
    Read {
        #[arg(value_parser = parse_address)]
        address: u64,
        length: usize,
        /// Substitute this byte for unloaded positions instead of failing.
        #[arg(long)]
        fill: Option<u8>,
    },

    /// Read a string literal.
    #[command(name = "string")]
    ReadString {
        #[arg(value_parser = parse_address)]
        address: u64,
        /// Byte length to read; defaults to the detected literal length.
        #[arg(long)]
        length: Option<usize>,
        /// Character width in bits (8, 16 or 32); inferred when omitted.
        #[arg(long)]
        width: Option<u32>,
    },

    /// Resolve a named type; a trailing `*` requests a pointer.
    DataType { name: String },

    /// Show the named data item containing an address.
    Variable {
        #[arg(value_parser = parse_address)]
        address: u64,
    },

    /// Translate an address to its file offset.
    FileOffset {
        #[arg(value_parser = parse_address)]
        address: u64,
    },

    /// Translate a file offset to its address.
    VirtualAddress {
        #[arg(value_parser = parse_address)]
        offset: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => UnidisConfig::default(),
    };
    unidis_core::logging::init_from_config(&config.logging);

    let snapshot =
        cli.snapshot.ok_or_else(|| anyhow::anyhow!("--snapshot <PATH> is required"))?;
    debug!(snapshot = %snapshot.display(), "opening analysis snapshot");
    let ctx = DatabaseContext::open_with_config(&snapshot, config)?;
    let db = &ctx.db;
    let json = cli.json;

    match cli.command {
        Command::Info => commands::info_command(&ctx, json)?,
        Command::Functions { start, end } => {
            commands::list_functions_command(db, start, end, json)?
        }
        Command::Segments => commands::list_segments_command(db, json)?,
        Command::Segment { key } => {
            commands::segment_command(db, unidis::parse_segment_key(&key), json)?
        }
        Command::XrefsFrom { address } => {
            commands::xrefs_command(db, address, XrefDirection::From, json)?
        }
        Command::XrefsTo { address } => {
            commands::xrefs_command(db, address, XrefDirection::To, json)?
        }
        Command::Imports => commands::list_imports_command(db, json)?,
        Command::Exports => commands::list_exports_command(db, json)?,
        Command::Read { address, length, fill } => {
            commands::read_bytes_command(db, address, length, fill, json)?
        }
        Command::ReadString { address, length, width } => {
            commands::string_command(db, address, length, width, json)?
        }
        Command::DataType { name } => commands::data_type_command(db, &name, json)?,
        Command::Variable { address } => commands::variable_command(db, address, json)?,
        Command::FileOffset { address } => commands::file_offset_command(db, address, json)?,
        Command::VirtualAddress { offset } => {
            commands::virtual_address_command(db, offset, json)?
        }
    }

    Ok(())
}
