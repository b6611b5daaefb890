//! Database facade: the single entry point for database-wide queries.
//!
//! [`Database`] wraps a [`HostEngine`] and translates every call into host
//! primitives, then reshapes the raw results into the normalized model:
//! - lookups by identity fail with [`DisasmError::NotFound`] instead of
//!   returning host sentinels;
//! - range enumeration drops functions that start before the range;
//! - outgoing references skip ordinary flow;
//! - the legacy generic x86 processor name is reported as `x86`.
//!
//! Address/offset translation, function signatures and segment lookups are
//! memoized in bounded LRU caches scoped to one `Database`. Raw byte reads are
//! never cached because patched bytes must be visible immediately.

pub mod cache;
pub mod config;
pub mod context;

pub use cache::{LruCache, DEFAULT_CACHE_CAPACITY};
pub use config::{load_config, LoggingConfig, UnidisConfig};
pub use context::DatabaseContext;

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;

use once_cell::unsync::OnceCell;
use tracing::{debug, trace};

use crate::backends::{
    HostEngine, SegmentRecord, SignatureRecord, StrType, BAD_ADDRESS, BITNESS_QUERY_MIN_VERSION,
};
use crate::error::{DisasmError, DisasmResult};
use crate::model::{
    DataType, Export, Function, FunctionSignature, GlobalVariable, Import, Line, Memory,
    Reference, ReferenceType, Register, Segment,
};

/// Processor name the host uses for generic x86.
const LEGACY_X86_PROCESSOR: &str = "metapc";
const GENERIC_X86_PROCESSOR: &str = "x86";

/// Map host processor names onto the spelling shared across backends.
pub fn normalize_processor_name(raw: &str) -> String {
    if raw == LEGACY_X86_PROCESSOR {
        GENERIC_X86_PROCESSOR.to_string()
    } else {
        raw.to_string()
    }
}

/// Segment lookup discriminant: containment by address or exact name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentKey {
    Address(u64),
    Name(String),
}

impl From<u64> for SegmentKey {
    fn from(addr: u64) -> Self {
        SegmentKey::Address(addr)
    }
}

impl From<&str> for SegmentKey {
    fn from(name: &str) -> Self {
        SegmentKey::Name(name.to_string())
    }
}

impl From<String> for SegmentKey {
    fn from(name: String) -> Self {
        SegmentKey::Name(name)
    }
}

impl TryFrom<&serde_json::Value> for SegmentKey {
    type Error = DisasmError;

    /// Accepts an unsigned integer address or a name; anything else is invalid input.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(SegmentKey::Address)
                .ok_or_else(|| DisasmError::invalid_input(format!("{value}"))),
            serde_json::Value::String(name) => Ok(SegmentKey::Name(name.clone())),
            other => Err(DisasmError::invalid_input(format!("{other}"))),
        }
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKey::Address(addr) => write!(f, "0x{addr:x}"),
            SegmentKey::Name(name) => f.write_str(name),
        }
    }
}

/// Normalized view over one loaded analysis session.
pub struct Database {
    host: Box<dyn HostEngine>,
    bit_size: OnceCell<u32>,
    big_endian: OnceCell<bool>,
    processor_name: OnceCell<String>,
    virtual_addresses: RefCell<LruCache<u64, u64>>,
    file_offsets: RefCell<LruCache<u64, u64>>,
    signatures: RefCell<LruCache<u64, SignatureRecord>>,
    segments: RefCell<LruCache<SegmentKey, SegmentRecord>>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("host", &self.host.name())
            .field("cache_capacity", &self.cache_capacity())
            .finish()
    }
}

impl Database {
    pub fn new(host: impl HostEngine + 'static) -> Self {
        Self::with_capacity(Box::new(host), DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_config(host: impl HostEngine + 'static, config: &UnidisConfig) -> Self {
        Self::with_capacity(Box::new(host), config.cache_capacity)
    }

    /// Build a facade whose lookup caches hold at most `capacity` entries each.
    pub fn with_capacity(host: Box<dyn HostEngine>, capacity: usize) -> Self {
        Self {
            host,
            bit_size: OnceCell::new(),
            big_endian: OnceCell::new(),
            processor_name: OnceCell::new(),
            virtual_addresses: RefCell::new(LruCache::new(capacity)),
            file_offsets: RefCell::new(LruCache::new(capacity)),
            signatures: RefCell::new(LruCache::new(capacity)),
            segments: RefCell::new(LruCache::new(capacity)),
        }
    }

    /// Underlying host engine.
    pub fn host(&self) -> &dyn HostEngine {
        self.host.as_ref()
    }

    pub fn cache_capacity(&self) -> usize {
        self.file_offsets.borrow().capacity()
    }

    /// Drop every memoized lookup.
    pub fn clear_caches(&self) {
        self.virtual_addresses.borrow_mut().clear();
        self.file_offsets.borrow_mut().clear();
        self.signatures.borrow_mut().clear();
        self.segments.borrow_mut().clear();
    }

    fn memoized<K, V>(
        &self,
        cache: &RefCell<LruCache<K, V>>,
        key: K,
        lookup: impl FnOnce() -> DisasmResult<V>,
    ) -> DisasmResult<V>
    where
        K: Eq + Hash + Clone + fmt::Debug,
        V: Clone,
    {
        if let Some(hit) = cache.borrow_mut().get(&key) {
            trace!(?key, "cache hit");
            return Ok(hit);
        }
        let value = lookup()?;
        cache.borrow_mut().put(key, value.clone());
        Ok(value)
    }

    // ── Metadata ────────────────────────────────────────────────────────

    /// Address size in bits: 16, 32 or 64.
    pub fn bit_size(&self) -> u32 {
        *self.bit_size.get_or_init(|| {
            if self.host.sdk_version() >= BITNESS_QUERY_MIN_VERSION {
                self.host.app_bitness()
            } else if self.host.is_64bit() {
                64
            } else if self.host.is_32bit() {
                32
            } else {
                16
            }
        })
    }

    pub fn is_big_endian(&self) -> bool {
        *self.big_endian.get_or_init(|| self.host.is_big_endian())
    }

    pub fn min_address(&self) -> u64 {
        self.host.min_ea()
    }

    pub fn max_address(&self) -> u64 {
        self.host.max_ea()
    }

    pub fn processor_name(&self) -> &str {
        self.processor_name.get_or_init(|| normalize_processor_name(&self.host.procname()))
    }

    // ── Bytes ───────────────────────────────────────────────────────────

    fn ensure_loaded(&self, addr: u64, size: usize, what: &str) -> DisasmResult<()> {
        if self.host.is_loaded(addr, size) {
            Ok(())
        } else {
            debug!(addr, size, "read of unloaded bytes");
            Err(DisasmError::not_found(format!("Cannot get {what} at 0x{addr:x}")))
        }
    }

    pub fn get_byte(&self, addr: u64) -> DisasmResult<u8> {
        self.ensure_loaded(addr, 1, "byte")?;
        Ok(self.host.wide_byte(addr))
    }

    pub fn get_word(&self, addr: u64) -> DisasmResult<u16> {
        self.ensure_loaded(addr, 2, "word")?;
        Ok(self.host.wide_word(addr))
    }

    pub fn get_dword(&self, addr: u64) -> DisasmResult<u32> {
        self.ensure_loaded(addr, 4, "dword")?;
        Ok(self.host.wide_dword(addr))
    }

    pub fn get_qword(&self, addr: u64) -> DisasmResult<u64> {
        self.ensure_loaded(addr, 8, "qword")?;
        Ok(self.host.qword(addr))
    }

    /// Read `length` bytes.
    ///
    /// Without `default` the whole range must be loaded. With `default`, unloaded
    /// positions are filled with it and the read never fails.
    pub fn get_bytes(&self, addr: u64, length: usize, default: Option<u8>) -> DisasmResult<Vec<u8>> {
        if default.is_none() && !self.host.is_loaded(addr, length) {
            return Err(DisasmError::not_found(format!(
                "Unable to obtain {length} bytes from 0x{addr:08X}: Address range not fully loaded."
            )));
        }
        Ok(self.host.bytes(addr, length, default.unwrap_or(0)))
    }

    /// Patch loaded bytes in the host database.
    pub fn write_bytes(&self, addr: u64, data: &[u8]) -> DisasmResult<()> {
        if self.host.patch_bytes(addr, data) {
            Ok(())
        } else {
            Err(DisasmError::not_found(format!(
                "Unable to write {} bytes at 0x{addr:08X}: Address range not fully loaded.",
                data.len()
            )))
        }
    }

    /// Byte window over `[start, end)` implementing `Read`, `Write` and `Seek`.
    pub fn open_memory(&self, start: u64, end: u64) -> DisasmResult<Memory<'_>> {
        if end < start {
            return Err(DisasmError::invalid_input(format!(
                "Memory window ends before it starts: 0x{start:x}-0x{end:x}"
            )));
        }
        Ok(Memory::new(self, start, end))
    }

    // ── Address translation ─────────────────────────────────────────────

    pub fn get_virtual_address(&self, file_offset: u64) -> DisasmResult<u64> {
        self.memoized(&self.virtual_addresses, file_offset, || {
            let addr = self.host.fileregion_ea(file_offset);
            if addr == BAD_ADDRESS {
                return Err(DisasmError::not_found(format!(
                    "Cannot get linear address for file offset: 0x{file_offset:x}"
                )));
            }
            Ok(addr)
        })
    }

    pub fn get_file_offset(&self, addr: u64) -> DisasmResult<u64> {
        self.memoized(&self.file_offsets, addr, || {
            let offset = self.host.fileregion_offset(addr);
            u64::try_from(offset).map_err(|_| {
                DisasmError::not_found(format!("Cannot get file offset for address: 0x{addr:x}"))
            })
        })
    }

    // ── Functions ───────────────────────────────────────────────────────

    /// Functions with an entry in `[start, end)`, in address order.
    ///
    /// A function that begins before `start` is skipped even when it spans
    /// `start`, so range queries agree across backends.
    pub fn functions(
        &self,
        start: Option<u64>,
        end: Option<u64>,
    ) -> impl Iterator<Item = DisasmResult<Function<'_>>> + '_ {
        self.host
            .function_entries(start, end)
            .filter(move |&entry| start.map_or(true, |s| entry >= s))
            .map(move |entry| self.get_function(entry))
    }

    /// Function containing `addr`.
    pub fn get_function(&self, addr: u64) -> DisasmResult<Function<'_>> {
        match self.host.func_at(addr) {
            Some(record) => Ok(Function::new(self, record)),
            None => {
                debug!(addr, "no function at address");
                Err(DisasmError::not_found(format!("Function does not exist at 0x{addr:x}")))
            }
        }
    }

    pub fn get_function_signature(&self, addr: u64) -> DisasmResult<FunctionSignature> {
        self.memoized(&self.signatures, addr, || {
            self.host.func_signature(addr).ok_or_else(|| {
                DisasmError::not_found(format!("Unable to get function signature for 0x{addr:x}"))
            })
        })
        .map(FunctionSignature::from)
    }

    // ── Listing ─────────────────────────────────────────────────────────

    /// Listing item containing `addr`.
    pub fn get_line(&self, addr: u64) -> Line<'_> {
        Line::new(self, self.host.item_head(addr))
    }

    pub fn get_name(&self, addr: u64) -> DisasmResult<String> {
        self.host
            .name_at(addr)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DisasmError::not_found(format!("No name at 0x{addr:x}")))
    }

    pub fn get_register(&self, name: &str) -> DisasmResult<Register> {
        self.host
            .parse_reg_name(name)
            .map(Register::from)
            .ok_or_else(|| DisasmError::not_found(format!("Invalid register name: {name}")))
    }

    /// Named, non-code item containing `addr`.
    pub fn get_variable(&self, addr: u64) -> DisasmResult<GlobalVariable<'_>> {
        let start = self.host.item_head(addr);
        // Named code is a label, not a variable.
        if !self.host.is_code(start) {
            if let Some(name) = self.host.name_at(start).filter(|n| !n.is_empty()) {
                return Ok(GlobalVariable::new(self, start, name));
            }
        }
        Err(DisasmError::not_found(format!("Variable doesn't exist at 0x{addr:x}")))
    }

    // ── Segments ────────────────────────────────────────────────────────

    /// Segment by containing address or by name.
    pub fn get_segment(&self, key: impl Into<SegmentKey>) -> DisasmResult<Segment<'_>> {
        let key = key.into();
        let record = self.memoized(&self.segments, key.clone(), || match &key {
            SegmentKey::Name(name) => self.host.segment_by_name(name).ok_or_else(|| {
                DisasmError::not_found(format!("Could not find segment with name: {name}"))
            }),
            SegmentKey::Address(addr) => self.host.segment_containing(*addr).ok_or_else(|| {
                DisasmError::not_found(format!(
                    "Could not find segment containing address: 0x{addr:08x}"
                ))
            }),
        })?;
        Ok(Segment::new(self, record))
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> + '_ {
        (0..self.host.segment_count())
            .filter_map(move |n| self.host.segment_at_index(n))
            .map(move |record| Segment::new(self, record))
    }

    // ── Strings and types ───────────────────────────────────────────────

    /// Raw string literal contents at `addr`.
    ///
    /// `bit_width` selects an 8/16/32-bit encoding; `None` lets the host infer
    /// it. Without `length` the host's maximum literal length is used.
    pub fn get_string_bytes(
        &self,
        addr: u64,
        length: Option<usize>,
        bit_width: Option<u32>,
    ) -> DisasmResult<Vec<u8>> {
        let str_type = match bit_width {
            None => self.host.str_type(addr),
            Some(bits) => StrType::from_bit_width(bits)
                .ok_or_else(|| DisasmError::invalid_input(format!("Invalid bit width: {bits}")))?,
        };
        let length = length.unwrap_or_else(|| self.host.max_strlit_length(addr, str_type));
        self.host
            .strlit_contents(addr, length, str_type)
            .ok_or_else(|| DisasmError::not_found(format!("Unable to obtain string at 0x{addr:x}")))
    }

    /// Resolve a named type; a trailing `*` requests a pointer to it.
    ///
    /// The host registry only matches upper-case names, so the lookup key is
    /// upper-cased after stripping spaces and asterisks.
    pub fn get_data_type(&self, name: &str) -> DisasmResult<DataType> {
        let is_pointer = name.ends_with('*');
        let key = name.trim_matches(|c| c == ' ' || c == '*').to_uppercase();

        let base = self
            .host
            .named_type(&key)
            .ok_or_else(|| DisasmError::not_found(format!("Invalid data type: {key}")))?;
        let record = if is_pointer { self.host.create_ptr(&base) } else { base };
        Ok(DataType::from(record))
    }

    // ── References ──────────────────────────────────────────────────────

    /// References leaving `addr`, excluding ordinary flow.
    pub fn references_from(&self, addr: u64) -> impl Iterator<Item = DisasmResult<Reference>> + '_ {
        self.host
            .xrefs_from(addr)
            .map(|record| Reference::from_record(&record))
            .filter(|r| !matches!(r, Ok(r) if r.kind == ReferenceType::OrdinaryFlow))
    }

    /// References arriving at `addr`, ordinary flow included.
    pub fn references_to(&self, addr: u64) -> impl Iterator<Item = DisasmResult<Reference>> + '_ {
        self.host.xrefs_to(addr).map(|record| Reference::from_record(&record))
    }

    // ── Imports and exports ─────────────────────────────────────────────

    pub fn imports(&self) -> impl Iterator<Item = Import> + '_ {
        self.host.imports().map(Import::from)
    }

    pub fn exports(&self) -> impl Iterator<Item = Export> + '_ {
        (0..self.host.entry_count()).map(move |index| {
            let ordinal = self.host.entry_ordinal(index);
            Export { address: self.host.entry_address(ordinal), name: self.host.entry_name(ordinal) }
        })
    }

    pub fn get_import(&self, name: &str) -> DisasmResult<Import> {
        self.imports()
            .find(|i| i.name == name)
            .ok_or_else(|| DisasmError::not_found(format!("Unable to find import: {name}")))
    }

    pub fn get_export(&self, name: &str) -> DisasmResult<Export> {
        self.exports()
            .find(|e| e.name == name)
            .ok_or_else(|| DisasmError::not_found(format!("Unable to find export: {name}")))
    }
}
