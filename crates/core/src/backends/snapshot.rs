use std::cell::RefCell;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backends::{
    FuncRecord, HostEngine, ImportRecord, ParameterRecord, RegisterRecord, SegmentRecord,
    SignatureRecord, StrType, TypeRecord, XrefRecord, BAD_ADDRESS, MAX_STRLIT_LENGTH,
};
use crate::error::{DisasmError, DisasmResult};

/// Exported analysis database, as written by a host-side export script.
///
/// Every section is optional in the document; missing sections are empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSnapshot {
    /// Version of the host SDK that produced the export.
    pub sdk_version: u32,
    pub bitness: u32,
    pub big_endian: bool,
    /// Raw host processor module name (e.g. `metapc`, `ARM`).
    pub processor: String,
    pub min_address: Option<u64>,
    pub max_address: Option<u64>,
    pub memory: Vec<MemoryRegion>,
    pub file_regions: Vec<FileRegion>,
    pub functions: Vec<FunctionEntry>,
    pub signatures: Vec<SignatureEntry>,
    pub segments: Vec<SegmentEntry>,
    pub items: Vec<ItemEntry>,
    pub xrefs: Vec<XrefEntry>,
    pub types: Vec<TypeEntry>,
    pub registers: Vec<RegisterEntry>,
    pub imports: Vec<ImportEntry>,
    pub exports: Vec<ExportEntry>,
}

impl Default for AnalysisSnapshot {
    fn default() -> Self {
        Self {
            sdk_version: 900,
            bitness: 64,
            big_endian: false,
            processor: "metapc".to_string(),
            min_address: None,
            max_address: None,
            memory: vec![],
            file_regions: vec![],
            functions: vec![],
            signatures: vec![],
            segments: vec![],
            items: vec![],
            xrefs: vec![],
            types: vec![],
            registers: vec![],
            imports: vec![],
            exports: vec![],
        }
    }
}

/// Contiguous run of loaded bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub start: u64,
    /// Hex-encoded content; whitespace is ignored when parsing.
    #[serde(with = "hex_bytes")]
    pub bytes: Vec<u8>,
}

impl MemoryRegion {
    fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr - self.start < self.bytes.len() as u64
    }

    /// Exclusive end; `None` when it does not fit the address space.
    fn end(&self) -> Option<u64> {
        self.start.checked_add(self.bytes.len() as u64)
    }
}

/// Mapping between a file range and the address it was loaded at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRegion {
    pub address: u64,
    pub offset: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub start: u64,
    pub end: u64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub address: u64,
    pub declaration: String,
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub calling_convention: String,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentEntry {
    pub name: String,
    pub start: u64,
    pub end: u64,
    /// Falls back to the snapshot bitness.
    #[serde(default)]
    pub bitness: Option<u32>,
    /// Permission string such as `r-x`.
    #[serde(default = "default_permissions")]
    pub permissions: String,
}

fn default_permissions() -> String {
    "rwx".to_string()
}

/// A defined item (instruction or data) in the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    pub address: u64,
    #[serde(default = "default_item_size")]
    pub size: u64,
    #[serde(default)]
    pub code: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// Bit width of a string literal defined here.
    #[serde(default)]
    pub string_width: Option<u32>,
}

fn default_item_size() -> u64 {
    1
}

impl ItemEntry {
    fn end(&self) -> Option<u64> {
        self.address.checked_add(self.size.max(1))
    }

    fn contains(&self, addr: u64) -> bool {
        addr >= self.address && addr - self.address < self.size.max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XrefEntry {
    pub from: u64,
    pub to: u64,
    /// Raw host reference type code.
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub code: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub name: String,
    pub number: u32,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEntry {
    pub address: u64,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEntry {
    pub ordinal: u64,
    pub address: u64,
    pub name: String,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        hex::decode(cleaned).map_err(serde::de::Error::custom)
    }
}

/// Host engine backed by an [`AnalysisSnapshot`].
///
/// Behaves like a live host session: function enumeration includes functions
/// overlapping the start bound, xref iteration reports ordinary flow, and
/// missing mappings come back as host sentinels.
#[derive(Debug)]
pub struct SnapshotHost {
    snapshot: AnalysisSnapshot,
    memory: RefCell<Vec<MemoryRegion>>,
}

impl SnapshotHost {
    pub fn new(mut snapshot: AnalysisSnapshot) -> DisasmResult<Self> {
        if let Some(f) = snapshot.functions.iter().find(|f| f.end < f.start) {
            return Err(DisasmError::Snapshot(format!(
                "function at 0x{:x} ends before it starts (end 0x{:x})",
                f.start, f.end
            )));
        }
        if let Some(s) = snapshot.segments.iter().find(|s| s.end < s.start) {
            return Err(DisasmError::Snapshot(format!(
                "segment {} ends before it starts",
                s.name
            )));
        }

        if let Some(r) = snapshot.memory.iter().find(|r| r.end().is_none()) {
            return Err(DisasmError::Snapshot(format!(
                "memory region at 0x{:x} extends past the end of the address space",
                r.start
            )));
        }
        if let Some(r) = snapshot.file_regions.iter().find(|r| {
            r.address.checked_add(r.size).is_none() || r.offset.checked_add(r.size).is_none()
        }) {
            return Err(DisasmError::Snapshot(format!(
                "file region at 0x{:x} extends past the end of the address space",
                r.address
            )));
        }
        if let Some(i) = snapshot.items.iter().find(|i| i.end().is_none()) {
            return Err(DisasmError::Snapshot(format!(
                "item at 0x{:x} extends past the end of the address space",
                i.address
            )));
        }

        snapshot.functions.sort_by_key(|f| f.start);
        snapshot.items.sort_by_key(|i| i.address);
        let mut memory = std::mem::take(&mut snapshot.memory);
        memory.sort_by_key(|r| r.start);

        debug!(
            functions = snapshot.functions.len(),
            segments = snapshot.segments.len(),
            regions = memory.len(),
            "loaded analysis snapshot"
        );
        Ok(Self { snapshot, memory: RefCell::new(memory) })
    }

    pub fn from_json_str(body: &str) -> DisasmResult<Self> {
        let snapshot: AnalysisSnapshot = serde_json::from_str(body)?;
        Self::new(snapshot)
    }

    pub fn from_yaml_str(body: &str) -> DisasmResult<Self> {
        let snapshot: AnalysisSnapshot = serde_yaml::from_str(body)?;
        Self::new(snapshot)
    }

    /// Load a snapshot file; `.yaml`/`.yml` are parsed as YAML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> DisasmResult<Self> {
        let path = path.as_ref();
        let body = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&body),
            _ => Self::from_json_str(&body),
        }
    }

    /// Snapshot metadata and tables (memory regions excluded).
    pub fn snapshot(&self) -> &AnalysisSnapshot {
        &self.snapshot
    }

    fn byte_at(&self, addr: u64) -> Option<u8> {
        let memory = self.memory.borrow();
        let value =
            memory.iter().find(|r| r.contains(addr)).map(|r| r.bytes[(addr - r.start) as usize]);
        value
    }

    /// Little- or big-endian read of `size` bytes; unloaded bytes read as zero.
    fn read_uint(&self, addr: u64, size: usize) -> u64 {
        let bytes = self.bytes(addr, size, 0);
        let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
        if self.snapshot.big_endian {
            bytes.iter().fold(0, fold)
        } else {
            bytes.iter().rev().fold(0, fold)
        }
    }

    fn item_containing(&self, addr: u64) -> Option<&ItemEntry> {
        self.snapshot.items.iter().find(|i| i.contains(addr))
    }

    fn segment_record(&self, entry: &SegmentEntry) -> SegmentRecord {
        SegmentRecord {
            name: entry.name.clone(),
            start: entry.start,
            end: entry.end,
            bitness: entry.bitness.unwrap_or(self.snapshot.bitness),
            readable: entry.permissions.contains('r'),
            writable: entry.permissions.contains('w'),
            executable: entry.permissions.contains('x'),
        }
    }
}

impl HostEngine for SnapshotHost {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn sdk_version(&self) -> u32 {
        self.snapshot.sdk_version
    }

    fn app_bitness(&self) -> u32 {
        self.snapshot.bitness
    }

    fn is_64bit(&self) -> bool {
        self.snapshot.bitness == 64
    }

    fn is_32bit(&self) -> bool {
        self.snapshot.bitness == 32
    }

    fn is_big_endian(&self) -> bool {
        self.snapshot.big_endian
    }

    fn min_ea(&self) -> u64 {
        self.snapshot
            .min_address
            .or_else(|| self.memory.borrow().iter().map(|r| r.start).min())
            .unwrap_or(0)
    }

    fn max_ea(&self) -> u64 {
        self.snapshot
            .max_address
            .or_else(|| self.memory.borrow().iter().filter_map(MemoryRegion::end).max())
            .unwrap_or(0)
    }

    fn procname(&self) -> String {
        self.snapshot.processor.clone()
    }

    fn is_loaded(&self, addr: u64, len: usize) -> bool {
        (0..len as u64).all(|i| addr.checked_add(i).and_then(|a| self.byte_at(a)).is_some())
    }

    fn wide_byte(&self, addr: u64) -> u8 {
        self.byte_at(addr).unwrap_or(0)
    }

    fn wide_word(&self, addr: u64) -> u16 {
        self.read_uint(addr, 2) as u16
    }

    fn wide_dword(&self, addr: u64) -> u32 {
        self.read_uint(addr, 4) as u32
    }

    fn qword(&self, addr: u64) -> u64 {
        self.read_uint(addr, 8)
    }

    fn bytes(&self, addr: u64, len: usize, fill: u8) -> Vec<u8> {
        (0..len as u64)
            .map(|i| addr.checked_add(i).and_then(|a| self.byte_at(a)).unwrap_or(fill))
            .collect()
    }

    fn patch_bytes(&self, addr: u64, data: &[u8]) -> bool {
        if !self.is_loaded(addr, data.len()) {
            return false;
        }
        let mut memory = self.memory.borrow_mut();
        for (i, value) in data.iter().enumerate() {
            let Some(at) = addr.checked_add(i as u64) else {
                break;
            };
            if let Some(region) = memory.iter_mut().find(|r| r.contains(at)) {
                let index = (at - region.start) as usize;
                region.bytes[index] = *value;
            }
        }
        true
    }

    fn fileregion_ea(&self, offset: u64) -> u64 {
        self.snapshot
            .file_regions
            .iter()
            .find(|r| offset >= r.offset && offset - r.offset < r.size)
            .map(|r| r.address + (offset - r.offset))
            .unwrap_or(BAD_ADDRESS)
    }

    fn fileregion_offset(&self, addr: u64) -> i64 {
        self.snapshot
            .file_regions
            .iter()
            .find(|r| addr >= r.address && addr - r.address < r.size)
            .and_then(|r| i64::try_from(r.offset + (addr - r.address)).ok())
            .unwrap_or(-1)
    }

    fn function_entries(
        &self,
        start: Option<u64>,
        end: Option<u64>,
    ) -> Box<dyn Iterator<Item = u64> + '_> {
        Box::new(
            self.snapshot
                .functions
                .iter()
                .filter(move |f| start.map_or(true, |s| f.end > s || f.start >= s))
                .filter(move |f| end.map_or(true, |e| f.start < e))
                .map(|f| f.start),
        )
    }

    fn func_at(&self, addr: u64) -> Option<FuncRecord> {
        self.snapshot
            .functions
            .iter()
            .find(|f| addr == f.start || (addr > f.start && addr < f.end))
            .map(|f| FuncRecord { start: f.start, end: f.end, name: f.name.clone() })
    }

    fn func_signature(&self, addr: u64) -> Option<SignatureRecord> {
        let target = self.func_at(addr).map(|f| f.start).unwrap_or(addr);
        self.snapshot.signatures.iter().find(|s| s.address == target).map(|s| SignatureRecord {
            address: s.address,
            declaration: s.declaration.clone(),
            return_type: s.return_type.clone(),
            calling_convention: s.calling_convention.clone(),
            parameters: s
                .parameters
                .iter()
                .map(|p| ParameterRecord { name: p.name.clone(), type_name: p.type_name.clone() })
                .collect(),
        })
    }

    fn parse_reg_name(&self, name: &str) -> Option<RegisterRecord> {
        self.snapshot.registers.iter().find(|r| r.name.eq_ignore_ascii_case(name)).map(|r| {
            RegisterRecord { name: r.name.clone(), number: r.number, size: r.size }
        })
    }

    fn segment_by_name(&self, name: &str) -> Option<SegmentRecord> {
        self.snapshot.segments.iter().find(|s| s.name == name).map(|s| self.segment_record(s))
    }

    fn segment_containing(&self, addr: u64) -> Option<SegmentRecord> {
        self.snapshot
            .segments
            .iter()
            .find(|s| addr >= s.start && addr < s.end)
            .map(|s| self.segment_record(s))
    }

    fn segment_count(&self) -> usize {
        self.snapshot.segments.len()
    }

    fn segment_at_index(&self, index: usize) -> Option<SegmentRecord> {
        self.snapshot.segments.get(index).map(|s| self.segment_record(s))
    }

    fn str_type(&self, addr: u64) -> StrType {
        self.item_containing(addr)
            .and_then(|i| i.string_width)
            .and_then(StrType::from_bit_width)
            .unwrap_or(StrType::C)
    }

    fn max_strlit_length(&self, addr: u64, str_type: StrType) -> usize {
        let unit = str_type.unit_size();
        let mut length = 0;
        while length + unit <= MAX_STRLIT_LENGTH {
            let Some(at) = addr.checked_add(length as u64) else {
                break;
            };
            if !self.is_loaded(at, unit) {
                break;
            }
            let value = self.read_uint(at, unit);
            length += unit;
            if value == 0 {
                break;
            }
        }
        length
    }

    fn strlit_contents(&self, addr: u64, len: usize, str_type: StrType) -> Option<Vec<u8>> {
        let unit = str_type.unit_size();
        if len < unit || !self.is_loaded(addr, unit) {
            return None;
        }

        let mut units = Vec::new();
        let mut offset = 0;
        while len - offset >= unit {
            let Some(at) = addr.checked_add(offset as u64) else {
                break;
            };
            if !self.is_loaded(at, unit) {
                break;
            }
            let value = self.read_uint(at, unit);
            if value == 0 {
                break;
            }
            units.push(value);
            offset += unit;
        }

        let contents = match str_type {
            StrType::C => units.into_iter().map(|u| u as u8).collect(),
            StrType::C16 => {
                let wide: Vec<u16> = units.into_iter().map(|u| u as u16).collect();
                String::from_utf16_lossy(&wide).into_bytes()
            }
            StrType::C32 => units
                .into_iter()
                .map(|u| char::from_u32(u as u32).unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect::<String>()
                .into_bytes(),
        };
        Some(contents)
    }

    fn named_type(&self, name: &str) -> Option<TypeRecord> {
        self.snapshot
            .types
            .iter()
            .find(|t| t.name == name)
            .map(|t| TypeRecord { name: t.name.clone(), size: t.size, pointee: None })
    }

    fn create_ptr(&self, base: &TypeRecord) -> TypeRecord {
        TypeRecord {
            name: format!("{} *", base.name),
            size: (self.snapshot.bitness / 8) as usize,
            pointee: Some(Box::new(base.clone())),
        }
    }

    fn item_type(&self, addr: u64) -> Option<TypeRecord> {
        let item = self.item_containing(addr)?;
        let type_name = item.type_name.as_deref()?;
        Some(self.named_type(type_name).unwrap_or_else(|| TypeRecord {
            name: type_name.to_string(),
            size: item.size as usize,
            pointee: None,
        }))
    }

    fn xrefs_from(&self, addr: u64) -> Box<dyn Iterator<Item = XrefRecord> + '_> {
        Box::new(self.snapshot.xrefs.iter().filter(move |x| x.from == addr).map(to_xref_record))
    }

    fn xrefs_to(&self, addr: u64) -> Box<dyn Iterator<Item = XrefRecord> + '_> {
        Box::new(self.snapshot.xrefs.iter().filter(move |x| x.to == addr).map(to_xref_record))
    }

    fn item_head(&self, addr: u64) -> u64 {
        self.item_containing(addr).map(|i| i.address).unwrap_or(addr)
    }

    fn item_end(&self, addr: u64) -> u64 {
        self.item_containing(addr)
            .and_then(ItemEntry::end)
            .unwrap_or_else(|| addr.saturating_add(1))
    }

    fn next_head(&self, addr: u64, limit: u64) -> Option<u64> {
        self.snapshot.items.iter().map(|i| i.address).find(|&a| a > addr && a < limit)
    }

    fn is_code(&self, addr: u64) -> bool {
        self.item_containing(addr).map_or(false, |i| i.code)
    }

    fn name_at(&self, addr: u64) -> Option<String> {
        self.snapshot
            .items
            .iter()
            .find(|i| i.address == addr)
            .and_then(|i| i.name.clone())
            .or_else(|| {
                self.snapshot.functions.iter().find(|f| f.start == addr).and_then(|f| f.name.clone())
            })
    }

    fn imports(&self) -> Box<dyn Iterator<Item = ImportRecord> + '_> {
        Box::new(self.snapshot.imports.iter().map(|i| ImportRecord {
            address: i.address,
            name: i.name.clone(),
            namespace: i.namespace.clone(),
        }))
    }

    fn entry_count(&self) -> usize {
        self.snapshot.exports.len()
    }

    fn entry_ordinal(&self, index: usize) -> u64 {
        self.snapshot.exports.get(index).map(|e| e.ordinal).unwrap_or(BAD_ADDRESS)
    }

    fn entry_address(&self, ordinal: u64) -> u64 {
        self.snapshot
            .exports
            .iter()
            .find(|e| e.ordinal == ordinal)
            .map(|e| e.address)
            .unwrap_or(BAD_ADDRESS)
    }

    fn entry_name(&self, ordinal: u64) -> String {
        self.snapshot
            .exports
            .iter()
            .find(|e| e.ordinal == ordinal)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }
}

fn to_xref_record(entry: &XrefEntry) -> XrefRecord {
    XrefRecord { from: entry.from, to: entry.to, kind: entry.kind, is_code: entry.code }
}
