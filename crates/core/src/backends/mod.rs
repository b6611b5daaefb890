//! Host analysis engine port.
//!
//! The facade in [`crate::db`] never talks to a disassembler directly; it goes
//! through [`HostEngine`], a narrow trait mirroring the primitive calls a host
//! scripting surface offers. Each method keeps the host's native failure
//! convention (`BAD_ADDRESS`, `-1`, `None`, `false`) so the normalization rules
//! live in one place and can be exercised against any implementation.
//!
//! Implementations:
//! - [`SnapshotHost`]: an exported analysis database held in memory.

pub mod snapshot;

pub use snapshot::{AnalysisSnapshot, SnapshotHost};

/// Sentinel returned by the host for "no such address".
pub const BAD_ADDRESS: u64 = u64::MAX;

/// Host version from which `app_bitness` is available.
pub const BITNESS_QUERY_MIN_VERSION: u32 = 760;

/// Upper bound the host applies when measuring a string literal.
pub const MAX_STRLIT_LENGTH: usize = 4096;

/// Raw function record (function chunk owning the entry point).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncRecord {
    pub start: u64,
    pub end: u64,
    pub name: Option<String>,
}

/// Raw segment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRecord {
    pub name: String,
    pub start: u64,
    pub end: u64,
    pub bitness: u32,
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
}

/// Raw cross-reference record as the host's xref iterator yields it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrefRecord {
    pub from: u64,
    pub to: u64,
    /// Host-specific reference type code.
    pub kind: u8,
    pub is_code: bool,
}

/// Entry of the host's type library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRecord {
    pub name: String,
    pub size: usize,
    pub pointee: Option<Box<TypeRecord>>,
}

impl TypeRecord {
    pub fn is_pointer(&self) -> bool {
        self.pointee.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRecord {
    pub name: String,
    pub number: u32,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    pub name: String,
    pub type_name: String,
}

/// Prototype the host associates with a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRecord {
    pub address: u64,
    pub declaration: String,
    pub return_type: String,
    pub calling_convention: String,
    pub parameters: Vec<ParameterRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub address: u64,
    pub name: String,
    pub namespace: String,
}

/// String literal encodings understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrType {
    /// Zero-terminated 8-bit string.
    C,
    /// Zero-terminated 16-bit string.
    C16,
    /// Zero-terminated 32-bit string.
    C32,
}

impl StrType {
    /// Size in bytes of one character unit.
    pub fn unit_size(self) -> usize {
        match self {
            StrType::C => 1,
            StrType::C16 => 2,
            StrType::C32 => 4,
        }
    }

    pub fn from_bit_width(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(StrType::C),
            16 => Some(StrType::C16),
            32 => Some(StrType::C32),
            _ => None,
        }
    }
}

/// Primitive surface of a host analysis engine.
///
/// Methods take `&self`; hosts that support patching use interior mutability.
/// Enumerations are lazy and borrow the host for their lifetime.
pub trait HostEngine {
    /// Human-readable host name.
    fn name(&self) -> &str;

    fn sdk_version(&self) -> u32;

    /// Application bitness. Only consulted when `sdk_version` is at least
    /// [`BITNESS_QUERY_MIN_VERSION`].
    fn app_bitness(&self) -> u32;
    fn is_64bit(&self) -> bool;
    fn is_32bit(&self) -> bool;
    fn is_big_endian(&self) -> bool;
    fn min_ea(&self) -> u64;
    fn max_ea(&self) -> u64;
    fn procname(&self) -> String;

    /// Whether every byte of `[addr, addr + len)` has content.
    fn is_loaded(&self, addr: u64, len: usize) -> bool;
    fn wide_byte(&self, addr: u64) -> u8;
    fn wide_word(&self, addr: u64) -> u16;
    fn wide_dword(&self, addr: u64) -> u32;
    fn qword(&self, addr: u64) -> u64;
    /// Read `len` bytes, substituting `fill` for unloaded positions.
    fn bytes(&self, addr: u64, len: usize, fill: u8) -> Vec<u8>;
    /// Overwrite loaded bytes. Returns `false` if any target byte is unloaded.
    fn patch_bytes(&self, addr: u64, data: &[u8]) -> bool;

    /// Linear address for a file offset, or [`BAD_ADDRESS`].
    fn fileregion_ea(&self, offset: u64) -> u64;
    /// File offset for a linear address, or `-1`.
    fn fileregion_offset(&self, addr: u64) -> i64;

    /// Function entry addresses intersecting `[start, end)`, in address order.
    ///
    /// Hosts may include a function that begins before `start` but spans it.
    fn function_entries(
        &self,
        start: Option<u64>,
        end: Option<u64>,
    ) -> Box<dyn Iterator<Item = u64> + '_>;
    /// Function containing `addr`.
    fn func_at(&self, addr: u64) -> Option<FuncRecord>;
    fn func_signature(&self, addr: u64) -> Option<SignatureRecord>;

    fn parse_reg_name(&self, name: &str) -> Option<RegisterRecord>;

    fn segment_by_name(&self, name: &str) -> Option<SegmentRecord>;
    fn segment_containing(&self, addr: u64) -> Option<SegmentRecord>;
    fn segment_count(&self) -> usize;
    fn segment_at_index(&self, index: usize) -> Option<SegmentRecord>;

    /// Native string encoding of the item at `addr`.
    fn str_type(&self, addr: u64) -> StrType;
    /// Literal length in bytes, terminator included.
    fn max_strlit_length(&self, addr: u64, str_type: StrType) -> usize;
    fn strlit_contents(&self, addr: u64, len: usize, str_type: StrType) -> Option<Vec<u8>>;

    /// Case-sensitive lookup in the host type library.
    fn named_type(&self, name: &str) -> Option<TypeRecord>;
    fn create_ptr(&self, base: &TypeRecord) -> TypeRecord;
    /// Type applied to the item at `addr`.
    fn item_type(&self, addr: u64) -> Option<TypeRecord>;

    fn xrefs_from(&self, addr: u64) -> Box<dyn Iterator<Item = XrefRecord> + '_>;
    fn xrefs_to(&self, addr: u64) -> Box<dyn Iterator<Item = XrefRecord> + '_>;

    /// Start of the item containing `addr`.
    fn item_head(&self, addr: u64) -> u64;
    /// Exclusive end of the item containing `addr`.
    fn item_end(&self, addr: u64) -> u64;
    /// First item head after `addr` and before `limit`.
    fn next_head(&self, addr: u64, limit: u64) -> Option<u64>;
    fn is_code(&self, addr: u64) -> bool;
    fn name_at(&self, addr: u64) -> Option<String>;

    fn imports(&self) -> Box<dyn Iterator<Item = ImportRecord> + '_>;
    fn entry_count(&self) -> usize;
    fn entry_ordinal(&self, index: usize) -> u64;
    fn entry_address(&self, ordinal: u64) -> u64;
    fn entry_name(&self, ordinal: u64) -> String;
}
