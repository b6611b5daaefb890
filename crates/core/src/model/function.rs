use crate::backends::FuncRecord;
use crate::db::Database;
use crate::error::DisasmResult;
use crate::model::{FunctionSignature, Line, Reference, ReferenceType};

/// A function known to the host, identified by its entry address.
#[derive(Debug, Clone)]
pub struct Function<'a> {
    db: &'a Database,
    record: FuncRecord,
}

impl<'a> Function<'a> {
    pub(crate) fn new(db: &'a Database, record: FuncRecord) -> Self {
        Self { db, record }
    }

    /// Entry address.
    pub fn start(&self) -> u64 {
        self.record.start
    }

    /// Exclusive end address.
    pub fn end(&self) -> u64 {
        self.record.end
    }

    /// Host name, or `sub_<ENTRY>` for unnamed functions.
    pub fn name(&self) -> String {
        self.record
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.db.get_name(self.record.start).ok())
            .unwrap_or_else(|| format!("sub_{:X}", self.record.start))
    }

    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.record.start && addr < self.record.end
    }

    pub fn signature(&self) -> DisasmResult<FunctionSignature> {
        self.db.get_function_signature(self.record.start)
    }

    /// Item heads in the function body, in address order.
    pub fn lines(&self) -> impl Iterator<Item = Line<'a>> + 'a {
        let db = self.db;
        let end = self.record.end;
        std::iter::successors(Some(self.record.start), move |&addr| db.host().next_head(addr, end))
            .map(move |addr| db.get_line(addr))
    }

    /// Functions holding a call reference to this function's entry.
    ///
    /// Calls from code outside any function are skipped. Unclassifiable
    /// references still surface as errors.
    pub fn callers(&self) -> impl Iterator<Item = DisasmResult<Function<'a>>> + 'a {
        let db = self.db;
        db.references_to(self.record.start).filter_map(move |reference| match reference {
            Ok(r) if r.kind == ReferenceType::CodeCall => {
                db.get_function(r.from_address).ok().map(Ok)
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
    }

    /// References leaving any item of the function body.
    pub fn references_from(&self) -> impl Iterator<Item = DisasmResult<Reference>> + 'a {
        let db = self.db;
        self.lines().flat_map(move |line| db.references_from(line.address()))
    }
}

impl PartialEq for Function<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}
