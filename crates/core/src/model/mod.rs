//! Normalized object model returned by the database facade.
//!
//! Adapter objects (`Function`, `Segment`, `GlobalVariable`, `Line`, `Memory`)
//! borrow the [`Database`](crate::db::Database) they came from so they can
//! issue follow-up queries. Value objects (`Reference`, `Import`, `Export`,
//! `DataType`, ...) are plain data and serialize directly.

pub mod function;
pub mod line;
pub mod memory;
pub mod reference;
pub mod segment;
pub mod symbol;
pub mod types;
pub mod variable;

pub use function::Function;
pub use line::Line;
pub use memory::Memory;
pub use reference::{Reference, ReferenceType};
pub use segment::{Permissions, Segment};
pub use symbol::{Export, Import};
pub use types::{DataType, FunctionSignature, Parameter, Register};
pub use variable::GlobalVariable;
