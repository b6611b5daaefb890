pub mod functions;
pub mod info;
pub mod memory;
pub mod segments;
pub mod symbols;
pub mod types;
pub mod xrefs;

pub use functions::*;
pub use info::*;
pub use memory::*;
pub use segments::*;
pub use symbols::*;
pub use types::*;
pub use xrefs::*;
