// Field access, indexing, and f-string coordinator

mod field_access;
mod fstring;
mod indexing;

pub use field_access::*;
pub use fstring::*;
pub use indexing::*;
