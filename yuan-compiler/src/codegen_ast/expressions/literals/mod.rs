// Literal compilation modules
pub(crate) mod arrays;
pub(crate) mod maps;
pub(crate) mod structs_tuples;

// Re-export public APIs
pub(crate) use arrays::*;
pub(crate) use maps::*;
pub(crate) use structs_tuples::*;
