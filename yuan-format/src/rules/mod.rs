// Formatting rules

pub mod expressions;
pub mod imports;
pub mod indentation;
pub mod spacing;

pub use expressions::*;
pub use imports::*;
pub use indentation::*;
pub use spacing::*;
