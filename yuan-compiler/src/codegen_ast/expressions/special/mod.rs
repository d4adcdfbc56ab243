// Special operations coordinator (unary, postfix, closures, casts)

mod casts;
mod closures;
mod unary;

pub use casts::*;
pub use closures::*;
pub use unary::*;
