// Closure compilation helpers (free-variable capture, struct generation, type inference)

mod utils;
