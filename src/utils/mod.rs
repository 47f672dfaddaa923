pub mod debug;
pub mod runtime;

pub use debug::{init_logging, DEBUG_MODE};
pub use runtime::{block_on, GLOBAL_RUNTIME};
