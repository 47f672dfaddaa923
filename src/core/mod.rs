pub mod resolve;
pub mod segments;
pub mod statusline;

pub use resolve::{resolve_instance, ModuleInstance};
pub use segments::{Collector, SegmentData};
pub use statusline::{assemble_line, Segment, StatusLineGenerator};
