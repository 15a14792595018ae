pub mod index;
pub mod markdown;

pub use index::{write_index, IndexEntry};
pub use markdown::{emit, EmitOutcome};
