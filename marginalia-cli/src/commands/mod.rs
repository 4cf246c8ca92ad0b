//! CLI command implementations

mod collect;
mod inspect;

pub use collect::collect;
pub use inspect::inspect;
