//! Flag storage handlers.

mod filesystem;
mod memory;

pub use filesystem::FileFlagStorage;
pub use memory::MemoryFlagStorage;
