pub mod memory;
pub mod store;

// Re-export the contract and the default implementation for external use
pub use memory::MemoryStore;
pub use store::{SchedulingStore, SlotGuard};
