//! Scoped scratch allocators
//!
//! Fixed arenas released by marker rollback instead of per-allocation frees.

mod stack_allocator;
mod double_headed_stack_allocator;
mod memory_manager;

pub use stack_allocator::{Allocation, Marker, StackAllocator};
pub use double_headed_stack_allocator::DoubleHeadedStackAllocator;
pub use memory_manager::MemoryManager;
