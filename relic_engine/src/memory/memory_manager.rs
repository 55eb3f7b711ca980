use bytemuck::Pod;
use crate::error::Result;
use super::stack_allocator::{Allocation, StackAllocator};

/// Per-frame scratch memory.
///
/// Two stacks alternate: allocations go to the front stack, and
/// `cycle_stacks()` at the end of a frame makes the back stack the new front
/// and clears it. Data allocated during frame N therefore stays readable
/// through the back stack during frame N + 1.
pub struct MemoryManager {
    front: StackAllocator,
    back: StackAllocator,
}

impl MemoryManager {
    /// 256 MiB per stack
    pub const DEFAULT_STACK_SIZE: usize = 256 * 1024 * 1024;

    pub fn new(stack_size: usize) -> Self {
        crate::engine_debug!("relic::MemoryManager",
            "Creating two scratch stacks of {} bytes", stack_size);
        Self {
            front: StackAllocator::new(stack_size),
            back: StackAllocator::new(stack_size),
        }
    }

    /// Zeroed slot for one `T` on the front stack
    pub fn allocate<T: Pod>(&mut self) -> Result<Allocation> {
        self.front.allocate_value(&<T as bytemuck::Zeroable>::zeroed())
    }

    pub fn allocate_bytes(&mut self, size: usize) -> Result<Allocation> {
        self.front.allocate(size)
    }

    /// Swap front and back, then clear the new front
    pub fn cycle_stacks(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
        self.front.clear();
    }

    pub fn front(&self) -> &StackAllocator {
        &self.front
    }

    pub fn front_mut(&mut self) -> &mut StackAllocator {
        &mut self.front
    }

    pub fn back(&self) -> &StackAllocator {
        &self.back
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STACK_SIZE)
    }
}

#[cfg(test)]
#[path = "memory_manager_tests.rs"]
mod tests;
