use crate::error::{Error, Result};
use super::stack_allocator::{Allocation, Marker};

/// Scratch allocator with two heads sharing one arena.
///
/// The bottom head grows up from offset 0 and the top head grows down from
/// the capacity; a top allocation of `n` bytes occupies `[top - n, top)`.
/// The heads may meet but never cross.
pub struct DoubleHeadedStackAllocator {
    buffer: Box<[u8]>,
    bottom: usize,
    top: usize,
}

impl DoubleHeadedStackAllocator {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            bottom: 0,
            top: capacity,
        }
    }

    /// Reserve `size` bytes from the top or bottom head
    pub fn allocate(&mut self, size: usize, top: bool) -> Result<Allocation> {
        let available = self.size();
        if size > available {
            crate::engine_error!("relic::DoubleHeadedStackAllocator",
                "Cannot service request of {} bytes ({} available)", size, available);
            return Err(Error::OutOfMemory { requested: size, available });
        }

        let allocation = if top {
            self.top -= size;
            Allocation { offset: self.top, size }
        } else {
            let offset = self.bottom;
            self.bottom += size;
            Allocation { offset, size }
        };
        Ok(allocation)
    }

    pub fn marker(&self, top: bool) -> Marker {
        Marker(if top { self.top } else { self.bottom })
    }

    /// Roll one head back (or forward) to `marker`
    ///
    /// # Errors
    ///
    /// `InvalidMarker` (logged, heads unchanged) when the head would cross
    /// the other head or leave the arena.
    pub fn free_to_marker(&mut self, marker: Marker, top: bool) -> Result<()> {
        let valid = if top {
            marker.0 >= self.bottom && marker.0 <= self.capacity()
        } else {
            marker.0 <= self.top
        };
        if !valid {
            let head = if top { "top" } else { "bottom" };
            crate::engine_error!("relic::DoubleHeadedStackAllocator",
                "Marker {} would move the {} head into the other head's space, not rolling back",
                marker.0, head);
            return Err(Error::InvalidMarker(format!(
                "{} marker {} outside [{}, {}]",
                head,
                marker.0,
                if top { self.bottom } else { 0 },
                if top { self.capacity() } else { self.top }
            )));
        }

        if top {
            self.top = marker.0;
        } else {
            self.bottom = marker.0;
        }
        Ok(())
    }

    /// Reset both heads
    pub fn clear(&mut self) {
        self.bottom = 0;
        self.top = self.capacity();
    }

    /// Free bytes between the heads
    pub fn size(&self) -> usize {
        self.top - self.bottom
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    fn check_live(&self, allocation: &Allocation) -> Result<()> {
        let end = allocation.offset.checked_add(allocation.size);
        let live = match end {
            Some(end) => end <= self.bottom || (allocation.offset >= self.top && end <= self.capacity()),
            None => false,
        };
        if !live {
            return Err(Error::InvalidMarker(format!(
                "Allocation at {} (+{}) is not live (bottom {}, top {})",
                allocation.offset, allocation.size, self.bottom, self.top
            )));
        }
        Ok(())
    }

    pub fn bytes(&self, allocation: &Allocation) -> Result<&[u8]> {
        self.check_live(allocation)?;
        Ok(&self.buffer[allocation.range()])
    }

    pub fn bytes_mut(&mut self, allocation: &Allocation) -> Result<&mut [u8]> {
        self.check_live(allocation)?;
        Ok(&mut self.buffer[allocation.range()])
    }
}

#[cfg(test)]
#[path = "double_headed_stack_allocator_tests.rs"]
mod tests;
