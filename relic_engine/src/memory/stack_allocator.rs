use std::ops::Range;
use bytemuck::Pod;
use crate::error::{Error, Result};

/// Byte offset of an allocator head.
///
/// Taken with `marker()` and handed back to `free_to_marker()` to release
/// everything allocated after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marker(pub usize);

impl Marker {
    pub fn offset(self) -> usize {
        self.0
    }
}

/// Region handed out by an arena allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub offset: usize,
    pub size: usize,
}

impl Allocation {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }
}

/// Linear scratch allocator over a fixed arena.
///
/// Allocation bumps a single head; memory is only released by rolling the
/// head back to a marker or clearing the whole stack. Released bytes are not
/// scrubbed.
///
/// # Example
///
/// ```ignore
/// let mut stack = StackAllocator::new(64);
/// let frame = stack.marker();
/// let a = stack.allocate(16)?;   // [0, 16)
/// stack.free_to_marker(frame)?;  // a is released
/// ```
pub struct StackAllocator {
    buffer: Box<[u8]>,
    current: usize,
}

impl StackAllocator {
    /// Create a stack owning `capacity` zeroed bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            current: 0,
        }
    }

    /// Reserve `size` bytes at the head
    ///
    /// # Errors
    ///
    /// `OutOfMemory` (logged) when fewer than `size` bytes remain.
    pub fn allocate(&mut self, size: usize) -> Result<Allocation> {
        let available = self.size();
        if size > available {
            crate::engine_error!("relic::StackAllocator",
                "Cannot service request of {} bytes ({} available)", size, available);
            return Err(Error::OutOfMemory { requested: size, available });
        }

        let allocation = Allocation { offset: self.current, size };
        self.current += size;
        Ok(allocation)
    }

    /// Copy a plain-data value onto the stack
    pub fn allocate_value<T: Pod>(&mut self, value: &T) -> Result<Allocation> {
        let allocation = self.allocate(std::mem::size_of::<T>())?;
        self.bytes_mut(&allocation)?.copy_from_slice(bytemuck::bytes_of(value));
        Ok(allocation)
    }

    /// Read back a value stored with [`allocate_value`](Self::allocate_value)
    pub fn read_value<T: Pod>(&self, allocation: &Allocation) -> Result<T> {
        if allocation.size != std::mem::size_of::<T>() {
            return Err(Error::SizeMismatch {
                expected: std::mem::size_of::<T>(),
                actual: allocation.size,
            });
        }
        Ok(bytemuck::pod_read_unaligned(self.bytes(allocation)?))
    }

    fn check_live(&self, allocation: &Allocation) -> Result<()> {
        match allocation.offset.checked_add(allocation.size) {
            Some(end) if end <= self.current => Ok(()),
            _ => Err(Error::InvalidMarker(format!(
                "Allocation at {} (+{}) is not live below head {}",
                allocation.offset, allocation.size, self.current
            ))),
        }
    }

    /// Bytes of a live allocation
    pub fn bytes(&self, allocation: &Allocation) -> Result<&[u8]> {
        self.check_live(allocation)?;
        Ok(&self.buffer[allocation.range()])
    }

    pub fn bytes_mut(&mut self, allocation: &Allocation) -> Result<&mut [u8]> {
        self.check_live(allocation)?;
        Ok(&mut self.buffer[allocation.range()])
    }

    /// Current head
    pub fn marker(&self) -> Marker {
        Marker(self.current)
    }

    /// Move the head back to `marker`
    ///
    /// Markers are not required to nest; any marker within the arena is
    /// accepted.
    ///
    /// # Errors
    ///
    /// `InvalidMarker` (logged) when `marker` lies past the end of the arena.
    pub fn free_to_marker(&mut self, marker: Marker) -> Result<()> {
        if marker.0 > self.capacity() {
            crate::engine_error!("relic::StackAllocator",
                "Marker {} lies outside the {}-byte arena", marker.0, self.capacity());
            return Err(Error::InvalidMarker(format!(
                "marker {} exceeds capacity {}",
                marker.0,
                self.capacity()
            )));
        }
        self.current = marker.0;
        Ok(())
    }

    /// Release every allocation
    pub fn clear(&mut self) {
        self.current = 0;
    }

    /// Remaining allocatable bytes
    pub fn size(&self) -> usize {
        self.capacity() - self.current
    }

    /// Bytes currently allocated
    pub fn used(&self) -> usize {
        self.current
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
#[path = "stack_allocator_tests.rs"]
mod tests;
