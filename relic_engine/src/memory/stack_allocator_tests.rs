use super::*;

// ============================================================================
// Allocation tests
// ============================================================================

#[test]
fn test_new_stack_is_empty() {
    let stack = StackAllocator::new(64);
    assert_eq!(stack.capacity(), 64);
    assert_eq!(stack.size(), 64);
    assert_eq!(stack.used(), 0);
    assert_eq!(stack.marker(), Marker(0));
}

#[test]
fn test_sequential_allocations_are_contiguous() {
    let mut stack = StackAllocator::new(64);
    let a = stack.allocate(10).unwrap();
    let b = stack.allocate(6).unwrap();
    assert_eq!(a, Allocation { offset: 0, size: 10 });
    assert_eq!(b.range(), 10..16);
    assert_eq!(stack.size(), 48);
}

#[test]
fn test_exact_fit_then_exhaustion() {
    let mut stack = StackAllocator::new(32);
    stack.allocate(32).unwrap();
    assert_eq!(stack.size(), 0);
    assert_eq!(
        stack.allocate(1).unwrap_err(),
        Error::OutOfMemory { requested: 1, available: 0 }
    );
    // Zero-byte requests always fit
    assert_eq!(stack.allocate(0).unwrap().size, 0);
}

#[test]
fn test_failed_allocation_leaves_head() {
    let mut stack = StackAllocator::new(16);
    stack.allocate(10).unwrap();
    assert!(stack.allocate(7).is_err());
    assert_eq!(stack.marker(), Marker(10));
}

// ============================================================================
// Marker tests
// ============================================================================

#[test]
fn test_free_to_marker_restores_size() {
    let mut stack = StackAllocator::new(100);
    stack.allocate(20).unwrap();
    let frame = stack.marker();
    let before = stack.size();

    stack.allocate(30).unwrap();
    stack.allocate(5).unwrap();
    stack.free_to_marker(frame).unwrap();

    assert_eq!(stack.size(), before);
    assert_eq!(stack.allocate(1).unwrap().offset, 20);
}

#[test]
fn test_markers_need_not_nest() {
    let mut stack = StackAllocator::new(100);
    let early = stack.marker();
    stack.allocate(40).unwrap();
    let late = stack.marker();
    stack.free_to_marker(early).unwrap();
    // Jumping forward again is accepted
    stack.free_to_marker(late).unwrap();
    assert_eq!(stack.used(), 40);
}

#[test]
fn test_marker_past_capacity_is_rejected() {
    let mut stack = StackAllocator::new(16);
    stack.allocate(4).unwrap();
    assert!(matches!(stack.free_to_marker(Marker(17)), Err(Error::InvalidMarker(_))));
    assert_eq!(stack.used(), 4);
    stack.free_to_marker(Marker(16)).unwrap();
    assert_eq!(stack.size(), 0);
}

#[test]
fn test_clear_releases_everything() {
    let mut stack = StackAllocator::new(16);
    stack.allocate(16).unwrap();
    stack.clear();
    assert_eq!(stack.size(), 16);
    assert_eq!(stack.marker(), Marker(0));
}

// ============================================================================
// Data access tests
// ============================================================================

#[test]
fn test_value_round_trip() {
    let mut stack = StackAllocator::new(64);
    stack.allocate(3).unwrap(); // unaligned start
    let slot = stack.allocate_value(&[1.0f32, 2.0, 3.0]).unwrap();
    assert_eq!(slot.offset, 3);
    assert_eq!(stack.read_value::<[f32; 3]>(&slot).unwrap(), [1.0, 2.0, 3.0]);
}

#[test]
fn test_read_value_checks_size() {
    let mut stack = StackAllocator::new(64);
    let slot = stack.allocate_value(&7u16).unwrap();
    assert_eq!(
        stack.read_value::<u32>(&slot).unwrap_err(),
        Error::SizeMismatch { expected: 4, actual: 2 }
    );
}

#[test]
fn test_bytes_mut_writes_are_visible() {
    let mut stack = StackAllocator::new(8);
    let a = stack.allocate(4).unwrap();
    stack.bytes_mut(&a).unwrap().copy_from_slice(&[9, 8, 7, 6]);
    assert_eq!(stack.bytes(&a).unwrap(), &[9, 8, 7, 6]);
}

#[test]
fn test_released_allocation_is_not_accessible() {
    let mut stack = StackAllocator::new(8);
    let a = stack.allocate(4).unwrap();
    stack.clear();
    assert!(matches!(stack.bytes(&a), Err(Error::InvalidMarker(_))));
}

#[test]
fn test_value_does_not_fit() {
    let mut stack = StackAllocator::new(4);
    assert!(matches!(
        stack.allocate_value(&0u64),
        Err(Error::OutOfMemory { requested: 8, available: 4 })
    ));
}
