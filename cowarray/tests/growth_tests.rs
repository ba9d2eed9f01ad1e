use cowarray::growth::MIN_CAPACITY;
use cowarray::{cow_array, BlockFlags, CowArray};

/// Records every capacity an array goes through while `step` runs `count`
/// times.
fn capacities<F: FnMut(&mut CowArray<usize>, usize)>(count: usize, mut step: F) -> Vec<usize> {
    let mut array = CowArray::new();
    let mut seen = vec![array.capacity()];
    for i in 0..count {
        step(&mut array, i);
        if array.capacity() != *seen.last().unwrap() {
            seen.push(array.capacity());
        }
    }
    seen
}

#[test]
fn test_append_growth_doubles() {
    let seen = capacities(1000, |array, i| array.append(i));
    assert_eq!(seen, [0, 4, 8, 16, 32, 64, 128, 256, 512, 1024]);
}

#[test]
fn test_prepend_growth_is_logarithmic() {
    let seen = capacities(1000, |array, i| array.prepend(i));
    assert!(seen.len() - 1 <= 12, "too many reallocations: {seen:?}");

    let mut array = CowArray::new();
    for i in 0..1000 {
        array.prepend(i);
    }
    assert!(array.iter().copied().eq((0..1000).rev()));
}

#[test]
fn test_alternating_growth_is_logarithmic() {
    let seen = capacities(1000, |array, i| {
        array.append(i);
        array.prepend(i);
    });
    assert!(seen.len() - 1 <= 14, "too many reallocations: {seen:?}");

    let mut array = CowArray::new();
    for i in 0..100 {
        array.append(i);
        array.prepend(i);
    }
    let expected: Vec<i32> = (0..100).rev().chain(0..100).collect();
    assert_eq!(array, expected);
}

#[test]
fn test_first_allocation_uses_minimum_capacity() {
    let mut array = CowArray::new();
    assert_eq!(array.capacity(), 0);
    array.append('a');
    assert_eq!(array.capacity(), MIN_CAPACITY);
}

#[test]
fn test_append_only_puts_slack_at_end() {
    let mut array = CowArray::new();
    for i in 0..5 {
        array.append(i);
    }
    assert_eq!(array.capacity(), 8);
    assert_eq!(array.free_space_at_begin(), 0);
    assert_eq!(array.free_space_at_end(), 3);
    let flags = array.block_info().unwrap().flags;
    assert!(flags.contains(BlockFlags::GROWN_AT_END));
    assert!(!flags.contains(BlockFlags::GROWN_AT_BEGIN));
}

#[test]
fn test_prepend_only_puts_slack_at_begin() {
    let mut array = CowArray::new();
    for i in 0..5 {
        array.prepend(i);
    }
    assert_eq!(array.capacity(), 8);
    assert_eq!(array.free_space_at_begin(), 3);
    assert_eq!(array.free_space_at_end(), 0);
    assert_eq!(array, [4, 3, 2, 1, 0]);
}

#[test]
fn test_two_sided_growth_moves_within_block() {
    let mut array = CowArray::new();
    for i in 0..5 {
        array.prepend(i);
    }
    let before = array.block_info().unwrap();

    // No room at the end, but the block is mostly free: the elements are
    // moved inside it instead of reallocating.
    array.append(5);
    let after = array.block_info().unwrap();
    assert_eq!(after.capacity, before.capacity);
    assert_eq!(array.free_space_at_begin(), 1);
    assert_eq!(array.free_space_at_end(), 1);
    assert!(after
        .flags
        .contains(BlockFlags::GROWN_AT_BEGIN | BlockFlags::GROWN_AT_END));
    assert_eq!(array, [4, 3, 2, 1, 0, 5]);
}

#[test]
fn test_queue_pattern_reuses_block() {
    let mut array = CowArray::new();
    for i in 0..1000 {
        array.append(i);
        if array.len() > 10 {
            assert_eq!(array.take_first(), Some(i - 10));
        }
    }
    assert_eq!(array.len(), 10);
    assert!(array.capacity() <= 16);
}

#[test]
fn test_with_capacity_appends_in_place() {
    let mut array = CowArray::with_capacity(64);
    let base = array.block_info().unwrap();
    for i in 0..64 {
        array.append(i);
    }
    assert_eq!(array.capacity(), 64);
    assert_eq!(array.block_info().unwrap().offset, base.offset);
}

#[test]
fn test_reserve_is_exact_and_flagged() {
    let mut array = cow_array![1, 2, 3];
    array.reserve(100);
    assert_eq!(array.capacity(), 100);
    assert!(array
        .block_info()
        .unwrap()
        .flags
        .contains(BlockFlags::CAPACITY_RESERVED));

    for i in 0..97 {
        array.append(i);
    }
    assert_eq!(array.capacity(), 100);
    assert_eq!(array.len(), 100);
}

#[test]
fn test_reserve_below_capacity_only_sets_flag() {
    let mut array = CowArray::with_capacity(8);
    array.append(1);
    array.reserve(4);
    assert_eq!(array.capacity(), 8);
    assert!(array
        .block_info()
        .unwrap()
        .flags
        .contains(BlockFlags::CAPACITY_RESERVED));
}

#[test]
fn test_reserve_on_shared_array_detaches() {
    let mut a = cow_array![1, 2, 3];
    let b = a.clone();
    a.reserve(2);
    assert!(!a.shares_block_with(&b));
    assert_eq!(a.capacity(), 3);
    assert_eq!(a, b);
}

#[test]
fn test_reserved_capacity_survives_detach_and_clear() {
    let mut a = CowArray::new();
    a.reserve(32);
    a.append_slice(&[1, 2, 3]);

    let mut b = a.clone();
    b.append(4);
    assert_eq!(b.capacity(), 32);

    let mut c = a.clone();
    c.clear();
    assert_eq!(c.capacity(), 32);
    assert!(c.is_empty());
    assert_eq!(a, [1, 2, 3]);
}

#[test]
fn test_squeeze_releases_slack() {
    let mut array = CowArray::new();
    for i in 0..5 {
        array.prepend(i);
    }
    array.reserve(40);
    array.squeeze();
    assert_eq!(array.capacity(), 5);
    assert_eq!(array.free_space_at_begin(), 0);
    assert!(!array
        .block_info()
        .unwrap()
        .flags
        .contains(BlockFlags::CAPACITY_RESERVED));
    assert_eq!(array, [4, 3, 2, 1, 0]);

    array.clear();
    array.squeeze();
    assert_eq!(array.capacity(), 0);
    assert!(array.block_info().is_none());
}

#[test]
fn test_exact_size_iterator_allocates_once() {
    let array: CowArray<u32> = (0..10).collect();
    assert_eq!(array.capacity(), 10);
    assert_eq!(array.free_space_at_end(), 0);

    let array: CowArray<u32> = (0..20).filter(|i| i % 2 == 0).collect();
    assert_eq!(array.len(), 10);
    assert_eq!(array.capacity(), 16);
}

#[test]
fn test_insert_in_middle_shifts_within_block() {
    let mut array = CowArray::with_capacity(16);
    array.append_slice(&[0, 1, 2, 3, 4, 5, 6, 7]);
    array.erase(0, 4);
    assert_eq!(array.free_space_at_begin(), 4);

    array.insert(1, 40);
    assert_eq!(array, [4, 40, 5, 6, 7]);
    assert_eq!(array.capacity(), 16);
    assert_eq!(array.free_space_at_begin(), 3);
}
