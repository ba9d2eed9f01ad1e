use cowarray::{cow_array, ArrayError, CowArray};

#[test]
fn test_search_after_erase() {
    let mut array = cow_array![0, 1, 2, 0];
    array.erase(1, 2);
    assert_eq!(array, [0, 2, 0]);
    assert_eq!(array.index_of(&0, 1), Some(2));
    assert_eq!(array.index_of(&2, 0), Some(1));
    assert_eq!(array.last_index_of(&0, -1), Some(2));
    assert!(!array.contains(&5));
}

#[test]
fn test_index_of_from_positions() {
    let array = cow_array!['a', 'b', 'a', 'c', 'a'];
    assert_eq!(array.index_of(&'a', 0), Some(0));
    assert_eq!(array.index_of(&'a', 1), Some(2));
    assert_eq!(array.index_of(&'a', 3), Some(4));
    assert_eq!(array.index_of(&'c', 4), None);
    assert_eq!(array.index_of(&'a', 5), None);
    assert_eq!(array.index_of(&'a', 100), None);

    // Negative positions count from the end.
    assert_eq!(array.index_of(&'a', -1), Some(4));
    assert_eq!(array.index_of(&'b', -2), None);
    assert_eq!(array.index_of(&'b', -4), Some(1));
    assert_eq!(array.index_of(&'b', -100), Some(1));
}

#[test]
fn test_last_index_of_from_positions() {
    let array = cow_array!['a', 'b', 'a', 'c', 'a'];
    assert_eq!(array.last_index_of(&'a', -1), Some(4));
    assert_eq!(array.last_index_of(&'a', -2), Some(2));
    assert_eq!(array.last_index_of(&'a', 3), Some(2));
    assert_eq!(array.last_index_of(&'a', 1), Some(0));
    assert_eq!(array.last_index_of(&'b', 0), None);
    assert_eq!(array.last_index_of(&'c', -5), None);
    assert_eq!(array.last_index_of(&'a', -5), Some(0));
    assert_eq!(array.last_index_of(&'a', -6), None);

    // Past the end starts at the last element.
    assert_eq!(array.last_index_of(&'a', 100), Some(4));
}

#[test]
fn test_search_empty_array() {
    let array: CowArray<i32> = CowArray::new();
    assert_eq!(array.index_of(&1, 0), None);
    assert_eq!(array.index_of(&1, -1), None);
    assert_eq!(array.last_index_of(&1, -1), None);
    assert_eq!(array.last_index_of(&1, 0), None);
    assert!(!array.contains(&1));
    assert_eq!(array.count(&1), 0);
}

#[test]
fn test_count_and_contains() {
    let array = cow_array!["x", "y", "x", "x"];
    assert_eq!(array.count(&"x"), 3);
    assert_eq!(array.count(&"z"), 0);
    assert!(array.contains(&"y"));
    assert!(array.ends_with(&["x", "x"]));
}

#[test]
fn test_search_on_shared_array_does_not_detach() {
    let a = cow_array![5, 6, 7];
    let b = a.clone();
    assert_eq!(b.index_of(&7, 0), Some(2));
    assert_eq!(b.last_index_of(&5, -1), Some(0));
    assert_eq!(b.count(&6), 1);
    assert!(a.shares_block_with(&b));
}

#[test]
fn test_position_of_element_reference() {
    let array = cow_array![10, 20, 30];
    let element = &array[2];
    assert_eq!(array.position_of(element), Ok(2));
    assert_eq!(array.position_of(array.first().unwrap()), Ok(0));

    let other = cow_array![10, 20, 30];
    assert_eq!(
        other.position_of(element),
        Err(ArrayError::InvalidElementRef)
    );

    let local = 20;
    assert_eq!(array.position_of(&local), Err(ArrayError::InvalidElementRef));
}

#[test]
fn test_position_of_across_detach() {
    let a = cow_array![1, 2, 3];
    let mut b = a.clone();
    // A reference into the shared block is valid for both arrays until one
    // of them detaches.
    assert_eq!(b.position_of(&a[1]), Ok(1));
    b.detach();
    assert_eq!(b.position_of(&a[1]), Err(ArrayError::InvalidElementRef));
    assert_eq!(b.position_of(&b[1]), Ok(1));
}

#[test]
fn test_position_of_zero_sized_elements() {
    let array = cow_array![(), ()];
    assert_eq!(array.position_of(&array[0]), Err(ArrayError::InvalidElementRef));
}
