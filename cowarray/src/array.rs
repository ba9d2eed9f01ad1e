use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::iter;
use core::mem;
use core::ops::{Bound, Deref, Index, IndexMut, RangeBounds};

use crate::block::{self, BlockFlags, BlockInfo};
use crate::error::ArrayError;
use crate::growth::GrowthDirection;
use crate::handle::{Gap, Handle};
use crate::iter::{Iter, IterMut};

/// A growable array whose clones share one allocation until mutated
///
/// Cloning is O(1): the clone takes another reference to the same block.
/// The first mutation through a handle whose block is shared copies the
/// elements into a private block; mutations of an exclusive block happen in
/// place. Reading never copies.
///
/// Free slots may sit on both sides of the elements, so both `append` and
/// `prepend` are amortized O(1).
///
/// Mutating methods require `T: Clone`, since a shared block can only be
/// privatised by cloning its elements.
pub struct CowArray<T> {
    handle: Handle<T>,
}

#[track_caller]
fn check_index(index: usize, len: usize) {
    assert!(
        index < len,
        "Index {index} out of bounds for array of length {len}"
    );
}

#[track_caller]
fn check_position(index: usize, len: usize) {
    assert!(
        index <= len,
        "Insertion index {index} out of bounds for array of length {len}"
    );
}

#[track_caller]
fn check_range(start: usize, end: usize, len: usize) {
    assert!(
        start <= end && end <= len,
        "Range {start}..{end} out of bounds for array of length {len}"
    );
}

fn range_bounds<R: RangeBounds<usize>>(range: &R, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    (start, end)
}

fn growth_direction(index: usize, len: usize) -> GrowthDirection {
    if index == 0 && len > 0 {
        GrowthDirection::AtBegin
    } else {
        GrowthDirection::AtEnd
    }
}

impl<T> CowArray<T> {
    /// Creates an empty array. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handle: Handle::new(),
        }
    }

    /// Creates an empty array with room for `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the capacity overflows; aborts through
    /// `handle_alloc_error` if the allocation fails.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(array) => array,
            Err(error) => block::allocation_failure::<T>(error),
        }
    }

    /// Creates an empty array with room for `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::CapacityOverflow` or `ArrayError::OutOfMemory`
    /// if the block cannot be allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Ok(Self {
            handle: Handle::with_capacity(capacity)?,
        })
    }

    pub(crate) fn into_handle(self) -> Handle<T> {
        self.handle
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handle.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handle.len() == 0
    }

    /// Number of element slots in the block, free slots on both sides
    /// included.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.handle.capacity()
    }

    /// Free slots before the first element.
    #[must_use]
    pub fn free_space_at_begin(&self) -> usize {
        self.handle.free_space_at_begin()
    }

    /// Free slots after the last element.
    #[must_use]
    pub fn free_space_at_end(&self) -> usize {
        self.handle.free_space_at_end()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.handle.as_slice()
    }

    /// Gets the element at the specified index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Gets the element at the specified index.
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::IndexOutOfBounds` if the index is out of bounds.
    pub fn try_get(&self, index: usize) -> Result<&T, ArrayError> {
        self.get(index).ok_or(ArrayError::IndexOutOfBounds {
            index,
            length: self.len(),
        })
    }

    /// Gets the element at the specified index. Never detaches.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[must_use]
    #[track_caller]
    pub fn at(&self, index: usize) -> &T {
        check_index(index, self.len());
        &self.as_slice()[index]
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns an iterator over the elements. Never detaches.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.as_slice())
    }

    /// Whether another array references the same block.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.handle.is_shared()
    }

    /// Whether this array may be mutated without copying.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        !self.handle.is_shared()
    }

    /// Number of arrays referencing this array's block, 0 when there is no
    /// block.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        self.handle.ref_count()
    }

    #[must_use]
    pub fn shares_block_with(&self, other: &Self) -> bool {
        self.handle.shares_block_with(&other.handle)
    }

    /// Snapshot of the block header, `None` for an array without a block.
    #[must_use]
    pub fn block_info(&self) -> Option<BlockInfo> {
        self.handle.info()
    }

    /// Finds the index of an element from a reference into this array.
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::InvalidElementRef` if `element` does not point at
    /// an element of this array's block, for instance because it was taken
    /// before a detach or from another array. Zero-sized elements have no
    /// address and are always rejected.
    pub fn position_of(&self, element: &T) -> Result<usize, ArrayError> {
        let size = mem::size_of::<T>();
        let range = self.as_slice().as_ptr_range();
        let ptr: *const T = element;
        if size == 0 || !range.contains(&ptr) {
            return Err(ArrayError::InvalidElementRef);
        }
        let distance = ptr as usize - range.start as usize;
        if distance % size != 0 {
            return Err(ArrayError::InvalidElementRef);
        }
        Ok(distance / size)
    }

    /// Removes all elements.
    ///
    /// An exclusive block keeps its capacity. A shared block is released
    /// without copying anything, unless its capacity was reserved, in which
    /// case an empty block of the same capacity is allocated.
    pub fn clear(&mut self) {
        if let Err(error) = self.handle.clear() {
            block::allocation_failure::<T>(error);
        }
    }
}

impl<T: PartialEq> CowArray<T> {
    /// Index of the first element equal to `value`, searching forward from
    /// `from`. A negative `from` counts from the end.
    ///
    /// ```
    /// # use cowarray::cow_array;
    /// let array = cow_array![0, 2, 0];
    /// assert_eq!(array.index_of(&0, 1), Some(2));
    /// assert_eq!(array.index_of(&0, -1), Some(2));
    /// assert_eq!(array.index_of(&5, 0), None);
    /// ```
    #[must_use]
    pub fn index_of(&self, value: &T, from: isize) -> Option<usize> {
        let len = self.len();
        let start = if from < 0 {
            len.saturating_sub(from.unsigned_abs())
        } else {
            from.unsigned_abs()
        };
        self.as_slice()
            .get(start..)?
            .iter()
            .position(|item| item == value)
            .map(|index| index + start)
    }

    /// Index of the last element equal to `value`, searching backward from
    /// `from`. A negative `from` counts from the end; `from` past the end
    /// starts at the last element.
    #[must_use]
    pub fn last_index_of(&self, value: &T, from: isize) -> Option<usize> {
        let last = self.len().checked_sub(1)?;
        let start = if from < 0 {
            self.len().checked_sub(from.unsigned_abs())?
        } else {
            from.unsigned_abs().min(last)
        };
        self.as_slice()[..=start]
            .iter()
            .rposition(|item| item == value)
    }

    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.as_slice().contains(value)
    }

    /// Number of elements equal to `value`.
    #[must_use]
    pub fn count(&self, value: &T) -> usize {
        self.iter().filter(|item| *item == value).count()
    }
}

impl<T: Clone> CowArray<T> {
    /// Creates an array of `count` clones of `value`.
    #[must_use]
    pub fn filled(count: usize, value: T) -> Self {
        let mut array = Self::with_capacity(count);
        array.insert_n(0, count, value);
        array
    }

    fn open(&mut self, direction: GrowthDirection, at: usize, extra: usize) -> Gap<'_, T> {
        match self.handle.detach_and_grow(direction, at, extra) {
            Ok(gap) => gap,
            Err(error) => block::allocation_failure::<T>(error),
        }
    }

    /// Makes this array the only reference to its block, copying the
    /// elements if the block is shared. Does nothing on an exclusive array.
    pub fn detach(&mut self) {
        if let Err(error) = self.handle.detach() {
            block::allocation_failure::<T>(error);
        }
    }

    /// Detaches and returns the elements for mutation.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self.handle.make_mut() {
            Ok(elements) => elements,
            Err(error) => block::allocation_failure::<T>(error),
        }
    }

    /// Gets a mutable reference to the element at `index`, detaching first.
    ///
    /// Returns `None` without detaching if the index is out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        self.as_mut_slice().get_mut(index)
    }

    pub fn first_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        self.as_mut_slice().first_mut()
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        self.as_mut_slice().last_mut()
    }

    /// Returns a mutable iterator, detaching once up front.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.as_mut_slice())
    }

    /// Adds an element at the end. Amortized O(1).
    pub fn append(&mut self, value: T) {
        let len = self.len();
        self.open(GrowthDirection::AtEnd, len, 1).push(value);
    }

    /// Adds an element at the end.
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::OutOfMemory` or `ArrayError::CapacityOverflow`
    /// if the array has to grow and cannot. The array is left unchanged.
    pub fn try_append(&mut self, value: T) -> Result<(), ArrayError> {
        let len = self.len();
        let mut gap = self
            .handle
            .detach_and_grow(GrowthDirection::AtEnd, len, 1)?;
        gap.push(value);
        Ok(())
    }

    /// Adds an element at the beginning. Amortized O(1).
    pub fn prepend(&mut self, value: T) {
        self.open(GrowthDirection::AtBegin, 0, 1).push(value);
    }

    /// Inserts an element before `index`.
    ///
    /// Inserting at 0 grows like `prepend`, inserting at `len()` like
    /// `append`; in between, the shorter side of the array is shifted.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) {
        let len = self.len();
        check_position(index, len);
        self.open(growth_direction(index, len), index, 1).push(value);
    }

    /// Inserts an element before `index`.
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::IndexOutOfBounds` if `index > len()`, or an
    /// allocation error if the array cannot grow.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), ArrayError> {
        let len = self.len();
        if index > len {
            return Err(ArrayError::IndexOutOfBounds { index, length: len });
        }
        let mut gap = self
            .handle
            .detach_and_grow(growth_direction(index, len), index, 1)?;
        gap.push(value);
        Ok(())
    }

    /// Inserts `count` clones of `value` before `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) {
        let len = self.len();
        check_position(index, len);
        if count == 0 {
            return;
        }
        self.open(growth_direction(index, len), index, count)
            .fill_from(iter::repeat(value).take(count));
    }

    /// Inserts clones of `items` before `index`, in order.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn insert_from_slice(&mut self, index: usize, items: &[T]) {
        let len = self.len();
        check_position(index, len);
        if items.is_empty() {
            return;
        }
        self.open(growth_direction(index, len), index, items.len())
            .fill_from(items.iter().cloned());
    }

    pub fn append_slice(&mut self, items: &[T]) {
        self.insert_from_slice(self.len(), items);
    }

    pub fn prepend_slice(&mut self, items: &[T]) {
        if items.is_empty() {
            return;
        }
        self.open(GrowthDirection::AtBegin, 0, items.len())
            .fill_from(items.iter().cloned());
    }

    /// Appends the elements of `other`.
    ///
    /// If this array is empty and has no reserved capacity, it simply shares
    /// `other`'s block.
    pub fn extend_from_array(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() && !self.handle.flags().contains(BlockFlags::CAPACITY_RESERVED) {
            *self = other.clone();
            return;
        }
        self.append_slice(other.as_slice());
    }

    fn extend_from_iter<I: Iterator<Item = T>>(&mut self, mut items: I) {
        let (lower, _) = items.size_hint();
        if lower > 0 {
            let len = self.len();
            self.open(GrowthDirection::AtEnd, len, lower)
                .fill_from(items.by_ref());
        }
        for value in items {
            self.append(value);
        }
    }

    /// Removes the elements in `[start, end)`.
    ///
    /// Removing a prefix or a suffix only moves the bounds of the live range;
    /// removing from the middle shifts whichever side is shorter. A shared
    /// array copies only the surviving elements.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end > len()`.
    #[track_caller]
    pub fn erase(&mut self, start: usize, end: usize) {
        check_range(start, end, self.len());
        if let Err(error) = self.handle.erase(start, end) {
            block::allocation_failure::<T>(error);
        }
    }

    /// Removes the elements in `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::InvalidRange` if the range is reversed or ends
    /// past `len()`, or an allocation error if a shared array cannot be
    /// copied.
    pub fn try_erase(&mut self, start: usize, end: usize) -> Result<(), ArrayError> {
        let length = self.len();
        if start > end || end > length {
            return Err(ArrayError::InvalidRange { start, end, length });
        }
        self.handle.erase(start, end)
    }

    /// Removes the elements in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    #[track_caller]
    pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let (start, end) = range_bounds(&range, self.len());
        self.erase(start, end);
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        check_index(index, self.len());
        match self.handle.take(index) {
            Ok(value) => value,
            Err(error) => block::allocation_failure::<T>(error),
        }
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::IndexOutOfBounds` if the index is out of bounds.
    pub fn try_remove(&mut self, index: usize) -> Result<T, ArrayError> {
        let length = self.len();
        if index >= length {
            return Err(ArrayError::IndexOutOfBounds { index, length });
        }
        self.handle.take(index)
    }

    /// Removes the first element. Returns `false` if the array was empty.
    pub fn remove_first(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.erase(0, 1);
        true
    }

    /// Removes the last element. Returns `false` if the array was empty.
    pub fn remove_last(&mut self) -> bool {
        let len = self.len();
        if len == 0 {
            return false;
        }
        self.erase(len - 1, len);
        true
    }

    pub fn take_first(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.remove(0))
    }

    pub fn take_last(&mut self) -> Option<T> {
        let last = self.len().checked_sub(1)?;
        Some(self.remove(last))
    }

    /// Shortens the array to `len` elements. Does nothing if it is not
    /// longer than that.
    pub fn truncate(&mut self, len: usize) {
        let current = self.len();
        if len < current {
            self.erase(len, current);
        }
    }

    /// Keeps only the elements for which `keep` returns `true`, preserving
    /// their order. Does not detach if every element is kept.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) {
        let Some(first_removed) = self.iter().position(|item| !keep(item)) else {
            return;
        };
        let elements = self.as_mut_slice();
        let mut kept = first_removed;
        for index in first_removed + 1..elements.len() {
            if keep(&elements[index]) {
                elements.swap(kept, index);
                kept += 1;
            }
        }
        self.truncate(kept);
    }

    /// Returns a new array holding up to `len` elements starting at `start`.
    /// Shares the block when that covers every element.
    #[must_use]
    pub fn mid(&self, start: usize, len: usize) -> Self {
        let total = self.len();
        if start >= total {
            return Self::new();
        }
        let end = start.saturating_add(len).min(total);
        if start == 0 && end == total {
            return self.clone();
        }
        Self::from(&self.as_slice()[start..end])
    }

    /// Replaces the element at `index`, returning the old value.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[track_caller]
    pub fn replace(&mut self, index: usize, value: T) -> T {
        check_index(index, self.len());
        mem::replace(&mut self.as_mut_slice()[index], value)
    }

    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[track_caller]
    pub fn swap_items_at(&mut self, a: usize, b: usize) {
        let len = self.len();
        check_index(a, len);
        check_index(b, len);
        if a != b {
            self.as_mut_slice().swap(a, b);
        }
    }

    /// Moves the element at `from` so that it ends up at index `to`,
    /// shifting the elements in between by one.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[track_caller]
    pub fn move_item(&mut self, from: usize, to: usize) {
        let len = self.len();
        check_index(from, len);
        check_index(to, len);
        match from.cmp(&to) {
            Ordering::Less => self.as_mut_slice()[from..=to].rotate_left(1),
            Ordering::Greater => self.as_mut_slice()[to..=from].rotate_right(1),
            Ordering::Equal => {}
        }
    }

    /// Overwrites every element with a clone of `value`.
    ///
    /// A shared array is not copied first: it gets a new block, sized the way
    /// a detached copy would be, filled with `value`.
    pub fn fill(&mut self, value: T) {
        if self.is_shared() {
            let len = self.len();
            let mut fresh = match self.handle.empty_like(len) {
                Ok(handle) => Self { handle },
                Err(error) => block::allocation_failure::<T>(error),
            };
            fresh.insert_n(0, len, value);
            *self = fresh;
        } else {
            self.as_mut_slice().fill(value);
        }
    }

    /// Resizes to `len` elements, appending clones of `value` or truncating.
    pub fn resize(&mut self, len: usize, value: T) {
        let current = self.len();
        if len <= current {
            self.truncate(len);
        } else {
            self.insert_n(current, len - current, value);
        }
    }

    /// Resizes to `len` elements, appending values produced by `make` or
    /// truncating.
    pub fn resize_with<F: FnMut() -> T>(&mut self, len: usize, make: F) {
        let current = self.len();
        if len <= current {
            self.truncate(len);
        } else {
            let extra = len - current;
            self.open(GrowthDirection::AtEnd, current, extra)
                .fill_from(iter::repeat_with(make).take(extra));
        }
    }

    /// Ensures room for at least `capacity` elements without further
    /// allocation, and marks the capacity as reserved.
    ///
    /// A shared block, or one whose usable room is too small, is replaced
    /// by an exclusive block of exactly `max(capacity, len())` slots.
    ///
    /// # Panics
    ///
    /// Panics if the capacity overflows; aborts through
    /// `handle_alloc_error` if the allocation fails.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(error) = self.try_reserve(capacity) {
            block::allocation_failure::<T>(error);
        }
    }

    /// Fallible form of [`Self::reserve`].
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::CapacityOverflow` or `ArrayError::OutOfMemory`
    /// if the block cannot be allocated. The array is left unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), ArrayError> {
        let usable = self.capacity() - self.free_space_at_begin();
        if self.is_shared() || capacity > usable {
            self.handle.reallocate(capacity.max(self.len()))?;
        }
        self.handle.set_flag(BlockFlags::CAPACITY_RESERVED, true);
        Ok(())
    }

    /// Releases unused capacity, and clears the reserved mark.
    ///
    /// The block is replaced by one of exactly `len()` slots if it has free
    /// slots or is shared. An empty array ends up without a block.
    pub fn squeeze(&mut self) {
        if self.is_shared() || self.capacity() > self.len() {
            if let Err(error) = self.handle.reallocate(self.len()) {
                block::allocation_failure::<T>(error);
            }
        }
        self.handle.set_flag(BlockFlags::CAPACITY_RESERVED, false);
    }

    /// Removes every element equal to `value`, returning how many were
    /// removed. Does not detach if there is none.
    pub fn remove_all(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        let before = self.len();
        self.retain(|item| item != value);
        before - self.len()
    }

    /// Removes the first element equal to `value`. Returns whether one was
    /// found.
    pub fn remove_one(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(value, 0) {
            Some(index) => {
                self.erase(index, index + 1);
                true
            }
            None => false,
        }
    }
}

impl<T> Clone for CowArray<T> {
    /// Shares the block. O(1), no element is cloned.
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<T> Default for CowArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for CowArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Deref for CowArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsRef<[T]> for CowArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> Borrow<[T]> for CowArray<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> Index<usize> for CowArray<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<T: Clone> IndexMut<usize> for CowArray<T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        check_index(index, self.len());
        &mut self.as_mut_slice()[index]
    }
}

impl<T: PartialEq<U>, U> PartialEq<CowArray<U>> for CowArray<T> {
    fn eq(&self, other: &CowArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<[U]> for CowArray<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for CowArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for CowArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vec<U>> for CowArray<T> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for CowArray<T> {}

impl<T: PartialOrd> PartialOrd for CowArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for CowArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Clone> FromIterator<T> for CowArray<T> {
    /// An iterator with an exact size hint is collected with a single
    /// allocation of exactly that size; any other iterator grows the array
    /// one append at a time.
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        let items = items.into_iter();
        let mut array = match items.size_hint() {
            (lower, Some(upper)) if lower == upper => Self::with_capacity(lower),
            _ => Self::new(),
        };
        array.extend_from_iter(items);
        array
    }
}

impl<T: Clone> Extend<T> for CowArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.extend_from_iter(items.into_iter());
    }
}

impl<'a, T: Clone + 'a> Extend<&'a T> for CowArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, items: I) {
        self.extend_from_iter(items.into_iter().cloned());
    }
}

impl<T: Clone> From<Vec<T>> for CowArray<T> {
    /// Moves the elements into a block of exactly `len` slots.
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for CowArray<T> {
    fn from(items: &[T]) -> Self {
        let mut array = Self::with_capacity(items.len());
        array.append_slice(items);
        array
    }
}

impl<T: Clone, const N: usize> From<[T; N]> for CowArray<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}
