//! Ownership of one block reference and the detach/grow logic.
//!
//! Every mutation goes through one of three outcomes:
//! - the block is exclusive and has room: it is changed in place
//! - the block is exclusive without room: a new block is allocated and the
//!   elements are moved (bitwise) into it
//! - the block is shared, with or without room: a new block is allocated and
//!   the elements are cloned into it, leaving the old block untouched

use core::mem;

use crate::block::{self, Block, BlockFlags, BlockInfo};
use crate::error::ArrayError;
use crate::growth::{self, GrowthDirection, GrowthMode, GrowthRequest};

/// One unit of a block's reference count. A handle without a block is the
/// empty, zero-capacity array.
pub(crate) struct Handle<T> {
    block: Option<Block<T>>,
}

// SAFETY: a handle gives shared access to `T` across threads and may drop `T`
// on whichever thread releases the last reference, as `Arc<[T]>` does.
unsafe impl<T: Send + Sync> Send for Handle<T> {}
// SAFETY: see above.
unsafe impl<T: Send + Sync> Sync for Handle<T> {}

impl<T> Handle<T> {
    pub(crate) const fn new() -> Self {
        Self { block: None }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        Ok(Self {
            block: Some(Block::allocate(capacity)?),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.block.as_ref().map_or(0, Block::len)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.block.as_ref().map_or(0, Block::capacity)
    }

    pub(crate) fn free_space_at_begin(&self) -> usize {
        self.block.as_ref().map_or(0, Block::free_space_at_begin)
    }

    pub(crate) fn free_space_at_end(&self) -> usize {
        self.block.as_ref().map_or(0, Block::free_space_at_end)
    }

    pub(crate) fn flags(&self) -> BlockFlags {
        self.block.as_ref().map_or(BlockFlags::empty(), Block::flags)
    }

    /// Number of handles sharing the block, 0 when there is no block.
    pub(crate) fn ref_count(&self) -> usize {
        self.block.as_ref().map_or(0, Block::ref_count)
    }

    pub(crate) fn is_shared(&self) -> bool {
        self.block.as_ref().is_some_and(Block::is_shared)
    }

    pub(crate) fn shares_block_with(&self, other: &Self) -> bool {
        match (&self.block, &other.block) {
            (Some(a), Some(b)) => a.same_as(b),
            _ => false,
        }
    }

    pub(crate) fn info(&self) -> Option<BlockInfo> {
        self.block.as_ref().map(Block::info)
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        match &self.block {
            Some(block) => block.as_slice(),
            None => &[],
        }
    }

    /// Sets or clears a flag. The block must be exclusive.
    pub(crate) fn set_flag(&mut self, flag: BlockFlags, value: bool) {
        debug_assert!(!self.is_shared(), "flags of a shared block are read-only");
        if let Some(block) = self.block.as_mut() {
            let mut flags = block.flags();
            flags.set(flag, value);
            // SAFETY: exclusive, checked by the caller.
            unsafe { block.set_flags(flags) };
        }
    }

    /// Gives up this handle's reference, leaving it empty.
    pub(crate) fn release(&mut self) {
        if let Some(block) = self.block.take() {
            // SAFETY: the reference is owned by this handle and given up here.
            unsafe { block.release() };
        }
    }

    /// Drops all elements. A shared block is released instead; if its
    /// capacity was reserved, an empty block of the same capacity replaces it.
    pub(crate) fn clear(&mut self) -> Result<(), ArrayError> {
        if self.is_shared() {
            *self = self.empty_like(0)?;
            return Ok(());
        }
        if let Some(block) = self.block.as_mut() {
            let len = block.len();
            let live = block.live_ptr();
            // SAFETY: exclusive; the range is emptied before dropping so a
            // panicking destructor cannot cause a double drop.
            unsafe {
                block.set_range(block.offset(), 0);
                block::drop_range(live, len);
            }
        }
        Ok(())
    }

    /// Capacity a private copy of this block gets: the live length, or the
    /// current capacity when it was reserved.
    fn detached_capacity(&self, len: usize) -> usize {
        if self.flags().contains(BlockFlags::CAPACITY_RESERVED) {
            self.capacity().max(len)
        } else {
            len
        }
    }

    /// An exclusive handle with no elements, sized for `len` elements the way
    /// a private copy of this block would be, and carrying its flags.
    pub(crate) fn empty_like(&self, len: usize) -> Result<Self, ArrayError> {
        let mut fresh = Self::with_capacity(self.detached_capacity(len))?;
        if let Some(block) = fresh.block.as_mut() {
            // SAFETY: the block was just allocated and is exclusive.
            unsafe { block.set_flags(self.flags()) };
        }
        Ok(fresh)
    }

    /// Takes ownership of the live elements of an exclusive block.
    ///
    /// The block forgets its elements (size 0, offset kept) and the caller
    /// becomes responsible for reading or dropping all of them. Returns
    /// `None` when the block is shared or absent.
    pub(crate) fn steal(&mut self) -> Option<(*mut T, usize)> {
        if self.is_shared() {
            return None;
        }
        let block = self.block.as_mut()?;
        let len = block.len();
        // SAFETY: exclusive.
        unsafe { block.set_range(block.offset(), 0) };
        Some((block.live_ptr(), len))
    }

    /// Removes `[start, end)` from an exclusive block whose elements in that
    /// range were already moved out or dropped.
    ///
    /// # Safety
    ///
    /// The block must be exclusive, `[start, end)` uninitialized and the rest
    /// of `[0, len)` initialized.
    unsafe fn close_range(block: &mut Block<T>, start: usize, end: usize, len: usize) {
        let offset = block.offset();
        let live = block.live_ptr();
        let count = end - start;
        let tail = len - end;
        if start == 0 {
            block.set_range(offset + count, tail);
        } else if tail == 0 {
            block.set_range(offset, start);
        } else if start < tail {
            block::shift(live, live.add(count), start);
            block.set_range(offset + count, len - count);
        } else {
            block::shift(live.add(end), live.add(start), tail);
            block.set_range(offset, len - count);
        }
    }

    /// Moves the live range of an exclusive block so that it starts at slot
    /// `front` with `extra` free slots before the element at `at`.
    ///
    /// Afterwards the block's size covers only the `at` leading elements; the
    /// tail sits behind the free slots until a [`Gap`] commits it.
    ///
    /// # Safety
    ///
    /// The block must be exclusive and `front + len + extra <= capacity`.
    unsafe fn open_in_place(block: &mut Block<T>, front: usize, at: usize, extra: usize) {
        let len = block.len();
        let old = block.offset();
        let base = block.storage_ptr();
        let tail = len - at;
        debug_assert!(front + len + extra <= block.capacity());
        if front <= old {
            block::shift(base.add(old), base.add(front), at);
            block::shift(base.add(old + at), base.add(front + at + extra), tail);
        } else {
            block::shift(base.add(old + at), base.add(front + at + extra), tail);
            block::shift(base.add(old), base.add(front), at);
        }
        block.set_range(front, at);
    }
}

impl<T: Clone> Handle<T> {
    /// Makes the block exclusive, cloning it into an exactly sized block if
    /// it is shared (a reserved capacity is kept). A no-op on an exclusive
    /// block.
    pub(crate) fn detach(&mut self) -> Result<(), ArrayError> {
        if self.is_shared() {
            self.reallocate(self.detached_capacity(self.len()))
        } else {
            Ok(())
        }
    }

    /// Detaches and returns the live elements for mutation.
    pub(crate) fn make_mut(&mut self) -> Result<&mut [T], ArrayError> {
        self.detach()?;
        Ok(match self.block.as_mut() {
            // SAFETY: exclusive after the detach.
            Some(block) => unsafe { block.as_mut_slice() },
            None => &mut [],
        })
    }

    /// Replaces the block with an exclusive one of exactly `capacity` slots
    /// holding the live elements at offset 0. Flags are carried over.
    pub(crate) fn reallocate(&mut self, capacity: usize) -> Result<(), ArrayError> {
        let len = self.len();
        debug_assert!(capacity >= len);
        self.replace_block(capacity, 0, len, 0, self.flags())
    }

    /// Makes the block exclusive and opens `extra` uninitialized slots before
    /// the element at index `at`, growing the storage if needed.
    ///
    /// Exclusive blocks with room on the required side only shift elements;
    /// an exclusive block without room either moves its live range inside
    /// the block (when the growth policy allows) or has its elements moved
    /// into a larger block; a shared block is always cloned into a new one.
    /// The returned [`Gap`] must be filled by the caller; dropping it commits
    /// the new size.
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::CapacityOverflow` or `ArrayError::OutOfMemory`
    /// if a new block is needed and cannot be allocated. The array is left
    /// unchanged in that case.
    pub(crate) fn detach_and_grow(
        &mut self,
        direction: GrowthDirection,
        at: usize,
        extra: usize,
    ) -> Result<Gap<'_, T>, ArrayError> {
        let len = self.len();
        debug_assert!(at <= len, "gap position {at} beyond length {len}");
        let shared = self.is_shared();
        if extra == 0 && !shared {
            return Ok(Gap::new(self, len, 0, 0));
        }

        let request = GrowthRequest {
            len,
            extra,
            capacity: self.capacity(),
            direction,
            history: self.flags(),
            mode: if shared {
                GrowthMode::Detach
            } else {
                GrowthMode::Grow
            },
        };

        if !shared {
            if let Some(block) = self.block.as_mut() {
                if let Some(front) = Self::in_place_front(block, &request, at) {
                    // SAFETY: exclusive, and `front` leaves room for `extra`.
                    unsafe {
                        block.set_flags(block.flags() | direction.flag());
                        Self::open_in_place(block, front, at, extra);
                    }
                    return Ok(Gap::new(self, at, extra, len - at));
                }
            }
        }

        let plan = growth::plan(&request)?;
        let flags = request.history | direction.flag();
        self.replace_block(plan.capacity, plan.front_slack, at, extra, flags)?;
        Ok(Gap::new(self, at, extra, len - at))
    }

    /// Where the live range of an exclusive block should start to open the
    /// gap without reallocating, if it can.
    fn in_place_front(block: &Block<T>, request: &GrowthRequest, at: usize) -> Option<usize> {
        let extra = request.extra;
        let head = at;
        let tail = request.len - at;
        let begin = block.free_space_at_begin();
        let end = block.free_space_at_end();
        let front = if head == 0 && (tail > 0 || request.direction == GrowthDirection::AtBegin) {
            (begin >= extra).then(|| begin - extra)
        } else if tail == 0 {
            (end >= extra).then_some(begin)
        } else if begin >= extra && (end < extra || head < tail) {
            Some(begin - extra)
        } else if end >= extra {
            Some(begin)
        } else {
            None
        };
        front.or_else(|| growth::readjust(request))
    }

    /// Allocates a block of `capacity` slots and migrates the live elements
    /// into it, leaving `extra` free slots before the element at `at` and
    /// `front` free slots before the first element.
    ///
    /// Elements are moved when the current block is exclusive and cloned when
    /// it is shared. As with [`Self::open_in_place`], the new block's size
    /// covers only the `at` leading elements.
    fn replace_block(
        &mut self,
        capacity: usize,
        front: usize,
        at: usize,
        extra: usize,
        flags: BlockFlags,
    ) -> Result<(), ArrayError> {
        let len = self.len();
        if capacity == 0 {
            debug_assert!(len == 0 && extra == 0);
            self.release();
            return Ok(());
        }

        // Owned by a handle so that a panicking `clone` frees it.
        let mut fresh = Self {
            block: Some(Block::allocate(capacity)?),
        };
        if let Some(new) = fresh.block.as_mut() {
            let dst = new.storage_ptr();
            // SAFETY: `new` is exclusive and has room for
            // `front + len + extra` elements; the source range is initialized.
            unsafe {
                new.set_flags(flags);
                match self.block.as_mut() {
                    None => {}
                    Some(old) if old.is_shared() => {
                        let (head, tail) = old.as_slice().split_at(at);
                        block::clone_into(head, dst.add(front));
                        new.set_range(front, at);
                        block::clone_into(tail, dst.add(front + at + extra));
                    }
                    Some(old) => {
                        let src = old.live_ptr();
                        block::relocate(src, dst.add(front), at);
                        block::relocate(src.add(at), dst.add(front + at + extra), len - at);
                        old.set_range(old.offset(), 0);
                    }
                }
                new.set_range(front, at);
            }
        }
        // The old block is released when `fresh` goes out of scope.
        mem::swap(self, &mut fresh);
        Ok(())
    }

    /// Removes `[start, end)`, dropping the removed elements.
    ///
    /// A shared block is not cloned in full: only the surviving elements are
    /// cloned into an exactly sized private block.
    pub(crate) fn erase(&mut self, start: usize, end: usize) -> Result<(), ArrayError> {
        let len = self.len();
        debug_assert!(start <= end && end <= len);
        if start == end {
            return Ok(());
        }
        if self.is_shared() {
            return self.copy_without(start, end);
        }
        if let Some(block) = self.block.as_mut() {
            let live = block.live_ptr();
            // SAFETY: exclusive. Everything from `start` on is hidden while the
            // removed elements drop, so a panicking destructor leaks the tail
            // rather than dropping anything twice.
            unsafe {
                block.set_range(block.offset(), start);
                block::drop_range(live.add(start), end - start);
                Self::close_range(block, start, end, len);
            }
        }
        Ok(())
    }

    /// Removes and returns the element at `index`.
    pub(crate) fn take(&mut self, index: usize) -> Result<T, ArrayError> {
        let len = self.len();
        debug_assert!(index < len);
        if self.is_shared() {
            let value = self.as_slice()[index].clone();
            self.copy_without(index, index + 1)?;
            return Ok(value);
        }
        let Some(block) = self.block.as_mut() else {
            return Err(ArrayError::IndexOutOfBounds { index, length: 0 });
        };
        // SAFETY: exclusive and `index < len`; the slot is closed right after
        // the read.
        unsafe {
            let value = block.live_ptr().add(index).read();
            Self::close_range(block, index, index + 1, len);
            Ok(value)
        }
    }

    fn copy_without(&mut self, start: usize, end: usize) -> Result<(), ArrayError> {
        let len = self.len();
        let remaining = len - (end - start);
        let capacity = self.detached_capacity(remaining);
        if capacity == 0 {
            self.release();
            return Ok(());
        }
        let mut fresh = Self {
            block: Some(Block::allocate(capacity)?),
        };
        let src = self.as_slice();
        if let Some(new) = fresh.block.as_mut() {
            let dst = new.storage_ptr();
            // SAFETY: `new` is exclusive with at least `remaining` slots.
            unsafe {
                new.set_flags(self.flags());
                block::clone_into(&src[..start], dst);
                new.set_range(0, start);
                block::clone_into(&src[end..], dst.add(start));
                new.set_range(0, remaining);
            }
        }
        *self = fresh;
        Ok(())
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            block: self.block.as_ref().map(Block::share),
        }
    }
}

impl<T> Drop for Handle<T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Free slots opened inside an exclusive block by
/// [`Handle::detach_and_grow`].
///
/// Slots are filled front to back with [`Gap::push`]. Dropping the gap
/// commits the new size; slots left unfilled (an iterator ran dry, or a
/// `clone` panicked) are closed by shifting the tail back.
pub(crate) struct Gap<'a, T> {
    handle: &'a mut Handle<T>,
    head: usize,
    extra: usize,
    tail: usize,
    filled: usize,
}

impl<'a, T> Gap<'a, T> {
    fn new(handle: &'a mut Handle<T>, head: usize, extra: usize, tail: usize) -> Self {
        Self {
            handle,
            head,
            extra,
            tail,
            filled: 0,
        }
    }

    /// Number of slots still to fill.
    pub(crate) fn remaining(&self) -> usize {
        self.extra - self.filled
    }

    /// Writes the next slot.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already filled.
    pub(crate) fn push(&mut self, value: T) {
        assert!(self.filled < self.extra, "Gap of {} slots is already filled", self.extra);
        if let Some(block) = self.handle.block.as_ref() {
            // SAFETY: the slot is inside the opened gap and uninitialized.
            unsafe { block.live_ptr().add(self.head + self.filled).write(value) };
            self.filled += 1;
        }
    }

    /// Fills the remaining slots from `iter`, stopping early if it runs dry.
    pub(crate) fn fill_from<I: Iterator<Item = T>>(&mut self, iter: I) {
        for value in iter.take(self.remaining()) {
            self.push(value);
        }
    }
}

impl<T> Drop for Gap<'_, T> {
    fn drop(&mut self) {
        let Some(block) = self.handle.block.as_mut() else {
            return;
        };
        // SAFETY: the block is exclusive while the gap exists; `filled` slots
        // after the head are initialized and the tail sits `extra` slots
        // after the head.
        unsafe {
            let hole = block.live_ptr().add(self.head);
            if self.filled < self.extra {
                block::shift(hole.add(self.extra), hole.add(self.filled), self.tail);
            }
            block.set_range(block.offset(), self.head + self.filled + self.tail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts how many times values were cloned.
    #[derive(Debug)]
    struct Counted {
        value: u32,
        clones: Rc<Cell<usize>>,
    }

    impl Clone for Counted {
        fn clone(&self) -> Self {
            self.clones.set(self.clones.get() + 1);
            Counted {
                value: self.value,
                clones: Rc::clone(&self.clones),
            }
        }
    }

    fn append<T: Clone>(handle: &mut Handle<T>, value: T) {
        let len = handle.len();
        let mut gap = handle.detach_and_grow(GrowthDirection::AtEnd, len, 1).unwrap();
        gap.push(value);
    }

    fn prepend<T: Clone>(handle: &mut Handle<T>, value: T) {
        let mut gap = handle.detach_and_grow(GrowthDirection::AtBegin, 0, 1).unwrap();
        gap.push(value);
    }

    fn values(handle: &Handle<Counted>) -> Vec<u32> {
        handle.as_slice().iter().map(|c| c.value).collect()
    }

    fn filled(count: u32, clones: &Rc<Cell<usize>>) -> Handle<Counted> {
        let mut handle = Handle::new();
        for value in 0..count {
            append(
                &mut handle,
                Counted {
                    value,
                    clones: Rc::clone(clones),
                },
            );
        }
        handle
    }

    #[test]
    fn test_empty_handle_has_no_block() {
        let handle = Handle::<u8>::new();
        assert_eq!(handle.len(), 0);
        assert_eq!(handle.capacity(), 0);
        assert_eq!(handle.ref_count(), 0);
        assert!(!handle.is_shared());
        assert!(handle.info().is_none());
    }

    #[test]
    fn test_exclusive_with_room_grows_in_place() {
        let mut handle = Handle::<u32>::with_capacity(8).unwrap();
        append(&mut handle, 1);
        let before = handle.as_slice().as_ptr();
        append(&mut handle, 2);
        append(&mut handle, 3);
        assert_eq!(handle.as_slice(), [1, 2, 3]);
        assert_eq!(handle.as_slice().as_ptr(), before);
        assert_eq!(handle.capacity(), 8);
    }

    #[test]
    fn test_exclusive_without_room_moves() {
        let clones = Rc::new(Cell::new(0));
        let mut handle = filled(4, &clones);
        assert_eq!(handle.capacity(), 4);
        append(
            &mut handle,
            Counted {
                value: 4,
                clones: Rc::clone(&clones),
            },
        );
        assert_eq!(handle.capacity(), 8);
        assert_eq!(values(&handle), [0, 1, 2, 3, 4]);
        assert_eq!(clones.get(), 0);
    }

    #[test]
    fn test_shared_with_room_copies() {
        let clones = Rc::new(Cell::new(0));
        let mut handle = filled(3, &clones);
        let other = handle.clone();
        assert_eq!(handle.ref_count(), 2);
        assert!(handle.free_space_at_end() > 0);

        append(
            &mut handle,
            Counted {
                value: 9,
                clones: Rc::clone(&clones),
            },
        );
        assert_eq!(clones.get(), 3);
        assert!(!handle.shares_block_with(&other));
        assert_eq!(values(&handle), [0, 1, 2, 9]);
        assert_eq!(values(&other), [0, 1, 2]);
        assert_eq!(other.ref_count(), 1);
        assert_eq!(handle.ref_count(), 1);
    }

    #[test]
    fn test_shared_without_room_copies() {
        let clones = Rc::new(Cell::new(0));
        let mut handle = filled(4, &clones);
        let other = handle.clone();
        prepend(
            &mut handle,
            Counted {
                value: 9,
                clones: Rc::clone(&clones),
            },
        );
        assert_eq!(clones.get(), 4);
        assert_eq!(values(&handle), [9, 0, 1, 2, 3]);
        assert_eq!(values(&other), [0, 1, 2, 3]);
    }

    #[test]
    fn test_detach_is_idempotent_when_exclusive() {
        let clones = Rc::new(Cell::new(0));
        let mut handle = filled(3, &clones);
        let info = handle.info();
        handle.detach().unwrap();
        handle.detach().unwrap();
        assert_eq!(handle.info(), info);
        assert_eq!(clones.get(), 0);
    }

    #[test]
    fn test_detach_shared_is_exact() {
        let clones = Rc::new(Cell::new(0));
        let mut handle = filled(5, &clones);
        assert_eq!(handle.capacity(), 8);
        let other = handle.clone();
        handle.detach().unwrap();
        assert_eq!(handle.capacity(), 5);
        assert_eq!(clones.get(), 5);
        assert!(!handle.shares_block_with(&other));
    }

    #[test]
    fn test_open_gap_in_middle_shifts_shorter_side() {
        let mut handle = Handle::<u32>::with_capacity(16).unwrap();
        for value in 0..6 {
            append(&mut handle, value);
        }
        // Make room at the front too.
        handle.erase(0, 2).unwrap();
        assert_eq!(handle.free_space_at_begin(), 2);
        assert_eq!(handle.as_slice(), [2, 3, 4, 5]);

        // Head (1 element) is shorter than the tail (3): shifted left.
        let mut gap = handle.detach_and_grow(GrowthDirection::AtEnd, 1, 1).unwrap();
        gap.push(10);
        drop(gap);
        assert_eq!(handle.as_slice(), [2, 10, 3, 4, 5]);
        assert_eq!(handle.free_space_at_begin(), 1);

        // Tail (1 element) is shorter: shifted right.
        let mut gap = handle.detach_and_grow(GrowthDirection::AtEnd, 4, 1).unwrap();
        gap.push(11);
        drop(gap);
        assert_eq!(handle.as_slice(), [2, 10, 3, 4, 11, 5]);
        assert_eq!(handle.free_space_at_begin(), 1);
        assert_eq!(handle.capacity(), 16);
    }

    #[test]
    fn test_unfilled_gap_closes() {
        let mut handle = Handle::<u32>::with_capacity(8).unwrap();
        for value in 0..4 {
            append(&mut handle, value);
        }
        let mut gap = handle.detach_and_grow(GrowthDirection::AtEnd, 2, 3).unwrap();
        gap.push(7);
        assert_eq!(gap.remaining(), 2);
        drop(gap);
        assert_eq!(handle.as_slice(), [0, 1, 7, 2, 3]);
    }

    #[test]
    fn test_readjust_instead_of_realloc() {
        let mut handle = Handle::<u32>::with_capacity(12).unwrap();
        for value in 0..12 {
            append(&mut handle, value);
        }
        handle.erase(0, 9).unwrap();
        assert_eq!(handle.free_space_at_begin(), 9);
        assert_eq!(handle.free_space_at_end(), 0);

        append(&mut handle, 12);
        assert_eq!(handle.capacity(), 12);
        assert_eq!(handle.free_space_at_begin(), 0);
        assert_eq!(handle.as_slice(), [9, 10, 11, 12]);
    }

    #[test]
    fn test_erase_boundaries_adjust_offset_only() {
        let mut handle = Handle::<u32>::with_capacity(8).unwrap();
        for value in 0..8 {
            append(&mut handle, value);
        }
        handle.erase(0, 2).unwrap();
        assert_eq!(handle.free_space_at_begin(), 2);
        handle.erase(4, 6).unwrap();
        assert_eq!(handle.free_space_at_end(), 2);
        assert_eq!(handle.as_slice(), [2, 3, 4, 5]);
    }

    #[test]
    fn test_erase_shared_copies_survivors_only() {
        let clones = Rc::new(Cell::new(0));
        let mut handle = filled(6, &clones);
        let other = handle.clone();
        handle.erase(1, 5).unwrap();
        assert_eq!(clones.get(), 2);
        assert_eq!(handle.capacity(), 2);
        assert_eq!(values(&handle), [0, 5]);
        assert_eq!(values(&other), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_take_exclusive_and_shared() {
        let mut handle = Handle::<String>::new();
        for value in ["a", "b", "c"] {
            append(&mut handle, value.to_string());
        }
        assert_eq!(handle.take(1).unwrap(), "b");
        let other = handle.clone();
        assert_eq!(handle.take(0).unwrap(), "a");
        assert_eq!(handle.as_slice(), ["c"]);
        assert_eq!(other.as_slice(), ["a", "c"]);
    }

    #[test]
    fn test_steal_forgets_elements() {
        let mut handle = Handle::<String>::new();
        append(&mut handle, "x".to_string());
        let other = handle.clone();
        assert!(handle.steal().is_none());
        drop(other);

        let (ptr, len) = handle.steal().unwrap();
        assert_eq!(len, 1);
        assert_eq!(handle.len(), 0);
        let value = unsafe { ptr.read() };
        assert_eq!(value, "x");
    }

    #[test]
    fn test_reserved_capacity_survives_detach() {
        let mut handle = Handle::<u32>::with_capacity(10).unwrap();
        handle.set_flag(BlockFlags::CAPACITY_RESERVED, true);
        append(&mut handle, 1);
        let other = handle.clone();
        handle.detach().unwrap();
        assert_eq!(handle.capacity(), 10);
        assert!(handle.flags().contains(BlockFlags::CAPACITY_RESERVED));

        let mut third = other.clone();
        third.clear().unwrap();
        assert_eq!(third.capacity(), 10);
        assert_eq!(third.len(), 0);
        assert_eq!(other.ref_count(), 1);
    }

    #[test]
    fn test_clear_shared_releases() {
        let mut handle = Handle::<u32>::with_capacity(4).unwrap();
        append(&mut handle, 1);
        let other = handle.clone();
        handle.clear().unwrap();
        assert_eq!(handle.capacity(), 0);
        assert_eq!(other.ref_count(), 1);
        assert_eq!(other.as_slice(), [1]);
    }
}
