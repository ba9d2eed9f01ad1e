//! Reference-counted storage blocks.
//!
//! Allocation layout: [header][element storage]
//! The header holds the atomic reference count, the capacity, the number of
//! live elements, the offset of the first live element and the block flags.
//! Live elements occupy `[offset, offset + size)` of the element storage,
//! everything else is uninitialized.

use alloc::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};
use core::slice;
use core::sync::atomic::{self, AtomicUsize, Ordering};

use bitflags::bitflags;

use crate::error::ArrayError;

bitflags! {
    /// Per-block flags, carried over to the replacement block on reallocation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: u8 {
        /// Capacity was requested explicitly with `reserve`; `squeeze` clears it.
        const CAPACITY_RESERVED = 1 << 0;
        /// The array has grown at its beginning (prepend or insert at 0).
        const GROWN_AT_BEGIN = 1 << 1;
        /// The array has grown at its end (append or interior insert).
        const GROWN_AT_END = 1 << 2;
    }
}

/// A snapshot of a block's header, for inspection and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Number of element slots in the block
    pub capacity: usize,
    /// Number of live elements
    pub len: usize,
    /// Number of free slots before the first live element
    pub offset: usize,
    /// Number of arrays sharing the block
    pub ref_count: usize,
    /// Block flags
    pub flags: BlockFlags,
}

#[repr(C)]
struct Header {
    refcount: AtomicUsize,
    capacity: usize,
    size: usize,
    offset: usize,
    flags: BlockFlags,
}

/// Raw pointer to one block allocation.
///
/// A `Block` does not own a reference by itself; the handle holding it does.
/// All methods assume the block is still allocated, which holds for as long as
/// the owning handle keeps its reference.
pub(crate) struct Block<T> {
    ptr: NonNull<Header>,
    _marker: PhantomData<T>,
}

impl<T> Block<T> {
    /// Byte offset of the element storage from the start of the allocation.
    const ELEMENTS_OFFSET: usize = {
        let header = mem::size_of::<Header>();
        let align = mem::align_of::<T>();
        (header + align - 1) / align * align
    };

    pub(crate) fn layout(capacity: usize) -> Result<Layout, ArrayError> {
        let overflow = ArrayError::CapacityOverflow {
            requested: capacity,
        };
        let elements = Layout::array::<T>(capacity).map_err(|_| overflow.clone())?;
        let (layout, offset) = Layout::new::<Header>()
            .extend(elements)
            .map_err(|_| overflow)?;
        debug_assert_eq!(offset, Self::ELEMENTS_OFFSET);
        Ok(layout.pad_to_align())
    }

    /// Allocates a block with room for `capacity` elements.
    ///
    /// The new block has a reference count of 1, no live elements, offset 0
    /// and no flags.
    ///
    /// # Errors
    ///
    /// Returns `ArrayError::CapacityOverflow` if the layout cannot be
    /// represented and `ArrayError::OutOfMemory` if the allocator fails.
    pub(crate) fn allocate(capacity: usize) -> Result<Self, ArrayError> {
        let layout = Self::layout(capacity)?;
        // SAFETY: the layout always includes the header, so it is non-zero sized.
        let raw = unsafe { alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<Header>()) else {
            return Err(ArrayError::OutOfMemory {
                capacity,
                bytes: layout.size(),
            });
        };
        // SAFETY: freshly allocated and suitably aligned for `Header`.
        unsafe {
            ptr.as_ptr().write(Header {
                refcount: AtomicUsize::new(1),
                capacity,
                size: 0,
                offset: 0,
                flags: BlockFlags::empty(),
            });
        }
        Ok(Self {
            ptr,
            _marker: PhantomData,
        })
    }

    fn header(&self) -> &Header {
        // SAFETY: the block is allocated while a handle holds it.
        unsafe { self.ptr.as_ref() }
    }

    /// # Safety
    ///
    /// The caller must hold the only reference to the block.
    unsafe fn header_mut(&mut self) -> &mut Header {
        self.ptr.as_mut()
    }

    /// Increments the reference count.
    pub(crate) fn retain(&self) {
        // Relaxed is enough: a new reference can only be made from an existing
        // one, which already synchronizes with the block's creation.
        let old = self.header().refcount.fetch_add(1, Ordering::Relaxed);
        if old > isize::MAX as usize {
            // The count must never wrap, and is left as it was before the call.
            self.header().refcount.fetch_sub(1, Ordering::Relaxed);
            panic!("block reference count overflow");
        }
    }

    /// Takes an additional reference to the block.
    pub(crate) fn share(&self) -> Self {
        self.retain();
        Self {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Decrements the reference count and destroys the block when it was the
    /// last reference.
    ///
    /// # Safety
    ///
    /// The caller gives up its reference; the block must not be used through
    /// this value afterwards.
    pub(crate) unsafe fn release(self) {
        if self.header().refcount.fetch_sub(1, Ordering::Release) != 1 {
            return;
        }
        atomic::fence(Ordering::Acquire);
        self.destroy();
    }

    /// Drops the live elements in order and frees the allocation.
    #[allow(clippy::expect_used)]
    unsafe fn destroy(self) {
        struct Dealloc {
            ptr: *mut u8,
            layout: Layout,
        }

        impl Drop for Dealloc {
            fn drop(&mut self) {
                // SAFETY: allocated with this layout in `allocate`.
                unsafe { dealloc(self.ptr, self.layout) };
            }
        }

        let layout = Self::layout(self.capacity())
            .expect("Layout validated during allocate");
        // Free the memory even if an element destructor panics.
        let _guard = Dealloc {
            ptr: self.ptr.as_ptr().cast::<u8>(),
            layout,
        };
        drop_range(self.live_ptr(), self.len());
    }

    pub(crate) fn ref_count(&self) -> usize {
        self.header().refcount.load(Ordering::Acquire)
    }

    /// Returns true if other handles reference this block.
    pub(crate) fn is_shared(&self) -> bool {
        self.ref_count() > 1
    }

    pub(crate) fn capacity(&self) -> usize {
        self.header().capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.header().size
    }

    pub(crate) fn offset(&self) -> usize {
        self.header().offset
    }

    pub(crate) fn flags(&self) -> BlockFlags {
        self.header().flags
    }

    pub(crate) fn free_space_at_begin(&self) -> usize {
        self.offset()
    }

    pub(crate) fn free_space_at_end(&self) -> usize {
        let header = self.header();
        header.capacity - header.offset - header.size
    }

    pub(crate) fn info(&self) -> BlockInfo {
        let header = self.header();
        BlockInfo {
            capacity: header.capacity,
            len: header.size,
            offset: header.offset,
            ref_count: header.refcount.load(Ordering::Acquire),
            flags: header.flags,
        }
    }

    /// # Safety
    ///
    /// The caller must hold the only reference, and `[offset, offset + size)`
    /// must be initialized and within capacity.
    pub(crate) unsafe fn set_range(&mut self, offset: usize, size: usize) {
        debug_assert!(offset + size <= self.capacity());
        let header = self.header_mut();
        header.offset = offset;
        header.size = size;
    }

    /// # Safety
    ///
    /// The caller must hold the only reference.
    pub(crate) unsafe fn set_flags(&mut self, flags: BlockFlags) {
        self.header_mut().flags = flags;
    }

    /// Pointer to the first element slot of the storage.
    pub(crate) fn storage_ptr(&self) -> *mut T {
        // SAFETY: the element storage starts `ELEMENTS_OFFSET` bytes into the
        // allocation, see `layout`.
        unsafe {
            self.ptr
                .as_ptr()
                .cast::<u8>()
                .add(Self::ELEMENTS_OFFSET)
                .cast::<T>()
        }
    }

    /// Pointer to the first live element.
    pub(crate) fn live_ptr(&self) -> *mut T {
        // SAFETY: `offset <= capacity`.
        unsafe { self.storage_ptr().add(self.offset()) }
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: the live range is initialized.
        unsafe { slice::from_raw_parts(self.live_ptr(), self.len()) }
    }

    /// # Safety
    ///
    /// The caller must hold the only reference.
    pub(crate) unsafe fn as_mut_slice(&mut self) -> &mut [T] {
        slice::from_raw_parts_mut(self.live_ptr(), self.len())
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

/// Aborts on `OutOfMemory` the way the global allocator does, and panics on
/// any other allocation error.
#[cold]
#[inline(never)]
#[allow(clippy::expect_used)]
pub(crate) fn allocation_failure<T>(error: ArrayError) -> ! {
    match error {
        ArrayError::OutOfMemory { capacity, .. } => handle_alloc_error(
            Block::<T>::layout(capacity).expect("Layout validated before allocating"),
        ),
        other => panic!("{}", other),
    }
}

// Element primitives. Every Rust type is trivially relocatable, so moving a
// range is a bitwise copy; cloning goes through `Clone` with a drop guard.

/// Drops `count` initialized elements starting at `ptr`.
pub(crate) unsafe fn drop_range<T>(ptr: *mut T, count: usize) {
    ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr, count));
}

/// Bitwise moves `count` elements between non-overlapping ranges. The source
/// slots are left logically uninitialized.
pub(crate) unsafe fn relocate<T>(src: *const T, dst: *mut T, count: usize) {
    ptr::copy_nonoverlapping(src, dst, count);
}

/// Bitwise moves `count` elements inside one block; ranges may overlap.
pub(crate) unsafe fn shift<T>(src: *const T, dst: *mut T, count: usize) {
    ptr::copy(src, dst, count);
}

/// Clones `src` into the uninitialized slots at `dst`.
///
/// If a `clone` panics, the elements already written are dropped and `dst`
/// is left uninitialized.
pub(crate) unsafe fn clone_into<T: Clone>(src: &[T], dst: *mut T) {
    let mut guard = WriteGuard { dst, written: 0 };
    for item in src {
        guard.dst.add(guard.written).write(item.clone());
        guard.written += 1;
    }
    mem::forget(guard);
}

/// Drops the elements written so far if construction unwinds.
struct WriteGuard<T> {
    dst: *mut T,
    written: usize,
}

impl<T> Drop for WriteGuard<T> {
    fn drop(&mut self) {
        // SAFETY: exactly `written` elements were initialized at `dst`.
        unsafe { drop_range(self.dst, self.written) };
    }
}
