use core::fmt;
use core::iter::FusedIterator;
use core::slice;

use crate::array::CowArray;
use crate::block;
use crate::handle::Handle;

/// Iterator over the elements of a `CowArray`
///
/// Positions are plain indices into the array's live range, so the iterator
/// supports random access (`nth`, `nth_back`) and reports its exact length.
/// It borrows the array and therefore cannot outlive a detach.
///
/// This iterator implements `Clone`.
pub struct Iter<'a, T> {
    elements: &'a [T],
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(elements: &'a [T]) -> Self {
        Self {
            elements,
            front: 0,
            back: elements.len(),
        }
    }

    /// The elements not yet yielded.
    #[must_use]
    pub fn as_slice(&self) -> &'a [T] {
        &self.elements[self.front..self.back]
    }

    /// Index of the next element `next()` would yield.
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.front
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.as_slice()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.elements.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }

    fn count(self) -> usize {
        self.back - self.front
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.elements.get(self.back)
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a CowArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mutable iterator over the elements of a `CowArray`
///
/// Creating it detaches the array once; the iterator then walks the
/// now-exclusive block.
#[derive(Debug)]
pub struct IterMut<'a, T> {
    inner: slice::IterMut<'a, T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(elements: &'a mut [T]) -> Self {
        Self {
            inner: elements.iter_mut(),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.inner.nth(n)
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<'a, T: Clone> IntoIterator for &'a mut CowArray<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Owning iterator over the elements of a `CowArray`
///
/// If the array held the only reference to its block, elements are moved
/// out; otherwise they are cloned and the shared block is left untouched.
pub struct IntoIter<T> {
    handle: Handle<T>,
    /// Live elements taken over from an exclusive block, `None` when shared.
    owned: Option<*mut T>,
    front: usize,
    back: usize,
}

// SAFETY: the raw pointer refers into the block owned by `handle`.
unsafe impl<T: Send + Sync> Send for IntoIter<T> {}
// SAFETY: see above.
unsafe impl<T: Send + Sync> Sync for IntoIter<T> {}

impl<T> IntoIter<T> {
    pub(crate) fn new(mut handle: Handle<T>) -> Self {
        let len = handle.len();
        let owned = handle.steal().map(|(ptr, _)| ptr);
        Self {
            handle,
            owned,
            front: 0,
            back: len,
        }
    }

    /// The elements not yet yielded.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self.owned {
            // SAFETY: `[front, back)` of the taken-over range is still initialized.
            Some(ptr) => unsafe {
                slice::from_raw_parts(ptr.add(self.front), self.back - self.front)
            },
            None => &self.handle.as_slice()[self.front..self.back],
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        match self.owned {
            // SAFETY: the slot is initialized and is never read again.
            Some(ptr) => Some(unsafe { ptr.add(index).read() }),
            None => self.handle.as_slice().get(index).cloned(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        match self.owned {
            // SAFETY: the slot is initialized and is never read again.
            Some(ptr) => Some(unsafe { ptr.add(self.back).read() }),
            None => self.handle.as_slice().get(self.back).cloned(),
        }
    }
}

impl<T: Clone> ExactSizeIterator for IntoIter<T> {}

impl<T: Clone> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        if let Some(ptr) = self.owned {
            // SAFETY: `[front, back)` was never read out. The block itself is
            // freed by `handle` afterwards and no longer counts these elements.
            unsafe { block::drop_range(ptr.add(self.front), self.back - self.front) };
        }
    }
}

impl<T: Clone> IntoIterator for CowArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.into_handle())
    }
}
