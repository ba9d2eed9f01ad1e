#![cfg_attr(not(test), no_std)]

//! `CowArray`: an implicitly shared, copy-on-write growable array.
//!
//! Cloning a `CowArray` is O(1): every clone references the same heap block,
//! and the block carries an atomic reference count. The first mutation made
//! through a clone whose block is shared copies the elements into a private
//! block; an array that is the only reference to its block is mutated in
//! place.
//!
//! Block layout: [header][element storage]
//! The header stores the reference count, the capacity, the number of live
//! elements, the offset of the first live element and a set of flags. Free
//! slots may sit on both sides of the live range.
//!
//! # Performance Characteristics
//!
//! ## Time Complexity
//! - `clone()`: O(1) - increments the reference count
//! - `append()`, `prepend()`: amortized O(1) - growth doubles the capacity
//! - `insert()`, `erase()` in the middle: O(min(i, n - i)) - the shorter side
//!   is shifted
//! - `at()`, `get()`, `index_of()`: never copy, even on a shared block
//! - The first mutation of a shared array: O(n) - the elements are cloned
//!
//! ## Growth
//! - N appends (or N prepends, or any mix of both) from empty cause
//!   O(log N) reallocations
//! - While an array grows at one end only, free slots are placed at that
//!   end; once it has grown at both ends they are split between the two
//! - An exclusive block out of room at one end but mostly empty moves its
//!   elements instead of reallocating
//!
//! ## `no_std` Compatibility
//!
//! This crate works in `no_std` environments with `alloc`. Enable the
//! optional `std` feature to get `std::error::Error` through `thiserror`:
//! ```toml
//! [dependencies]
//! cowarray = { version = "0.1", features = ["std"] }
//! ```
//!
//! # Sharing
//!
//! ```
//! # use cowarray::cow_array;
//! let c1 = cow_array![1, 2, 3];
//! let mut c2 = c1.clone();
//! assert_eq!(c1.ref_count(), 2);
//! assert!(c1.shares_block_with(&c2));
//!
//! // Mutating c2 copies it; c1 is untouched.
//! c2.append(4);
//! assert_eq!(c1, [1, 2, 3]);
//! assert_eq!(c2, [1, 2, 3, 4]);
//! assert_eq!(c1.ref_count(), 1);
//! ```
//!
//! # Two-Ended Growth
//!
//! ```
//! # use cowarray::CowArray;
//! let mut array = CowArray::new();
//! for i in 0..100 {
//!     array.append(i);
//!     array.prepend(-i);
//! }
//! assert_eq!(array.len(), 200);
//! assert_eq!(array.first(), Some(&-99));
//! assert_eq!(array.last(), Some(&99));
//! ```
//!
//! # Searching and Erasing
//!
//! ```
//! # use cowarray::cow_array;
//! let mut array = cow_array![0, 1, 2, 0];
//! array.erase(1, 2);
//! assert_eq!(array, [0, 2, 0]);
//! assert_eq!(array.index_of(&0, 1), Some(2));
//! assert_eq!(array.index_of(&2, 0), Some(1));
//! assert_eq!(array.last_index_of(&0, -1), Some(2));
//! assert!(!array.contains(&5));
//! ```
//!
//! # Error Handling
//!
//! Panicking accessors have fallible `try_*` counterparts returning
//! [`ArrayError`]:
//!
//! ```
//! # use cowarray::{cow_array, ArrayError};
//! let mut array = cow_array!["a", "b"];
//! assert_eq!(
//!     array.try_get(5),
//!     Err(ArrayError::IndexOutOfBounds { index: 5, length: 2 })
//! );
//! assert!(array.try_erase(1, 3).is_err());
//! assert!(array.try_reserve(16).is_ok());
//! ```

extern crate alloc;

mod array;
mod block;
mod error;
pub mod growth;
mod handle;
mod iter;

// Re-export public types
pub use array::CowArray;
pub use block::{BlockFlags, BlockInfo};
pub use error::ArrayError;
pub use iter::{IntoIter, Iter, IterMut};

/// Creates a [`CowArray`] from a list of elements, or from a value and a
/// count.
///
/// ```
/// # use cowarray::{cow_array, CowArray};
/// let listed = cow_array![1, 2, 3];
/// assert_eq!(listed, [1, 2, 3]);
///
/// let repeated = cow_array!["x"; 3];
/// assert_eq!(repeated, ["x", "x", "x"]);
///
/// let empty: CowArray<u8> = cow_array![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! cow_array {
    () => {
        $crate::CowArray::new()
    };
    ($value:expr; $count:expr) => {
        $crate::CowArray::filled($count, $value)
    };
    ($($value:expr),+ $(,)?) => {
        $crate::CowArray::from([$($value),+])
    };
}
