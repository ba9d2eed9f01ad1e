use thiserror::Error;

/// Error types for `CowArray` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ArrayError {
    /// The allocator could not satisfy a block allocation
    #[error("Out of memory: failed to allocate a block of {capacity} elements ({bytes} bytes)")]
    OutOfMemory {
        /// Number of element slots requested
        capacity: usize,
        /// Total size of the allocation in bytes, header included
        bytes: usize,
    },
    /// The requested capacity cannot be represented as an allocation layout
    #[error("Capacity overflow: {requested} elements exceed the addressable size")]
    CapacityOverflow {
        /// Number of element slots requested, or being added when growing
        requested: usize,
    },
    /// Index is beyond the current array length
    #[error("Index out of bounds: index {index} is beyond array length {length}")]
    IndexOutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Current length of the array
        length: usize,
    },
    /// Range is reversed or extends past the end of the array
    #[error("Invalid range: {start}..{end} for array of length {length}")]
    InvalidRange {
        /// Start of the range
        start: usize,
        /// End of the range (exclusive)
        end: usize,
        /// Current length of the array
        length: usize,
    },
    /// A reference does not point into the live range of this array's block
    #[error("Element reference does not belong to this array")]
    InvalidElementRef,
}
