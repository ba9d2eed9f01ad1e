//! Capacity and slack placement policy.
//!
//! Consulted whenever a block has to be replaced or its live range moved
//! inside the block. The policy is a pure function of the request.
//!
//! Slack placement: while an array has only ever grown at one end, all free
//! slots go to that end. Once it has grown at both ends, free slots are split
//! evenly, the odd slot going to the end being grown.

use crate::block::BlockFlags;
use crate::error::ArrayError;

/// Smallest capacity allocated for a growing array.
pub const MIN_CAPACITY: usize = 4;

/// Factor applied to the current capacity when an array outgrows its block.
pub const GROWTH_FACTOR: usize = 2;

/// End-growth readjust limit: the live range is moved inside the block
/// instead of reallocating while `len * 3 < capacity * 2`.
pub const READJUST_END_NUMERATOR: usize = 2;

/// Begin-growth readjust limit: `len * 3 < capacity`.
pub const READJUST_BEGIN_NUMERATOR: usize = 1;

/// The end of the live range new elements are added at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthDirection {
    AtBegin,
    AtEnd,
}

impl GrowthDirection {
    /// The history flag recorded when growing in this direction.
    #[must_use]
    pub fn flag(self) -> BlockFlags {
        match self {
            GrowthDirection::AtBegin => BlockFlags::GROWN_AT_BEGIN,
            GrowthDirection::AtEnd => BlockFlags::GROWN_AT_END,
        }
    }
}

/// How the new capacity is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthMode {
    /// Exactly `len + extra` slots (`reserve`, `squeeze`, exact-size construction).
    Exact,
    /// Private copy of a shared block: keep the current capacity if it is
    /// enough, grow otherwise.
    Detach,
    /// The block is out of room: grow by `GROWTH_FACTOR`.
    Grow,
}

/// Input of [`plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthRequest {
    /// Current number of live elements
    pub len: usize,
    /// Number of elements about to be added
    pub extra: usize,
    /// Capacity of the current block, 0 if there is none
    pub capacity: usize,
    pub direction: GrowthDirection,
    /// Flags of the current block, including the growth history
    pub history: BlockFlags,
    pub mode: GrowthMode,
}

/// Output of [`plan`]: the new capacity and the number of free slots placed
/// before the first element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPlan {
    pub capacity: usize,
    pub front_slack: usize,
}

impl GrowthRequest {
    fn required(&self) -> Result<usize, ArrayError> {
        self.len
            .checked_add(self.extra)
            .ok_or(ArrayError::CapacityOverflow {
                requested: self.extra,
            })
    }

    fn two_sided(&self) -> bool {
        (self.history | self.direction.flag())
            .contains(BlockFlags::GROWN_AT_BEGIN | BlockFlags::GROWN_AT_END)
    }
}

/// Decides the capacity of a replacement block and where its slack goes.
///
/// # Errors
///
/// Returns `ArrayError::CapacityOverflow` if `len + extra` overflows.
pub fn plan(request: &GrowthRequest) -> Result<GrowthPlan, ArrayError> {
    let required = request.required()?;
    let capacity = match request.mode {
        GrowthMode::Exact => required,
        GrowthMode::Detach if required <= request.capacity => request.capacity,
        GrowthMode::Detach | GrowthMode::Grow => required
            .max(request.capacity.saturating_mul(GROWTH_FACTOR))
            .max(MIN_CAPACITY),
    };
    let front_slack = match request.mode {
        GrowthMode::Exact => 0,
        GrowthMode::Detach | GrowthMode::Grow => {
            place_slack(capacity - required, request)
        }
    };
    Ok(GrowthPlan {
        capacity,
        front_slack,
    })
}

/// Decides whether an exclusive block that is out of room on the requested
/// side should move its live range instead of reallocating.
///
/// Returns the new number of free slots before the first element, or `None`
/// when the block has to be replaced.
#[must_use]
pub fn readjust(request: &GrowthRequest) -> Option<usize> {
    let required = request.required().ok()?;
    if required > request.capacity {
        return None;
    }
    let limit = match request.direction {
        GrowthDirection::AtEnd => READJUST_END_NUMERATOR,
        GrowthDirection::AtBegin => READJUST_BEGIN_NUMERATOR,
    };
    let fits = request
        .len
        .checked_mul(3)
        .zip(request.capacity.checked_mul(limit))
        .is_some_and(|(used, allowed)| used < allowed);
    fits.then(|| place_slack(request.capacity - required, request))
}

fn place_slack(slack: usize, request: &GrowthRequest) -> usize {
    match (request.direction, request.two_sided()) {
        (GrowthDirection::AtEnd, false) => 0,
        (GrowthDirection::AtBegin, false) => slack,
        (GrowthDirection::AtEnd, true) => slack / 2,
        (GrowthDirection::AtBegin, true) => slack - slack / 2,
    }
}
