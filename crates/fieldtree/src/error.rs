//! Tree error types.

use std::fmt;

use thiserror::Error;

use crate::Point;

/// Result alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised by mutating tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Point ({}, {}) is out of bounds: {reason}", point.x, point.y)]
    OutOfBounds { point: Point, reason: BoundsReason },

    #[error("Name already stored in tree: {0}")]
    DuplicateName(String),
}

impl TreeError {
    pub(crate) fn outside(point: Point) -> Self {
        Self::OutOfBounds { point, reason: BoundsReason::Outside }
    }

    pub(crate) fn occupied(point: Point) -> Self {
        Self::OutOfBounds { point, reason: BoundsReason::Occupied }
    }

    /// `from` is the start of a move whose target is not representable.
    pub(crate) fn overflow(from: Point) -> Self {
        Self::OutOfBounds { point: from, reason: BoundsReason::Overflow }
    }

    /// True for either flavour of `OutOfBounds`.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

/// Why a point was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsReason {
    /// The point lies outside the field rectangle.
    Outside,
    /// Another entry already sits on the point.
    Occupied,
    /// A move starting at the point overflows the coordinate range.
    Overflow,
}

impl fmt::Display for BoundsReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsReason::Outside => f.write_str("outside the field"),
            BoundsReason::Occupied => f.write_str("already occupied"),
            BoundsReason::Overflow => f.write_str("move target overflows the coordinate range"),
        }
    }
}

/// A compass string that does not name a known direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid direction: {0:?}")]
pub struct ParseDirectionError(pub String);
