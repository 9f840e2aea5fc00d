//! Spatial indexes for named points on a bounded integer field.
//!
//! This crate contains:
//! - Geometry shared by the trees (points, inclusive rectangles, directions)
//! - The [`Tree`] contract with its bounds-checked moves
//! - [`QuadTree`], a region quadtree with one entry per leaf
//! - [`PointTree`], an alternating-axis point tree with size balancing

mod error;
mod geometry;
mod pointtree;
mod quadtree;
mod tree;

pub use error::{BoundsReason, ParseDirectionError, Result, TreeError};
pub use geometry::{Diagonal, Point, Rect, Step};
pub use pointtree::{Axis, PointNode, PointTree};
pub use quadtree::{QuadNode, QuadTree, Quadrant};
pub use tree::Tree;
