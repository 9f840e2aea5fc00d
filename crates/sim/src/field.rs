//! The playing field: whichever index the config picked.

use fieldtree::{Diagonal, Point, PointTree, QuadTree, Rect, Step, Tree};
use tracing::debug;

use crate::config::{FieldConfig, FieldKind};

/// A field backed by either tree.
#[derive(Debug)]
pub enum Field {
    Quad(QuadTree),
    Point(PointTree),
}

impl Field {
    pub fn new(config: &FieldConfig) -> Self {
        match config.kind {
            FieldKind::Quad => Field::Quad(QuadTree::with_extent(config.extent)),
            FieldKind::Point => Field::Point(PointTree::with_extent(config.extent)),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Quad(_) => FieldKind::Quad,
            Field::Point(_) => FieldKind::Point,
        }
    }

    /// Balance a point tree. The quadtree needs no upkeep.
    pub fn rebalance(&mut self) {
        if let Field::Point(tree) = self {
            let before = tree.height();
            tree.balance();
            debug!(before, after = tree.height(), "Rebalanced field");
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Field::Quad(t) => t.bounds(),
            Field::Point(t) => t.bounds(),
        }
    }

    pub fn insert(&mut self, name: &str, point: Point) -> fieldtree::Result<()> {
        match self {
            Field::Quad(t) => t.insert(name, point),
            Field::Point(t) => t.insert(name, point),
        }
    }

    pub fn remove(&mut self, name: &str) {
        match self {
            Field::Quad(t) => t.remove(name),
            Field::Point(t) => t.remove(name),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            Field::Quad(t) => t.contains(name),
            Field::Point(t) => t.contains(name),
        }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        match self {
            Field::Quad(t) => t.contains_point(point),
            Field::Point(t) => t.contains_point(point),
        }
    }

    pub fn location(&self, name: &str) -> Option<Point> {
        match self {
            Field::Quad(t) => t.location(name),
            Field::Point(t) => t.location(name),
        }
    }

    pub fn names_in_range(&self, anchor: Point, direction: Diagonal, distance: u32) -> Vec<String> {
        match self {
            Field::Quad(t) => t.names_in_range(anchor, direction, distance),
            Field::Point(t) => t.names_in_range(anchor, direction, distance),
        }
    }

    pub fn move_name(
        &mut self,
        name: &str,
        direction: Step,
        steps: u32,
    ) -> fieldtree::Result<Option<Point>> {
        match self {
            Field::Quad(t) => t.move_name(name, direction, steps),
            Field::Point(t) => t.move_name(name, direction, steps),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Field::Quad(t) => t.len(),
            Field::Point(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Field::Quad(t) => t.is_empty(),
            Field::Point(t) => t.is_empty(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Field::Quad(t) => t.height(),
            Field::Point(t) => t.height(),
        }
    }
}
