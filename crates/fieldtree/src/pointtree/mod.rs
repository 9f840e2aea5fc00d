//! Alternating-axis point tree (2-d tree).
//!
//! Every populated node stores one entry. Points whose coordinate on the
//! node's split axis is less than or equal to the node's own go to `lt`, the
//! rest to `gt`. The root splits on `x` and the axis flips at each level. Only
//! the tree itself carries the field rectangle.

mod balance;

use std::collections::HashMap;
use std::ptr;

use tracing::trace;

use crate::error::{Result, TreeError};
use crate::geometry::{Diagonal, Point, Rect};
use crate::tree::{Entry, Tree};

/// Coordinate a node compares on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn flip(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Coordinate of `point` on this axis.
    #[inline]
    pub fn of(self, point: Point) -> i32 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Lt,
    Gt,
}

type Slot = Option<Box<PointNode>>;

/// A node of the [`PointTree`].
#[derive(Debug)]
pub struct PointNode {
    entry: Option<Entry>,
    axis: Axis,
    lt: Slot,
    gt: Slot,
}

impl PointNode {
    fn new(axis: Axis) -> Self {
        Self {
            entry: None,
            axis,
            lt: None,
            gt: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.entry.as_ref().map(|entry| entry.name.as_str())
    }

    pub fn point(&self) -> Option<Point> {
        self.entry.as_ref().map(|entry| entry.point)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Subtree of points at or below this node's coordinate.
    pub fn lt(&self) -> Option<&PointNode> {
        self.lt.as_deref()
    }

    /// Subtree of points above this node's coordinate.
    pub fn gt(&self) -> Option<&PointNode> {
        self.gt.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.lt.is_none() && self.gt.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none() && self.is_leaf()
    }

    /// Nodes in this subtree. Empty and leaf nodes count as one.
    pub fn size(&self) -> usize {
        1 + self.children().map(PointNode::size).sum::<usize>()
    }

    /// Entries stored in this subtree.
    pub fn len(&self) -> usize {
        usize::from(self.entry.is_some()) + self.children().map(PointNode::len).sum::<usize>()
    }

    /// Nodes on the longest path down from here.
    pub fn height(&self) -> usize {
        1 + self.children().map(PointNode::height).max().unwrap_or(0)
    }

    /// Edges from this node down to `target`, routing on `target`'s point.
    /// `None` unless `target` is a strict descendant.
    pub fn depth(&self, target: &PointNode) -> Option<usize> {
        let own = self.point()?;
        let probe = target.point()?;
        let child = self.slot(self.side_of(own, probe)).as_deref()?;
        if ptr::eq(child, target) {
            return Some(1);
        }
        child.depth(target).map(|depth| depth + 1)
    }

    fn children(&self) -> impl Iterator<Item = &PointNode> {
        self.lt.as_deref().into_iter().chain(self.gt.as_deref())
    }

    fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::Lt => &self.lt,
            Side::Gt => &self.gt,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::Lt => &mut self.lt,
            Side::Gt => &mut self.gt,
        }
    }

    fn side_of(&self, own: Point, point: Point) -> Side {
        if self.axis.of(point) <= self.axis.of(own) {
            Side::Lt
        } else {
            Side::Gt
        }
    }

    fn find(&self, point: Point) -> Option<&Entry> {
        let entry = self.entry.as_ref()?;
        if entry.point == point {
            return Some(entry);
        }
        self.slot(self.side_of(entry.point, point)).as_deref()?.find(point)
    }

    /// Caller guarantees the point is in bounds and unoccupied.
    fn insert(&mut self, entry: Entry) {
        let Some(own) = self.point() else {
            self.entry = Some(entry);
            return;
        };
        let axis = self.axis.flip();
        let side = self.side_of(own, entry.point);
        self.slot_mut(side)
            .get_or_insert_with(|| Box::new(PointNode::new(axis)))
            .insert(entry);
    }

    fn remove(&mut self, point: Point) -> Option<Entry> {
        let own = self.point()?;
        if own == point {
            let removed = self.entry.take();
            self.refill(point);
            return removed;
        }
        self.take_from(self.side_of(own, point), point)
    }

    /// Remove `point` from one child subtree and prune the child if it emptied.
    fn take_from(&mut self, side: Side, point: Point) -> Option<Entry> {
        let slot = self.slot_mut(side);
        let removed = slot.as_mut()?.remove(point);
        if slot.as_ref().is_some_and(|child| child.is_empty()) {
            *slot = None;
        }
        removed
    }

    /// Closest entry to `target` along `axis` anywhere in this subtree, with its
    /// distance.
    fn closest(&self, target: i32, axis: Axis) -> Option<(u32, Point)> {
        let own = self
            .point()
            .map(|point| (axis.of(point).abs_diff(target), point));
        let below = self.children().filter_map(|child| child.closest(target, axis));
        own.into_iter().chain(below).min_by_key(|(distance, _)| *distance)
    }

    /// Fill a node whose entry was just cleared with its closest descendant.
    fn refill(&mut self, cleared: Point) {
        let target = self.axis.of(cleared);
        let from_lt = self.lt().and_then(|lt| lt.closest(target, self.axis));
        let from_gt = self.gt().and_then(|gt| gt.closest(target, self.axis));
        let (side, donor) = match (from_lt, from_gt) {
            (Some(lt), Some(gt)) if gt.0 < lt.0 => (Side::Gt, gt.1),
            (Some(lt), _) => (Side::Lt, lt.1),
            (None, Some(gt)) => (Side::Gt, gt.1),
            (None, None) => return,
        };

        let Some(entry) = self.take_from(side, donor) else {
            return;
        };
        trace!(name = %entry.name, from = ?donor, "Promoting point tree entry");
        self.entry = Some(entry);
        if side == Side::Gt {
            self.reroute_ties();
        }
    }

    /// After a promotion out of `gt`, entries in `gt` sharing the new split
    /// coordinate belong in `lt`.
    fn reroute_ties(&mut self) {
        let Some(own) = self.point() else {
            return;
        };
        let split = self.axis.of(own);
        let mut ties = Vec::new();
        if let Some(gt) = self.gt() {
            gt.points_on(self.axis, split, &mut ties);
        }
        for point in ties {
            if let Some(entry) = self.take_from(Side::Gt, point) {
                self.insert(entry);
            }
        }
    }

    fn points_on(&self, axis: Axis, value: i32, out: &mut Vec<Point>) {
        if let Some(point) = self.point() {
            if axis.of(point) == value {
                out.push(point);
            }
        }
        for child in self.children() {
            child.points_on(axis, value, out);
        }
    }

    fn collect_in(&self, rect: &Rect, out: &mut Vec<String>) {
        let Some(entry) = &self.entry else {
            return;
        };
        if rect.contains(entry.point) {
            out.push(entry.name.clone());
        }
        let split = self.axis.of(entry.point);
        if let Some(lt) = self.lt() {
            if self.axis.of(rect.min) <= split {
                lt.collect_in(rect, out);
            }
        }
        if let Some(gt) = self.gt() {
            if self.axis.of(rect.max) > split {
                gt.collect_in(rect, out);
            }
        }
    }
}

/// Point tree over a fixed field rectangle.
#[derive(Debug)]
pub struct PointTree {
    bounds: Rect,
    root: PointNode,
    locations: HashMap<String, Point>,
}

impl PointTree {
    /// Create an empty tree over `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            root: PointNode::new(Axis::X),
            locations: HashMap::new(),
        }
    }

    /// Create an empty tree over `[0, extent] x [0, extent]`.
    pub fn with_extent(extent: i32) -> Self {
        Self::new(Rect::square(extent))
    }

    pub fn root(&self) -> &PointNode {
        &self.root
    }

    /// Even out subtree sizes so that, wherever the coordinates allow it, no
    /// node's `lt` and `gt` differ by more than one entry.
    ///
    /// This bounds size skew, not height.
    pub fn balance(&mut self) {
        let before = self.root.height();
        self.root.balance();
        trace!(before, after = self.root.height(), "Balanced point tree");
    }
}

impl Tree for PointTree {
    type Node = PointNode;

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn insert(&mut self, name: &str, point: Point) -> Result<()> {
        if !self.bounds.contains(point) {
            return Err(TreeError::outside(point));
        }
        if self.root.find(point).is_some() {
            return Err(TreeError::occupied(point));
        }
        if self.locations.contains_key(name) {
            return Err(TreeError::DuplicateName(name.to_string()));
        }
        self.root.insert(Entry::new(name, point));
        self.locations.insert(name.to_string(), point);
        Ok(())
    }

    fn remove(&mut self, name: &str) {
        if let Some(point) = self.locations.get(name).copied() {
            self.remove_point(point);
        }
    }

    fn remove_point(&mut self, point: Point) {
        if let Some(entry) = self.root.remove(point) {
            self.locations.remove(&entry.name);
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    fn contains_point(&self, point: Point) -> bool {
        self.root.find(point).is_some()
    }

    fn location(&self, name: &str) -> Option<Point> {
        self.locations.get(name).copied()
    }

    fn name_at(&self, point: Point) -> Option<&str> {
        self.root.find(point).map(|entry| entry.name.as_str())
    }

    fn names_in_range(&self, anchor: Point, direction: Diagonal, distance: u32) -> Vec<String> {
        let rect = direction.range(anchor, distance);
        let mut names = Vec::new();
        self.root.collect_in(&rect, &mut names);
        names
    }

    fn len(&self) -> usize {
        self.locations.len()
    }

    fn size(&self) -> usize {
        self.root.size()
    }

    fn height(&self) -> usize {
        self.root.height()
    }

    fn depth(&self, subtree: &PointNode) -> Option<usize> {
        self.root.depth(subtree)
    }

    fn is_leaf(&self) -> bool {
        self.root.is_leaf()
    }

    fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
