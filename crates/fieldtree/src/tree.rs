//! The operation set shared by every field index.

use tracing::trace;

use crate::error::{Result, TreeError};
use crate::geometry::{Diagonal, Point, Rect, Step};

/// A named point stored in a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) point: Point,
}

impl Entry {
    pub(crate) fn new(name: &str, point: Point) -> Self {
        Self {
            name: name.to_string(),
            point,
        }
    }
}

/// A dynamic 2D index of uniquely named points on a bounded field.
///
/// Mutations validate before touching the structure: a rejected call leaves the
/// tree exactly as it was. Removing something that is not stored is a no-op.
pub trait Tree {
    /// Node type handed to [`Tree::depth`].
    type Node;

    /// Field rectangle fixed at construction.
    fn bounds(&self) -> Rect;

    /// Store `name` at `point`.
    ///
    /// Fails with `OutOfBounds` if the point is outside the field or already
    /// occupied, and with `DuplicateName` if the name is already stored.
    fn insert(&mut self, name: &str, point: Point) -> Result<()>;

    /// Remove the entry called `name`, if any.
    fn remove(&mut self, name: &str);

    /// Remove the entry at `point`, if any.
    fn remove_point(&mut self, point: Point);

    fn contains(&self, name: &str) -> bool;

    fn contains_point(&self, point: Point) -> bool;

    /// Current point of `name`.
    fn location(&self, name: &str) -> Option<Point>;

    /// Name stored at `point`.
    fn name_at(&self, point: Point) -> Option<&str>;

    /// Names inside the closed box between `anchor` and `anchor` pushed
    /// `distance` units towards `direction`. Order is unspecified.
    fn names_in_range(&self, anchor: Point, direction: Diagonal, distance: u32) -> Vec<String>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Number of nodes.
    fn size(&self) -> usize;

    /// Nodes on the longest root-to-leaf path.
    fn height(&self) -> usize;

    /// Edges from the root down to `subtree`, or `None` unless it is a strict
    /// descendant of the root. The root itself has no depth.
    fn depth(&self, subtree: &Self::Node) -> Option<usize>;

    /// True if the root has no children.
    fn is_leaf(&self) -> bool;

    /// True if nothing is stored.
    fn is_empty(&self) -> bool;

    /// Move `name` by `steps` towards `direction`.
    ///
    /// Returns the new point, or `None` when no such name is stored. On
    /// `OutOfBounds` the entry stays where it was.
    fn move_name(&mut self, name: &str, direction: Step, steps: u32) -> Result<Option<Point>> {
        match self.location(name) {
            Some(from) => relocate(self, name.to_string(), from, direction, steps).map(Some),
            None => Ok(None),
        }
    }

    /// Move whatever is stored at `point` by `steps` towards `direction`.
    fn move_point(&mut self, point: Point, direction: Step, steps: u32) -> Result<Option<Point>> {
        match self.name_at(point).map(str::to_string) {
            Some(name) => relocate(self, name, point, direction, steps).map(Some),
            None => Ok(None),
        }
    }
}

fn relocate<T: Tree + ?Sized>(
    tree: &mut T,
    name: String,
    from: Point,
    direction: Step,
    steps: u32,
) -> Result<Point> {
    let to = direction
        .offset(from, steps)
        .ok_or_else(|| TreeError::overflow(from))?;
    if to == from {
        return Ok(from);
    }
    if !tree.bounds().contains(to) {
        return Err(TreeError::outside(to));
    }
    if tree.contains_point(to) {
        return Err(TreeError::occupied(to));
    }

    tree.remove_point(from);
    if let Err(err) = tree.insert(&name, to) {
        // Put the entry back before surfacing the failure.
        tree.insert(&name, from)?;
        return Err(err);
    }
    trace!(%name, from = ?from, to = ?to, "Moved entry");
    Ok(to)
}
