//! Region QuadTree for named points.
//!
//! Every node covers an inclusive integer region split around its center.
//! A node is empty, a leaf holding exactly one entry, or an internal node with
//! up to four child quadrants. The enum makes "data or children, never both"
//! impossible to break.

use std::collections::HashMap;
use std::{mem, ptr};

use tracing::trace;

use crate::error::{Result, TreeError};
use crate::geometry::{Diagonal, Point, Rect};
use crate::tree::{Entry, Tree};

/// One of the four sub-regions of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Quadrant of `point` around `center`. Points on a boundary lean north-west.
    #[inline]
    pub fn of(center: Point, point: Point) -> Self {
        match (point.x <= center.x, point.y <= center.y) {
            (true, true) => Quadrant::NorthWest,
            (true, false) => Quadrant::SouthWest,
            (false, true) => Quadrant::NorthEast,
            (false, false) => Quadrant::SouthEast,
        }
    }

    /// The part of `region` this quadrant covers.
    pub fn region(self, region: Rect) -> Rect {
        let center = region.center();
        let west = matches!(self, Quadrant::NorthWest | Quadrant::SouthWest);
        let north = matches!(self, Quadrant::NorthWest | Quadrant::NorthEast);
        let (min_x, max_x) = if west {
            (region.min.x, center.x)
        } else {
            (center.x + 1, region.max.x)
        };
        let (min_y, max_y) = if north {
            (region.min.y, center.y)
        } else {
            (center.y + 1, region.max.y)
        };
        Rect::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

type Children = [Option<Box<QuadNode>>; 4];

#[derive(Debug)]
enum NodeKind {
    Empty,
    Leaf(Entry),
    Internal(Children),
}

/// A node of the [`QuadTree`].
#[derive(Debug)]
pub struct QuadNode {
    region: Rect,
    kind: NodeKind,
}

impl QuadNode {
    fn new(region: Rect) -> Self {
        Self {
            region,
            kind: NodeKind::Empty,
        }
    }

    /// Region covered by this node.
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Split point of this node.
    pub fn center(&self) -> Point {
        self.region.center()
    }

    /// Stored entry, for leaves.
    pub fn entry(&self) -> Option<(&str, Point)> {
        match &self.kind {
            NodeKind::Leaf(entry) => Some((entry.name.as_str(), entry.point)),
            _ => None,
        }
    }

    /// Child quadrant, for internal nodes.
    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadNode> {
        match &self.kind {
            NodeKind::Internal(children) => children[quadrant.index()].as_deref(),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, NodeKind::Internal(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, NodeKind::Empty)
    }

    /// Nodes in this subtree. Empty and leaf nodes count as one.
    pub fn size(&self) -> usize {
        match &self.kind {
            NodeKind::Internal(children) => {
                1 + children.iter().flatten().map(|child| child.size()).sum::<usize>()
            }
            _ => 1,
        }
    }

    /// Nodes on the longest path down from here.
    pub fn height(&self) -> usize {
        match &self.kind {
            NodeKind::Internal(children) => {
                1 + children.iter().flatten().map(|child| child.height()).max().unwrap_or(0)
            }
            _ => 1,
        }
    }

    /// Edges from this node down to `target`, following the quadrant that holds
    /// `target`'s center. `None` unless `target` is a strict descendant, so a
    /// node is never at any depth below itself.
    pub fn depth(&self, target: &QuadNode) -> Option<usize> {
        let NodeKind::Internal(children) = &self.kind else {
            return None;
        };
        let quadrant = Quadrant::of(self.center(), target.center());
        let child = children[quadrant.index()].as_deref()?;
        if ptr::eq(child, target) {
            return Some(1);
        }
        child.depth(target).map(|depth| depth + 1)
    }

    fn find(&self, point: Point) -> Option<&Entry> {
        match &self.kind {
            NodeKind::Empty => None,
            NodeKind::Leaf(entry) => (entry.point == point).then_some(entry),
            NodeKind::Internal(children) => {
                let quadrant = Quadrant::of(self.center(), point);
                children[quadrant.index()].as_deref()?.find(point)
            }
        }
    }

    /// Caller guarantees the point is inside the region and unoccupied.
    fn insert(&mut self, entry: Entry) {
        self.kind = match mem::replace(&mut self.kind, NodeKind::Empty) {
            NodeKind::Empty => NodeKind::Leaf(entry),
            NodeKind::Leaf(existing) => {
                trace!(center = ?self.center(), "Subdividing quad node");
                let mut children = Children::default();
                Self::insert_child(self.region, &mut children, existing);
                Self::insert_child(self.region, &mut children, entry);
                NodeKind::Internal(children)
            }
            NodeKind::Internal(mut children) => {
                Self::insert_child(self.region, &mut children, entry);
                NodeKind::Internal(children)
            }
        };
    }

    fn insert_child(region: Rect, children: &mut Children, entry: Entry) {
        let quadrant = Quadrant::of(region.center(), entry.point);
        children[quadrant.index()]
            .get_or_insert_with(|| Box::new(QuadNode::new(quadrant.region(region))))
            .insert(entry);
    }

    fn remove(&mut self, point: Point) -> Option<Entry> {
        let center = self.center();
        if let NodeKind::Internal(children) = &mut self.kind {
            let quadrant = Quadrant::of(center, point);
            let removed = children[quadrant.index()].as_mut()?.remove(point)?;
            self.collapse();
            return Some(removed);
        }

        if self.find(point).is_none() {
            return None;
        }
        match mem::replace(&mut self.kind, NodeKind::Empty) {
            NodeKind::Leaf(entry) => Some(entry),
            other => {
                self.kind = other;
                None
            }
        }
    }

    /// Drop empty children and pull a lone leaf child up into this node.
    fn collapse(&mut self) {
        let NodeKind::Internal(children) = &mut self.kind else {
            return;
        };
        for slot in children.iter_mut() {
            if slot.as_ref().is_some_and(|child| child.is_empty()) {
                *slot = None;
            }
        }

        let live = children.iter().filter(|slot| slot.is_some()).count();
        if live == 0 {
            self.kind = NodeKind::Empty;
            return;
        }
        if live > 1 {
            return;
        }
        let Some(slot) = children.iter_mut().find(|slot| slot.is_some()) else {
            return;
        };
        if slot.as_ref().is_some_and(|child| child.is_leaf()) {
            if let Some(child) = slot.take() {
                trace!(center = ?self.region.center(), "Collapsing quad node");
                self.kind = child.kind;
            }
        }
    }

    fn collect_in(&self, rect: &Rect, out: &mut Vec<String>) {
        match &self.kind {
            NodeKind::Empty => {}
            NodeKind::Leaf(entry) => {
                if rect.contains(entry.point) {
                    out.push(entry.name.clone());
                }
            }
            NodeKind::Internal(children) => {
                for child in children.iter().flatten() {
                    if child.region.intersects(rect) {
                        child.collect_in(rect, out);
                    }
                }
            }
        }
    }
}

/// Region quadtree over the field `[0, 2 * center.x] x [0, 2 * center.y]`.
///
/// Names are resolved through a side map so `remove(name)` descends straight
/// to the owning leaf.
#[derive(Debug)]
pub struct QuadTree {
    root: QuadNode,
    locations: HashMap<String, Point>,
}

impl QuadTree {
    /// Create an empty tree centered on `center`.
    pub fn new(center: Point) -> Self {
        let max = Point::new(center.x.saturating_mul(2), center.y.saturating_mul(2));
        Self::with_region(Rect::new(Point::ZERO, max))
    }

    /// Create an empty tree over `[0, extent] x [0, extent]`.
    pub fn with_extent(extent: i32) -> Self {
        Self::with_region(Rect::square(extent))
    }

    fn with_region(region: Rect) -> Self {
        Self {
            root: QuadNode::new(region),
            locations: HashMap::new(),
        }
    }

    pub fn root(&self) -> &QuadNode {
        &self.root
    }

    pub fn center(&self) -> Point {
        self.root.center()
    }
}

impl Tree for QuadTree {
    type Node = QuadNode;

    fn bounds(&self) -> Rect {
        self.root.region
    }

    fn insert(&mut self, name: &str, point: Point) -> Result<()> {
        if !self.root.region.contains(point) {
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

    fn depth(&self, subtree: &QuadNode) -> Option<usize> {
        self.root.depth(subtree)
    }

    fn is_leaf(&self) -> bool {
        self.root.is_leaf()
    }

    fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Step;

    fn field() -> QuadTree {
        let mut tree = QuadTree::new(Point::new(250, 250));
        tree.insert("a", Point::new(250, 250)).unwrap();
        tree.insert("b", Point::new(350, 350)).unwrap();
        tree
    }

    /// Walk the tree and check the structural rules hold everywhere below `node`.
    fn assert_well_formed(node: &QuadNode, is_root: bool) {
        match &node.kind {
            NodeKind::Empty => assert!(is_root, "empty node retained below the root"),
            NodeKind::Leaf(entry) => assert!(node.region.contains(entry.point)),
            NodeKind::Internal(children) => {
                let live: Vec<&QuadNode> = children.iter().flatten().map(|c| c.as_ref()).collect();
                assert!(!live.is_empty(), "internal node without children");
                if live.len() == 1 {
                    assert!(!live[0].is_leaf(), "lone leaf child was not pulled up");
                }
                for quadrant in Quadrant::ALL {
                    if let Some(child) = children[quadrant.index()].as_deref() {
                        assert_eq!(child.region, quadrant.region(node.region));
                        assert_well_formed(child, false);
                    }
                }
            }
        }
    }

    #[test]
    fn test_quadrant_selection_leans_north_west() {
        let center = Point::new(250, 250);
        assert_eq!(Quadrant::of(center, Point::new(250, 250)), Quadrant::NorthWest);
        assert_eq!(Quadrant::of(center, Point::new(250, 251)), Quadrant::SouthWest);
        assert_eq!(Quadrant::of(center, Point::new(251, 250)), Quadrant::NorthEast);
        assert_eq!(Quadrant::of(center, Point::new(251, 251)), Quadrant::SouthEast);
    }

    #[test]
    fn test_quadrant_regions_tile_parent() {
        let region = Rect::square(500);
        let rect = |min: (i32, i32), max: (i32, i32)| {
            Rect::new(Point::new(min.0, min.1), Point::new(max.0, max.1))
        };
        assert_eq!(Quadrant::NorthWest.region(region), rect((0, 0), (250, 250)));
        assert_eq!(Quadrant::NorthEast.region(region), rect((251, 0), (500, 250)));
        assert_eq!(Quadrant::SouthWest.region(region), rect((0, 251), (250, 500)));
        assert_eq!(Quadrant::SouthEast.region(region), rect((251, 251), (500, 500)));
        assert_eq!(Quadrant::SouthEast.region(region).center(), Point::new(375, 375));
    }

    #[test]
    fn test_new_tree_is_empty_leaf() {
        let tree = QuadTree::new(Point::new(250, 250));
        assert!(tree.is_empty());
        assert!(tree.is_leaf());
        assert_eq!(tree.center(), Point::new(250, 250));
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.bounds(), Rect::square(500));
    }

    #[test]
    fn test_two_entries_split_root() {
        let tree = field();
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.size(), 3);
        assert!(!tree.is_leaf());
        assert!(!tree.is_empty());
        assert_eq!(tree.root().entry(), None);

        let nw = tree.root().child(Quadrant::NorthWest).unwrap();
        assert!(nw.is_leaf());
        assert_eq!(nw.entry(), Some(("a", Point::new(250, 250))));
        assert_eq!(nw.center(), Point::new(125, 125));
        let se = tree.root().child(Quadrant::SouthEast).unwrap();
        assert_eq!(se.entry(), Some(("b", Point::new(350, 350))));
        assert!(tree.root().child(Quadrant::NorthEast).is_none());
        assert_well_formed(tree.root(), true);
    }

    #[test]
    fn test_collision_leaves_tree_unchanged() {
        let mut tree = field();
        let err = tree.insert("c", Point::new(250, 250)).unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(tree.size(), 3);
        assert!(!tree.contains("c"));

        let err = tree.insert("c", Point::new(501, 501)).unwrap_err();
        assert_eq!(err, TreeError::outside(Point::new(501, 501)));
    }

    #[test]
    fn test_move_north_and_range() {
        let mut tree = field();
        assert_eq!(tree.move_name("b", Step::North, 100).unwrap(), Some(Point::new(350, 250)));
        let north_east = tree.root().child(Quadrant::NorthEast).unwrap();
        assert_eq!(north_east.entry(), Some(("b", Point::new(350, 250))));

        let mut names = tree.names_in_range(Point::new(500, 500), Diagonal::NorthWest, 500);
        names.sort();
        assert_eq!(names, vec!["a", "b"]);

        let err = tree.move_point(Point::new(250, 250), Step::East, 100).unwrap_err();
        assert_eq!(err, TreeError::occupied(Point::new(350, 250)));
        assert_eq!(tree.location("a"), Some(Point::new(250, 250)));
    }

    #[test]
    fn test_nearby_points_subdivide_until_separated() {
        let mut tree = QuadTree::with_extent(500);
        tree.insert("1", Point::new(449, 449)).unwrap();
        tree.insert("2", Point::new(448, 449)).unwrap();
        assert_eq!(tree.root().entry(), None);
        assert!(tree.height() > 3);
        assert_eq!(tree.name_at(Point::new(449, 449)), Some("1"));
        assert_eq!(tree.name_at(Point::new(448, 449)), Some("2"));
        assert_well_formed(tree.root(), true);

        // Adjacent cells still separate at the bottom.
        tree.insert("3", Point::new(448, 448)).unwrap();
        assert_well_formed(tree.root(), true);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_remove_collapses_chain() {
        let mut tree = QuadTree::with_extent(500);
        tree.insert("1", Point::new(449, 449)).unwrap();
        tree.insert("2", Point::new(448, 449)).unwrap();
        tree.insert("far", Point::new(10, 10)).unwrap();
        assert_well_formed(tree.root(), true);

        tree.remove("2");
        // Only "1" and "far" are left, each a direct leaf of the root.
        assert_well_formed(tree.root(), true);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.size(), 3);

        tree.remove("far");
        assert!(tree.is_leaf());
        assert_eq!(tree.root().entry(), Some(("1", Point::new(449, 449))));
        assert_eq!(tree.size(), 1);

        tree.remove_point(Point::new(449, 449));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_remove_keeps_internal_only_child() {
        let mut tree = QuadTree::with_extent(500);
        tree.insert("a", Point::new(10, 10)).unwrap();
        tree.insert("b", Point::new(20, 20)).unwrap();
        tree.insert("c", Point::new(400, 400)).unwrap();

        tree.remove("c");
        // The north-west child still holds two entries, so it stays internal.
        assert_well_formed(tree.root(), true);
        let nw = tree.root().child(Quadrant::NorthWest).unwrap();
        assert!(!nw.is_leaf());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_depth() {
        let tree = field();
        let nw = tree.root().child(Quadrant::NorthWest).unwrap();
        let se = tree.root().child(Quadrant::SouthEast).unwrap();
        assert_eq!(tree.depth(tree.root()), None);
        assert_eq!(tree.depth(nw), Some(1));
        assert_eq!(tree.depth(se), Some(1));
        assert_eq!(nw.depth(nw), None);

        let stranger = QuadTree::new(Point::new(50, 50));
        assert_eq!(tree.depth(stranger.root()), None);

        let mut deep = QuadTree::with_extent(500);
        deep.insert("1", Point::new(449, 449)).unwrap();
        deep.insert("2", Point::new(448, 449)).unwrap();
        let mut node = deep.root();
        let mut expected = 0;
        while let Some(next) = Quadrant::ALL.into_iter().find_map(|q| node.child(q)) {
            expected += 1;
            node = next;
            assert_eq!(deep.depth(node), Some(expected));
        }
        assert_eq!(expected + 1, deep.height());
    }

    #[test]
    fn test_depth_of_nested_quadrants() {
        use Quadrant::*;

        let mut tree = QuadTree::new(Point::new(250, 250));
        tree.insert("jon", Point::new(250, 250)).unwrap();
        tree.insert("joe", Point::new(300, 300)).unwrap();
        tree.insert("job", Point::new(50, 50)).unwrap();
        tree.insert("jay", Point::new(25, 25)).unwrap();

        let walk = |path: &[Quadrant]| {
            path.iter()
                .try_fold(tree.root(), |node, &quadrant| node.child(quadrant))
                .unwrap()
        };
        let jon = walk(&[NorthWest, SouthEast]);
        let joe = walk(&[SouthEast]);
        let job = walk(&[NorthWest, NorthWest, NorthWest, SouthEast]);
        let jay = walk(&[NorthWest, NorthWest, NorthWest, NorthWest]);
        assert_eq!(jon.entry(), Some(("jon", Point::new(250, 250))));
        assert_eq!(job.entry(), Some(("job", Point::new(50, 50))));
        assert_eq!(jay.entry(), Some(("jay", Point::new(25, 25))));

        assert_eq!(tree.depth(jon), Some(2));
        assert_eq!(tree.depth(joe), Some(1));
        assert_eq!(tree.depth(jay), Some(4));
        assert_eq!(tree.depth(job), Some(4));
        assert_eq!(job.depth(jay), None);
        assert_eq!(walk(&[NorthWest]).depth(jay), Some(3));
    }

    #[test]
    fn test_height_grows_with_nested_inserts() {
        let mut tree = QuadTree::new(Point::new(250, 250));
        assert_eq!(tree.height(), 1);
        tree.insert("jon", Point::new(250, 250)).unwrap();
        assert_eq!(tree.height(), 1);
        tree.insert("joe", Point::new(300, 300)).unwrap();
        assert_eq!(tree.height(), 2);
        tree.insert("job", Point::new(50, 50)).unwrap();
        assert_eq!(tree.height(), 3);
        tree.insert("0", Point::new(25, 25)).unwrap();
        assert_eq!(tree.height(), 5);
    }

    #[test]
    fn test_names_in_range_near_the_far_corner() {
        let mut tree = QuadTree::new(Point::new(250, 250));
        tree.insert("jon", Point::new(250, 250)).unwrap();
        tree.insert("joe", Point::new(300, 300)).unwrap();
        tree.insert("0", Point::new(500, 500)).unwrap();
        tree.insert("1", Point::new(449, 449)).unwrap();
        tree.insert("2", Point::new(448, 449)).unwrap();

        let sorted = |origin: (i32, i32), diagonal: Diagonal, distance: u32| {
            let origin = Point::new(origin.0, origin.1);
            let mut names = tree.names_in_range(origin, diagonal, distance);
            names.sort();
            names
        };
        assert_eq!(sorted((200, 200), Diagonal::SouthEast, 150), ["joe", "jon"]);
        assert_eq!(sorted((350, 350), Diagonal::NorthWest, 150), ["joe", "jon"]);
        assert_eq!(sorted((200, 200), Diagonal::SouthEast, 90), ["jon"]);
        assert_eq!(sorted((350, 350), Diagonal::NorthWest, 90), ["joe"]);
        assert!(sorted((350, 350), Diagonal::NorthWest, 10).is_empty());
        assert_eq!(sorted((400, 400), Diagonal::SouthEast, 99), ["1", "2"]);
        assert_eq!(sorted((0, 500), Diagonal::NorthEast, 500), ["0", "1", "2", "joe", "jon"]);
        assert_eq!(sorted((448, 448), Diagonal::SouthEast, 1), ["1", "2"]);
    }

    #[test]
    fn test_range_boundaries_are_inclusive() {
        let mut tree = QuadTree::new(Point::new(250, 250));
        tree.insert("corner", Point::new(110, 110)).unwrap();
        tree.insert("edge", Point::new(100, 105)).unwrap();
        tree.insert("outside", Point::new(111, 100)).unwrap();

        let mut names = tree.names_in_range(Point::new(100, 100), Diagonal::SouthEast, 10);
        names.sort();
        assert_eq!(names, vec!["corner", "edge"]);
        assert!(tree.names_in_range(Point::new(0, 0), Diagonal::NorthWest, 50).is_empty());
        let exact = tree.names_in_range(Point::new(110, 110), Diagonal::NorthEast, 0);
        assert_eq!(exact, vec!["corner"]);
    }
}
