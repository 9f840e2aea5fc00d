//! Size balancing for the point tree.
//!
//! A node whose subtrees differ by more than one entry repeatedly hands its
//! own entry to the light side and takes the closest entry from the heavy
//! side. Children are balanced after their parent.

use std::mem;

use tracing::trace;

use super::{PointNode, Side};

impl PointNode {
    pub(super) fn balance(&mut self) {
        let mut skew = self.skew();
        while skew > 1 {
            let heavy = if self.side_len(Side::Lt) > self.side_len(Side::Gt) {
                Side::Lt
            } else {
                Side::Gt
            };
            if !self.promote(heavy) {
                break;
            }
            let next = self.skew();
            // Shared coordinates can pin entries to one side.
            if next >= skew {
                break;
            }
            skew = next;
        }

        if let Some(lt) = self.lt.as_deref_mut() {
            lt.balance();
        }
        if let Some(gt) = self.gt.as_deref_mut() {
            gt.balance();
        }
    }

    fn side_len(&self, side: Side) -> usize {
        self.slot(side).as_deref().map_or(0, PointNode::len)
    }

    fn skew(&self) -> usize {
        self.side_len(Side::Lt).abs_diff(self.side_len(Side::Gt))
    }

    /// Swap this node's entry for the entry on `heavy` closest to it along the
    /// split axis. Returns false when nothing moved.
    fn promote(&mut self, heavy: Side) -> bool {
        let Some(own) = self.point() else {
            return false;
        };
        let target = self.axis.of(own);
        let Some((_, donor)) = self
            .slot(heavy)
            .as_deref()
            .and_then(|child| child.closest(target, self.axis))
        else {
            return false;
        };
        let Some(entry) = self.take_from(heavy, donor) else {
            return false;
        };

        trace!(name = %entry.name, from = ?donor, to = ?own, "Rotating point tree entry");
        if let Some(old) = mem::replace(&mut self.entry, Some(entry)) {
            self.insert(old);
        }
        if heavy == Side::Gt {
            self.reroute_ties();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    use crate::geometry::{Point, Rect};
    use crate::pointtree::tests::assert_ordered;
    use crate::pointtree::{PointNode, PointTree};
    use crate::tree::Tree;

    fn assert_balanced(node: &PointNode) {
        let lt = node.lt().map_or(0, PointNode::len);
        let gt = node.gt().map_or(0, PointNode::len);
        assert!(lt.abs_diff(gt) <= 1, "node {:?} has {lt} / {gt}", node.name());
        node.lt().into_iter().chain(node.gt()).for_each(assert_balanced);
    }

    #[test]
    fn test_balance_chain() {
        let mut tree = PointTree::with_extent(500);
        tree.insert("1", Point::new(250, 250)).unwrap();
        tree.insert("2", Point::new(350, 350)).unwrap();
        tree.insert("3", Point::new(300, 300)).unwrap();
        assert_eq!(tree.height(), 3);

        tree.balance();
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.root().name(), Some("3"));
        assert_ordered(tree.root());
        assert_balanced(tree.root());
    }

    #[test]
    fn test_balance_trivial_trees() {
        let mut empty = PointTree::new(Rect::square(10));
        empty.balance();
        assert!(empty.is_empty());

        let mut single = PointTree::new(Rect::square(10));
        single.insert("only", Point::new(3, 3)).unwrap();
        single.balance();
        assert_eq!(single.root().name(), Some("only"));
        assert_eq!(single.height(), 1);
    }

    #[test]
    fn test_balance_sorted_insertions() {
        let mut tree = PointTree::with_extent(500);
        for i in 0..64 {
            tree.insert(&format!("p{i}"), Point::new(i * 7, i * 5)).unwrap();
        }
        assert_eq!(tree.height(), 64);

        tree.balance();
        assert_eq!(tree.len(), 64);
        assert_ordered(tree.root());
        assert_balanced(tree.root());
        assert!(tree.height() <= 12, "height {}", tree.height());
        for i in 0..64 {
            assert_eq!(tree.location(&format!("p{i}")), Some(Point::new(i * 7, i * 5)));
            assert!(tree.contains_point(Point::new(i * 7, i * 5)));
        }
    }

    #[test]
    fn test_balance_random_distinct_coordinates() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for round in 0..10 {
            let mut xs: Vec<i32> = (0..=500).collect();
            let mut ys: Vec<i32> = (0..=500).collect();
            xs.shuffle(&mut rng);
            ys.shuffle(&mut rng);

            let mut tree = PointTree::with_extent(500);
            let count = 20 + round * 20;
            for (i, (x, y)) in xs.iter().zip(&ys).take(count).enumerate() {
                tree.insert(&i.to_string(), Point::new(*x, *y)).unwrap();
            }

            tree.balance();
            assert_eq!(tree.len(), count);
            assert_ordered(tree.root());
            assert_balanced(tree.root());
            for (i, (x, y)) in xs.iter().zip(&ys).take(count).enumerate() {
                assert_eq!(tree.name_at(Point::new(*x, *y)), Some(i.to_string().as_str()));
            }
        }
    }

    #[test]
    fn test_balance_with_shared_coordinates_terminates() {
        let mut tree = PointTree::with_extent(100);
        for y in 0..20 {
            tree.insert(&format!("col{y}"), Point::new(50, y * 5)).unwrap();
        }
        tree.insert("east", Point::new(90, 0)).unwrap();

        tree.balance();
        assert_eq!(tree.len(), 21);
        assert_ordered(tree.root());
        for y in 0..20 {
            assert!(tree.contains_point(Point::new(50, y * 5)));
        }
    }
}
