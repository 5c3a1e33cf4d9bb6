mod query;

pub use query::CapsuleMembership;

use crate::core::geometry::{closed_extent_contains, closed_extents_intersect, octants};
use crate::core::ilattice::prelude::Extent;
use crate::glam::Vec3;

use smallvec::SmallVec;

pub const DEFAULT_OCTREE_CAPACITY: usize = 8;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(pub u32);

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PointId(pub u32);

impl NodeId {
    pub const ROOT: Self = Self(0);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctreePoint<T> {
    pub position: Vec3,
    pub value: T,
}

/// A cuboid holding up to `capacity` points. Once full, the next insertion gives it 8 children, stored contiguously
/// starting at `first_child`. Children are never merged back.
#[derive(Clone, Debug)]
pub struct OctreeNode {
    pub boundary: Extent<Vec3>,
    points: SmallVec<[PointId; DEFAULT_OCTREE_CAPACITY]>,
    first_child: Option<NodeId>,
}

impl OctreeNode {
    fn new(boundary: Extent<Vec3>) -> Self {
        Self {
            boundary,
            points: SmallVec::new(),
            first_child: None,
        }
    }

    pub fn points(&self) -> &[PointId] {
        &self.points
    }

    pub fn is_divided(&self) -> bool {
        self.first_child.is_some()
    }

    pub fn children(&self) -> Option<impl Iterator<Item = NodeId>> {
        self.first_child
            .map(|first| (first.0..first.0 + 8).map(NodeId))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VisitCommand {
    Continue,
    SkipDescendants,
}

/// A capacity-bounded, lazily subdivided octree over points. Nodes live in an arena and refer to each other by
/// [`NodeId`].
///
/// Each point lives in exactly one node: the first node on its insertion path, in octant order, that had room.
#[derive(Clone, Debug)]
pub struct SpatialOctree<T> {
    capacity: usize,
    nodes: Vec<OctreeNode>,
    points: Vec<OctreePoint<T>>,
}

impl<T> SpatialOctree<T> {
    pub fn new(boundary: Extent<Vec3>, capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            nodes: vec![OctreeNode::new(boundary)],
            points: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &Extent<Vec3> {
        &self.nodes[NodeId::ROOT.0 as usize].boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &OctreeNode {
        &self.nodes[id.0 as usize]
    }

    pub fn point(&self, id: PointId) -> &OctreePoint<T> {
        &self.points[id.0 as usize]
    }

    pub fn iter_points(&self) -> impl Iterator<Item = (PointId, &OctreePoint<T>)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (PointId(i as u32), p))
    }

    /// Returns `false` if `position` is outside of the root boundary, or if no octant of a full node accepts it (logged).
    pub fn insert(&mut self, position: Vec3, value: T) -> bool {
        if !closed_extent_contains(self.boundary(), position) {
            return false;
        }

        let point_id = PointId(self.points.len() as u32);
        let mut node_id = NodeId::ROOT;
        loop {
            let node = &self.nodes[node_id.0 as usize];
            if node.points.len() < self.capacity {
                self.nodes[node_id.0 as usize].points.push(point_id);
                self.points.push(OctreePoint { position, value });
                return true;
            }

            let first_child = node.first_child;
            let first_child = match first_child {
                Some(first) => first,
                None => self.subdivide(node_id),
            };

            let accepting = (0..8)
                .map(|i| NodeId(first_child.0 + i))
                .find(|c| closed_extent_contains(&self.nodes[c.0 as usize].boundary, position));
            match accepting {
                Some(child) => node_id = child,
                None => {
                    log::warn!(
                        "No octant of {:?} accepts point {}",
                        self.nodes[node_id.0 as usize].boundary,
                        position
                    );
                    return false;
                }
            }
        }
    }

    fn subdivide(&mut self, node_id: NodeId) -> NodeId {
        let first = NodeId(self.nodes.len() as u32);
        let children = octants(&self.nodes[node_id.0 as usize].boundary);
        self.nodes.extend(children.iter().map(|&o| OctreeNode::new(o)));
        self.nodes[node_id.0 as usize].first_child = Some(first);
        first
    }

    /// Depth-first, parents before children, children in octant order.
    pub fn visit_nodes(&self, mut visitor: impl FnMut(NodeId, &OctreeNode) -> VisitCommand) {
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if visitor(id, node) == VisitCommand::SkipDescendants {
                continue;
            }
            if let Some(children) = node.children() {
                let mut children: SmallVec<[NodeId; 8]> = children.collect();
                children.reverse();
                stack.extend(children);
            }
        }
    }

    /// Every point inside `range`. Subtrees whose boundary misses `range` are skipped.
    pub fn query_box(&self, range: &Extent<Vec3>) -> Vec<PointId> {
        let mut found = Vec::new();
        self.visit_nodes(|_, node| {
            if !closed_extents_intersect(&node.boundary, range) {
                return VisitCommand::SkipDescendants;
            }
            found.extend(
                node.points
                    .iter()
                    .copied()
                    .filter(|&p| closed_extent_contains(range, self.point(p).position)),
            );
            VisitCommand::Continue
        });
        found
    }

    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(NodeId::ROOT, 1)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(children) = self.node(id).children() {
                stack.extend(children.map(|c| (c, depth + 1)));
            }
        }
        max_depth
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    use itertools::iproduct;

    fn grid_octree(edge: i32, capacity: usize) -> SpatialOctree<usize> {
        let boundary = Extent::from_min_and_shape(Vec3::ZERO, Vec3::splat(edge as f32));
        let mut octree = SpatialOctree::new(boundary, capacity);
        for (i, (z, y, x)) in iproduct!(0..=edge, 0..=edge, 0..=edge).enumerate() {
            assert!(octree.insert(Vec3::new(x as f32, y as f32, z as f32), i));
        }
        octree
    }

    #[test]
    fn points_outside_the_root_are_rejected() {
        let mut octree = SpatialOctree::new(Extent::from_min_and_shape(Vec3::ZERO, Vec3::ONE), 2);
        assert!(!octree.insert(Vec3::new(1.5, 0.0, 0.0), ()));
        assert!(octree.insert(Vec3::ONE, ()));
        assert_eq!(octree.len(), 1);
    }

    #[test]
    fn subdivides_only_on_overflow() {
        let mut octree = SpatialOctree::new(Extent::from_min_and_shape(Vec3::ZERO, Vec3::splat(4.0)), 2);
        octree.insert(Vec3::splat(1.0), 0);
        octree.insert(Vec3::splat(3.0), 1);
        assert_eq!(octree.num_nodes(), 1);

        octree.insert(Vec3::splat(3.5), 2);
        assert_eq!(octree.num_nodes(), 9);
        assert!(octree.node(NodeId::ROOT).is_divided());
        assert_eq!(octree.node(NodeId::ROOT).points().len(), 2);
        assert_eq!(octree.depth(), 2);

        // The high corner octant took the overflowing point.
        let (leaf, _) = (1..9)
            .map(|i| (NodeId(i), octree.node(NodeId(i))))
            .find(|(_, n)| !n.points().is_empty())
            .unwrap();
        assert_eq!(leaf, NodeId(8));
    }

    #[test]
    fn every_point_is_stored_once() {
        let octree = grid_octree(6, 8);
        assert_eq!(octree.len(), 7 * 7 * 7);

        let mut seen = vec![0; octree.len()];
        octree.visit_nodes(|_, node| {
            assert!(node.points().len() <= octree.capacity());
            for p in node.points() {
                seen[p.0 as usize] += 1;
                assert!(closed_extent_contains(&node.boundary, octree.point(*p).position));
            }
            VisitCommand::Continue
        });
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn box_query_has_no_false_negatives() {
        let octree = grid_octree(8, 8);
        let range = Extent::from_min_and_lub(Vec3::new(1.5, 2.0, 0.0), Vec3::new(5.0, 3.5, 8.0));

        let mut found: Vec<_> = octree.query_box(&range);
        found.sort();
        let mut expected: Vec<_> = octree
            .iter_points()
            .filter(|(_, p)| closed_extent_contains(&range, p.position))
            .map(|(id, _)| id)
            .collect();
        expected.sort();

        assert_eq!(found, expected);
        // x in {2,3,4,5}, y in {2,3}, z in 0..=8
        assert_eq!(found.len(), 4 * 2 * 9);
    }

    #[test]
    fn box_query_outside_is_empty() {
        let octree = grid_octree(4, 8);
        let range = Extent::from_min_and_shape(Vec3::splat(10.0), Vec3::ONE);
        assert!(octree.query_box(&range).is_empty());
    }
}
