use super::{PointId, SpatialOctree, VisitCommand};
use crate::capsule::{CapsuleField, CapsuleId};

use smallvec::SmallVec;

impl<T> SpatialOctree<T> {
    /// Every point contained by capsule `id`. Subtrees that the capsule cannot reach are skipped.
    pub fn query_capsule(&self, field: &CapsuleField, id: CapsuleId) -> Vec<PointId> {
        let mut found = Vec::new();
        let capsule = match field.get(id) {
            Some(c) => c,
            None => return found,
        };
        self.visit_nodes(|_, node| {
            if !field.may_touch(capsule, &node.boundary) {
                return VisitCommand::SkipDescendants;
            }
            found.extend(
                node.points()
                    .iter()
                    .copied()
                    .filter(|&p| field.contains(id, self.point(p).position)),
            );
            VisitCommand::Continue
        });
        found
    }
}

/// For each point of an octree, the capsules that contain it.
///
/// Collected in one pass over the capsule queries, so that sample evaluation afterwards only reads a closed set.
#[derive(Clone, Debug, Default)]
pub struct CapsuleMembership {
    members: Vec<SmallVec<[CapsuleId; 4]>>,
}

impl CapsuleMembership {
    pub fn collect<T>(
        octree: &SpatialOctree<T>,
        field: &CapsuleField,
        capsules: &[CapsuleId],
    ) -> Self {
        let mut members = vec![SmallVec::new(); octree.len()];
        for &id in capsules {
            for p in octree.query_capsule(field, id) {
                members[p.0 as usize].push(id);
            }
        }
        Self { members }
    }

    pub fn of(&self, point: PointId) -> &[CapsuleId] {
        self.members
            .get(point.0 as usize)
            .map(|m| m.as_slice())
            .unwrap_or(&[])
    }

    pub fn num_tagged_points(&self) -> usize {
        self.members.iter().filter(|m| !m.is_empty()).count()
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
    use crate::capsule::{Capsule, DepthWeights, WeightTriple};
    use crate::core::ilattice::prelude::Extent;
    use crate::glam::Vec3;

    use itertools::iproduct;

    fn field(capsules: Vec<Capsule>, top: WeightTriple, bottom: WeightTriple) -> CapsuleField {
        let weights = DepthWeights {
            top: top.normalized(),
            bottom: bottom.normalized(),
            top_y: 12.0,
            bottom_y: 0.0,
        };
        CapsuleField::from_capsules(capsules, weights)
    }

    fn grid_octree(edge: i32, capacity: usize) -> SpatialOctree<()> {
        let boundary = Extent::from_min_and_shape(Vec3::ZERO, Vec3::splat(edge as f32));
        let mut octree = SpatialOctree::new(boundary, capacity);
        for (z, y, x) in iproduct!(0..=edge, 0..=edge, 0..=edge) {
            octree.insert(Vec3::new(x as f32, y as f32, z as f32), ());
        }
        octree
    }

    #[test]
    fn capsule_query_matches_brute_force() {
        let octree = grid_octree(12, 8);
        let field = field(
            vec![
                Capsule::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(11.0, 9.0, 6.0), 2.0),
                Capsule::new(Vec3::new(6.0, 6.0, 6.0), Vec3::new(6.0, 6.0, 6.0), 1.0),
            ],
            WeightTriple::new(1.0, 3.0, 1.0),
            WeightTriple::new(2.0, 1.0, 1.0),
        );

        for (id, _) in field.iter() {
            let mut found = octree.query_capsule(&field, id);
            found.sort();
            let expected: Vec<_> = octree
                .iter_points()
                .filter(|(_, p)| field.contains(id, p.position))
                .map(|(p, _)| p)
                .collect();
            assert!(!expected.is_empty());
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn membership_lists_every_containing_capsule() {
        let octree = grid_octree(8, 4);
        let field = field(
            vec![
                Capsule::new(Vec3::new(0.0, 4.0, 4.0), Vec3::new(8.0, 4.0, 4.0), 1.0),
                Capsule::new(Vec3::new(4.0, 0.0, 4.0), Vec3::new(4.0, 8.0, 4.0), 1.0),
                Capsule::new(Vec3::new(100.0, 0.0, 0.0), Vec3::new(101.0, 0.0, 0.0), 1.0),
            ],
            WeightTriple::default(),
            WeightTriple::default(),
        );
        let ids: Vec<_> = field.iter().map(|(id, _)| id).collect();
        let membership = CapsuleMembership::collect(&octree, &field, &ids);

        for (p, point) in octree.iter_points() {
            let expected: Vec<_> = ids
                .iter()
                .copied()
                .filter(|&id| field.contains(id, point.position))
                .collect();
            assert_eq!(membership.of(p), expected.as_slice());
        }

        // The crossing point belongs to both tubes.
        let (center, _) = octree
            .iter_points()
            .find(|(_, p)| p.position == Vec3::splat(4.0))
            .unwrap();
        assert_eq!(membership.of(center), &[CapsuleId(0), CapsuleId(1)]);
        assert!(membership.num_tagged_points() > 0);
        assert!(membership.of(PointId(10_000)).is_empty());
    }
}
