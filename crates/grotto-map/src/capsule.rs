use crate::core::geometry::Segment;
use crate::core::ilattice::prelude::Extent;
use crate::glam::{Quat, Vec3};
use crate::skeleton::{Extremes, Skeleton};

use float_ord::FloatOrd;
use serde::{Deserialize, Serialize};

/// Smallest weight component used when dividing by a weight, so degenerate triples still give finite bounds.
pub const MIN_WEIGHT: f32 = 1e-3;

/// Per-axis coefficients of the anisotropic distance metric.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightTriple(pub Vec3);

impl Default for WeightTriple {
    fn default() -> Self {
        Self(Vec3::ONE)
    }
}

impl WeightTriple {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Scales the components to sum to 1. Negative components count as 0, and an all-zero triple becomes uniform.
    pub fn normalized(self) -> Self {
        let w = self.0.max(Vec3::ZERO);
        let sum = w.x + w.y + w.z;
        if sum == 0.0 {
            return Self(Vec3::splat(1.0 / 3.0));
        }
        Self(w / sum)
    }

    pub fn min_component(self) -> f32 {
        self.0.min_element().max(MIN_WEIGHT)
    }

    /// Largest component over smallest component.
    pub fn ratio(self) -> f32 {
        self.0.max_element() / self.min_component()
    }
}

/// Weights interpolated per axis between the skeleton's highest and lowest points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthWeights {
    pub top: WeightTriple,
    pub bottom: WeightTriple,
    pub top_y: f32,
    pub bottom_y: f32,
}

impl DepthWeights {
    /// Normalizes both triples.
    pub fn new(top: WeightTriple, bottom: WeightTriple, extremes: &Extremes) -> Self {
        Self {
            top: top.normalized(),
            bottom: bottom.normalized(),
            top_y: extremes.highest.y,
            bottom_y: extremes.lowest.y,
        }
    }

    /// 0 at the top of the skeleton, 1 at the bottom, clamped in between.
    pub fn depth(&self, y: f32) -> f32 {
        inverse_lerp(self.top_y, self.bottom_y, y)
    }

    pub fn at(&self, y: f32) -> Vec3 {
        self.top.0.lerp(self.bottom.0, self.depth(y))
    }

    /// The worst anisotropy ratio of the two triples.
    pub fn anisotropy(&self) -> f32 {
        self.top.ratio().max(self.bottom.ratio())
    }

    /// The smallest component of either triple, which bounds every interpolated weight from below.
    pub fn min_component(&self) -> f32 {
        self.top.min_component().min(self.bottom.min_component())
    }
}

/// Clamped to `[0, 1]`, and 0 when `a == b`.
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((v - a) / (b - a)).clamp(0.0, 1.0)
}

/// Index of a capsule in its [`CapsuleField`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CapsuleId(pub u32);

/// A tube around the segment from `bottom` to `top`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub bottom: Vec3,
    pub top: Vec3,
    pub radius: f32,
}

impl Capsule {
    pub fn new(bottom: Vec3, top: Vec3, radius: f32) -> Self {
        Self {
            bottom,
            top,
            radius,
        }
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.bottom, self.top)
    }

    pub fn center(&self) -> Vec3 {
        self.segment().midpoint()
    }

    /// Rotates +Y onto the segment direction. Identity for a zero-length segment.
    pub fn orientation(&self) -> Quat {
        let dir = self.segment().direction().normalize_or_zero();
        if dir == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        Quat::from_rotation_arc(Vec3::Y, dir)
    }

    /// Total length including both rounded caps.
    pub fn height(&self) -> f32 {
        self.segment().length() + 2.0 * self.radius
    }

    /// Sum of the per-axis squared offsets from `p` to its clamped projection on the segment, each scaled by `weights`.
    pub fn weighted_distance(&self, p: Vec3, weights: Vec3) -> f32 {
        let offset = p - self.segment().closest_point(p);
        (offset * offset).dot(weights)
    }

    pub fn contains(&self, p: Vec3, weights: Vec3) -> bool {
        self.weighted_distance(p, weights) <= self.radius
    }
}

/// Every capsule of one skeleton and the metric that ranks them.
#[derive(Clone, Debug)]
pub struct CapsuleField {
    capsules: Vec<Capsule>,
    weights: DepthWeights,
    reach: f32,
}

impl CapsuleField {
    /// One capsule per consecutive point pair of each branch, all with `radius`.
    pub fn build(skeleton: &Skeleton, radius: f32, weights: DepthWeights) -> Self {
        let capsules = skeleton
            .segments()
            .map(|s| Capsule::new(s.start, s.end, radius))
            .collect();
        Self::from_capsules(capsules, weights)
    }

    pub fn from_capsules(capsules: Vec<Capsule>, weights: DepthWeights) -> Self {
        let max_radius = capsules.iter().map(|c| c.radius).fold(0.0f32, f32::max);
        let reach = capsule_reach(max_radius, weights.min_component());
        Self {
            capsules,
            weights,
            reach,
        }
    }

    pub fn len(&self) -> usize {
        self.capsules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capsules.is_empty()
    }

    pub fn capsules(&self) -> &[Capsule] {
        &self.capsules
    }

    pub fn get(&self, id: CapsuleId) -> Option<&Capsule> {
        self.capsules.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CapsuleId, &Capsule)> {
        self.capsules
            .iter()
            .enumerate()
            .map(|(i, c)| (CapsuleId(i as u32), c))
    }

    pub fn weights(&self) -> &DepthWeights {
        &self.weights
    }

    /// Euclidean bound on how far any contained point can be from its capsule's segment.
    pub fn reach(&self) -> f32 {
        self.reach
    }

    pub fn weighted_distance(&self, id: CapsuleId, p: Vec3) -> Option<f32> {
        self.get(id)
            .map(|c| c.weighted_distance(p, self.weights.at(p.y)))
    }

    pub fn contains(&self, id: CapsuleId, p: Vec3) -> bool {
        self.get(id)
            .map_or(false, |c| c.contains(p, self.weights.at(p.y)))
    }

    /// Minimum weighted distance from `p` over `ids`, or `None` if there are no (valid) ids.
    pub fn closest_weighted_distance(
        &self,
        ids: impl IntoIterator<Item = CapsuleId>,
        p: Vec3,
    ) -> Option<f32> {
        let weights = self.weights.at(p.y);
        ids.into_iter()
            .filter_map(|id| self.get(id))
            .map(|c| FloatOrd(c.weighted_distance(p, weights)))
            .min()
            .map(|d| d.0)
    }

    /// Capsules whose influence region may touch `extent`. Never misses a capsule that contains a point of `extent`.
    pub fn intersecting(&self, extent: &Extent<Vec3>) -> Vec<CapsuleId> {
        self.iter()
            .filter(|(_, c)| self.may_touch(c, extent))
            .map(|(id, _)| id)
            .collect()
    }

    /// Conservative box/capsule test: the box is within [`Self::reach`] of the segment.
    pub fn may_touch(&self, capsule: &Capsule, extent: &Extent<Vec3>) -> bool {
        let reach = capsule_reach(capsule.radius, self.weights.min_component());
        capsule.segment().distance_squared_to_extent(extent) <= reach * reach
    }

    /// Euclidean distance from `p` to the nearest capsule segment.
    pub fn nearest_segment_distance(&self, p: Vec3) -> Option<f32> {
        self.capsules
            .iter()
            .map(|c| FloatOrd(c.segment().distance_squared_to_point(p)))
            .min()
            .map(|d| d.0.sqrt())
    }
}

/// `Σ wᵢ dᵢ² ≤ r` with every `wᵢ ≥ w_min` implies `|d| ≤ sqrt(r / w_min)`.
pub fn capsule_reach(radius: f32, min_weight: f32) -> f32 {
    (radius.max(0.0) / min_weight.max(MIN_WEIGHT)).sqrt()
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

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn uniform_weights(top_y: f32, bottom_y: f32) -> DepthWeights {
        DepthWeights {
            top: WeightTriple::default().normalized(),
            bottom: WeightTriple::default().normalized(),
            top_y,
            bottom_y,
        }
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        for w in [
            WeightTriple::new(1.0, 2.0, 3.0),
            WeightTriple::new(0.0, 0.0, 5.0),
            WeightTriple::new(0.25, 0.25, 0.5),
            WeightTriple::new(100.0, 1.0, 0.01),
        ] {
            let n = w.normalized().0;
            assert_relative_eq!(n.x + n.y + n.z, 1.0, epsilon = 1e-6);
        }

        let zero = WeightTriple::new(0.0, 0.0, 0.0).normalized().0;
        assert_relative_eq!(zero, Vec3::splat(1.0 / 3.0));
    }

    #[test]
    fn anisotropy_ratio() {
        assert_relative_eq!(WeightTriple::new(1.0, 1.0, 1.0).normalized().ratio(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(WeightTriple::new(1.0, 2.0, 4.0).normalized().ratio(), 4.0, epsilon = 1e-5);
        // A zero component is floored instead of dividing by zero.
        assert!(WeightTriple::new(0.0, 1.0, 1.0).normalized().ratio().is_finite());
    }

    #[test]
    fn depth_interpolation_is_clamped() {
        let weights = DepthWeights {
            top: WeightTriple::new(1.0, 0.0, 0.0),
            bottom: WeightTriple::new(0.0, 0.0, 1.0),
            top_y: 10.0,
            bottom_y: 0.0,
        };
        assert_relative_eq!(weights.at(10.0), Vec3::X);
        assert_relative_eq!(weights.at(0.0), Vec3::Z);
        assert_relative_eq!(weights.at(5.0), Vec3::new(0.5, 0.0, 0.5));
        assert_relative_eq!(weights.at(50.0), Vec3::X);
        assert_relative_eq!(weights.at(-50.0), Vec3::Z);

        assert_eq!(inverse_lerp(3.0, 3.0, 7.0), 0.0);
    }

    #[test]
    fn weighted_distance_uses_clamped_projection() {
        let capsule = Capsule::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.0);
        let w = Vec3::splat(1.0 / 3.0);

        assert_relative_eq!(capsule.weighted_distance(Vec3::new(5.0, 3.0, 0.0), w), 3.0);
        // Beyond the end the projection stops at the end point.
        assert_relative_eq!(capsule.weighted_distance(Vec3::new(13.0, 0.0, 0.0), w), 3.0);
        assert!(capsule.contains(Vec3::new(5.0, 2.0, 1.0), w));
        assert!(!capsule.contains(Vec3::new(5.0, 2.0, 2.0), w));
    }

    #[test]
    fn orientation_points_along_the_segment() {
        let capsule = Capsule::new(Vec3::ONE, Vec3::new(1.0, 1.0, 5.0), 1.0);
        assert_relative_eq!(capsule.orientation() * Vec3::Y, Vec3::Z, epsilon = 1e-6);
        assert_relative_eq!(capsule.center(), Vec3::new(1.0, 1.0, 3.0));
        assert_relative_eq!(capsule.height(), 6.0);

        let degenerate = Capsule::new(Vec3::ONE, Vec3::ONE, 1.0);
        assert_eq!(degenerate.orientation(), Quat::IDENTITY);
    }

    #[test]
    fn one_capsule_per_branch_segment() {
        let skeleton = Skeleton::new(vec![
            vec![Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)],
            vec![Vec3::X, Vec3::Y],
        ])
        .unwrap();
        let field = CapsuleField::build(&skeleton, 2.0, uniform_weights(1.0, 0.0));

        assert_eq!(field.len(), 3);
        assert_eq!(field.capsules()[0], Capsule::new(Vec3::ZERO, Vec3::X, 2.0));
        assert_eq!(field.capsules()[2], Capsule::new(Vec3::X, Vec3::Y, 2.0));
        assert_relative_eq!(field.reach(), 6f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn closest_distance_over_members() {
        let field = CapsuleField::from_capsules(
            vec![
                Capsule::new(Vec3::ZERO, Vec3::X, 1.0),
                Capsule::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(1.0, 3.0, 0.0), 1.0),
            ],
            uniform_weights(3.0, 0.0),
        );
        let p = Vec3::new(0.5, 2.0, 0.0);

        let d = field
            .closest_weighted_distance([CapsuleId(0), CapsuleId(1)], p)
            .unwrap();
        assert_relative_eq!(d, 1.0 / 3.0, epsilon = 1e-6);
        let d0 = field.closest_weighted_distance([CapsuleId(0)], p).unwrap();
        assert_relative_eq!(d0, 4.0 / 3.0, epsilon = 1e-6);
        assert_eq!(field.closest_weighted_distance([], p), None);
        assert_eq!(field.closest_weighted_distance([CapsuleId(7)], p), None);
    }

    #[test]
    fn reach_never_misses_a_contained_point() {
        let extremes = Extremes::at(Vec3::new(0.0, 10.0, 0.0)).include(Vec3::new(0.0, -10.0, 0.0));
        let weights = DepthWeights::new(
            WeightTriple::new(1.0, 8.0, 1.0),
            WeightTriple::new(4.0, 1.0, 1.0),
            &extremes,
        );
        let field = CapsuleField::from_capsules(
            vec![Capsule::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 2.0, 0.0), 3.0)],
            weights,
        );

        // Sweep unit boxes through space. Any box with a contained corner must be reported.
        for x in -14..14 {
            for y in -12..14 {
                for z in -10..10 {
                    let min = Vec3::new(x as f32, y as f32, z as f32);
                    let extent = Extent::from_min_and_shape(min, Vec3::ONE);
                    let contains_corner = (0..8).any(|i| {
                        let corner = min + Vec3::new((i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32);
                        field.contains(CapsuleId(0), corner)
                    });
                    if contains_corner {
                        assert_eq!(field.intersecting(&extent), vec![CapsuleId(0)], "{:?}", min);
                    }
                }
            }
        }
        assert!(field.intersecting(&Extent::from_min_and_shape(Vec3::splat(100.0), Vec3::ONE)).is_empty());
    }

    #[test]
    fn nearest_segment_distance_is_euclidean() {
        let field = CapsuleField::from_capsules(
            vec![Capsule::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 2.0)],
            uniform_weights(0.0, 0.0),
        );
        assert_abs_diff_eq!(field.nearest_segment_distance(Vec3::new(3.0, 4.0, 5.0)).unwrap(), 5.0, epsilon = 1e-5);
    }
}
