use crate::glam::Vec3;
use crate::ilattice::prelude::Extent;

/// Number of ternary search steps used to minimize the segment/box distance. Shrinks the search window below `1e-7`.
const SEGMENT_SEARCH_STEPS: usize = 40;

/// Like [`Extent::contains`], but the upper faces count as inside too. Sample grids put points on every face.
pub fn closed_extent_contains(extent: &Extent<Vec3>, p: Vec3) -> bool {
    p.cmpge(extent.minimum).all() && p.cmple(extent.least_upper_bound()).all()
}

/// Closed boxes that only touch on a face still intersect.
pub fn closed_extents_intersect(a: &Extent<Vec3>, b: &Extent<Vec3>) -> bool {
    a.minimum.cmple(b.least_upper_bound()).all() && b.minimum.cmple(a.least_upper_bound()).all()
}

/// The 8 octants split through the center. Octant `i` is offset along X if bit 0 of `i` is set, along Y for bit 1, and
/// along Z for bit 2.
pub fn octants(extent: &Extent<Vec3>) -> [Extent<Vec3>; 8] {
    extent.split3(extent.center())
}

/// A line segment from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    pub fn midpoint(&self) -> Vec3 {
        0.5 * (self.start + self.end)
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.start + t * self.direction()
    }

    /// Projects `p` onto the segment, clamped to the end points. A zero-length segment projects everything onto `start`.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let dir = self.direction();
        let len_sq = dir.length_squared();
        if len_sq == 0.0 {
            return self.start;
        }
        let t = ((p - self.start).dot(dir) / len_sq).clamp(0.0, 1.0);
        self.point_at(t)
    }

    pub fn distance_squared_to_point(&self, p: Vec3) -> f32 {
        p.distance_squared(self.closest_point(p))
    }

    /// Squared Euclidean distance between the segment and the solid box `extent` (zero if they overlap).
    ///
    /// The distance from a point moving along a line to a convex set is convex in the line parameter, so a ternary search
    /// over the segment parameter finds the minimum.
    pub fn distance_squared_to_extent(&self, extent: &Extent<Vec3>) -> f32 {
        let dist_at = |t: f32| {
            let p = self.point_at(t);
            p.distance_squared(extent.clamp_min_lub(p))
        };

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        for _ in 0..SEGMENT_SEARCH_STEPS {
            let m1 = lo + (hi - lo) / 3.0;
            let m2 = hi - (hi - lo) / 3.0;
            if dist_at(m1) <= dist_at(m2) {
                hi = m2;
            } else {
                lo = m1;
            }
        }

        dist_at(0.5 * (lo + hi)).min(dist_at(0.0)).min(dist_at(1.0))
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

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn closed_extent_includes_upper_faces() {
        let extent = Extent::from_min_and_shape(Vec3::ZERO, Vec3::splat(2.0));

        assert!(closed_extent_contains(&extent, Vec3::ZERO));
        assert!(closed_extent_contains(&extent, Vec3::splat(2.0)));
        assert!(!extent.contains(Vec3::splat(2.0)));
        assert!(!closed_extent_contains(&extent, Vec3::new(2.01, 1.0, 1.0)));

        let touching = Extent::from_min_and_shape(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE);
        assert!(closed_extents_intersect(&extent, &touching));
        let apart = Extent::from_min_and_shape(Vec3::new(2.5, 0.0, 0.0), Vec3::ONE);
        assert!(!closed_extents_intersect(&extent, &apart));
    }

    #[test]
    fn octants_partition_the_extent() {
        let extent = Extent::from_min_and_shape(Vec3::new(-1.0, 0.0, 4.0), Vec3::new(2.0, 4.0, 8.0));
        let octants = octants(&extent);

        assert_eq!(octants[0].minimum, extent.minimum);
        assert_eq!(octants[1].minimum, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(octants[2].minimum, Vec3::new(-1.0, 2.0, 4.0));
        assert_eq!(octants[4].minimum, Vec3::new(-1.0, 0.0, 8.0));
        assert_eq!(octants[7].least_upper_bound(), extent.least_upper_bound());
        for octant in octants.iter() {
            assert_eq!(octant.shape, Vec3::new(1.0, 2.0, 4.0));
            assert!(extent.contains(octant.center()));
        }
    }

    #[test]
    fn closest_point_is_clamped_to_the_segment() {
        let segment = Segment::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));

        assert_eq!(segment.closest_point(Vec3::new(4.0, 3.0, 0.0)), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(segment.closest_point(Vec3::new(-4.0, 3.0, 0.0)), Vec3::ZERO);
        assert_eq!(segment.closest_point(Vec3::new(14.0, 3.0, 0.0)), segment.end);
        assert_relative_eq!(segment.distance_squared_to_point(Vec3::new(13.0, 4.0, 0.0)), 25.0);
    }

    #[test]
    fn degenerate_segment_projects_onto_start() {
        let segment = Segment::new(Vec3::ONE, Vec3::ONE);
        assert_eq!(segment.closest_point(Vec3::new(5.0, 1.0, 1.0)), Vec3::ONE);
        assert_relative_eq!(segment.distance_squared_to_point(Vec3::new(5.0, 1.0, 1.0)), 16.0);
    }

    #[test]
    fn segment_to_extent_distance() {
        let extent = Extent::from_min_and_shape(Vec3::ZERO, Vec3::ONE);

        // Passes through the box.
        let through = Segment::new(Vec3::new(-1.0, 0.5, 0.5), Vec3::new(2.0, 0.5, 0.5));
        assert_abs_diff_eq!(through.distance_squared_to_extent(&extent), 0.0);

        // Parallel to a face, one unit above it.
        let above = Segment::new(Vec3::new(-5.0, 2.0, 0.5), Vec3::new(5.0, 2.0, 0.5));
        assert_abs_diff_eq!(above.distance_squared_to_extent(&extent), 1.0, epsilon = 1e-4);

        // On the line x + y = 3, skimming past the corner (1, 1) at distance 1/sqrt(2) while its midpoint is far away.
        let diagonal = Segment::new(Vec3::new(-10.0, 13.0, 0.5), Vec3::new(13.0, -10.0, 0.5));
        assert_abs_diff_eq!(diagonal.distance_squared_to_extent(&extent), 0.5, epsilon = 1e-3);

        // Same line, through the corner itself.
        let grazing = Segment::new(Vec3::new(-10.0, 12.0, 0.5), Vec3::new(12.0, -10.0, 0.5));
        assert_abs_diff_eq!(grazing.distance_squared_to_extent(&extent), 0.0, epsilon = 1e-3);
    }
}
