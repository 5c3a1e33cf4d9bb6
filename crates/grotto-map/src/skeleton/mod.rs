//! The cave skeleton: a forest of polylines grown by a rewriting grammar driving a turtle.

mod grammar;
mod rules;
mod symbol;
mod turtle;

pub use grammar::*;
pub use rules::*;
pub use symbol::*;
pub use turtle::*;

use crate::core::geometry::Segment;
use crate::core::ilattice::prelude::Extent;
use crate::glam::Vec3;

/// An ordered polyline. Every branch has at least one point.
pub type Branch = Vec<Vec3>;

/// The points holding the minimum and maximum coordinate along each axis. Ties keep the earliest point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extremes {
    /// Minimum y.
    pub lowest: Vec3,
    /// Maximum y.
    pub highest: Vec3,
    /// Minimum x.
    pub left: Vec3,
    /// Maximum x.
    pub right: Vec3,
    /// Minimum z.
    pub front: Vec3,
    /// Maximum z.
    pub back: Vec3,
}

impl Extremes {
    pub fn at(p: Vec3) -> Self {
        Self {
            lowest: p,
            highest: p,
            left: p,
            right: p,
            front: p,
            back: p,
        }
    }

    pub fn include(mut self, p: Vec3) -> Self {
        if p.y < self.lowest.y {
            self.lowest = p;
        }
        if p.y > self.highest.y {
            self.highest = p;
        }
        if p.x < self.left.x {
            self.left = p;
        }
        if p.x > self.right.x {
            self.right = p;
        }
        if p.z < self.front.z {
            self.front = p;
        }
        if p.z > self.back.z {
            self.back = p;
        }
        self
    }

    pub fn extent(&self) -> Extent<Vec3> {
        Extent::from_min_and_lub(
            Vec3::new(self.left.x, self.lowest.y, self.front.z),
            Vec3::new(self.right.x, self.highest.y, self.back.z),
        )
    }

    pub fn height(&self) -> f32 {
        self.highest.y - self.lowest.y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Skeleton {
    branches: Vec<Branch>,
    extremes: Extremes,
}

impl Skeleton {
    /// Drops empty branches. Returns `None` if no points remain.
    pub fn new(mut branches: Vec<Branch>) -> Option<Self> {
        branches.retain(|b| !b.is_empty());
        let first = *branches.first()?.first()?;
        Some(Self::grown_from(first, branches))
    }

    /// `first` must be the first point of the first branch.
    pub(crate) fn grown_from(first: Vec3, branches: Vec<Branch>) -> Self {
        let extremes = branches
            .iter()
            .flatten()
            .fold(Extremes::at(first), |e, &p| e.include(p));
        Self { branches, extremes }
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn extremes(&self) -> &Extremes {
        &self.extremes
    }

    pub fn num_points(&self) -> usize {
        self.branches.iter().map(Vec::len).sum()
    }

    /// Every point as `(branch index, point index, position)`.
    pub fn points(&self) -> impl Iterator<Item = (usize, usize, Vec3)> + '_ {
        self.branches
            .iter()
            .enumerate()
            .flat_map(|(i, b)| b.iter().enumerate().map(move |(j, &p)| (i, j, p)))
    }

    /// One segment per consecutive pair of points within a branch. Branches are never joined.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.branches
            .iter()
            .flat_map(|b| b.windows(2).map(|w| Segment::new(w[0], w[1])))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
