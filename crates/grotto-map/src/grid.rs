use crate::glam::IVec3;

use itertools::iproduct;
use ndshape::{RuntimeShape, Shape};
use std::fmt;
use std::ops::{Index, IndexMut};

/// The dense `(edge + 1)³` scalar samples of one chunk. Use [`Index`] and [`IndexMut`] with chunk-local `IVec3`
/// coordinates in `0..=edge`.
#[derive(Clone)]
pub struct SampleGrid {
    edge: i32,
    shape: RuntimeShape<u32, 3>,
    values: Vec<f32>,
}

impl fmt::Debug for SampleGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The shape is implied by the edge.
        f.debug_struct("SampleGrid")
            .field("edge", &self.edge)
            .field("values", &self.values)
            .finish()
    }
}

impl SampleGrid {
    pub fn filled(edge: i32, value: f32) -> Self {
        let edge = edge.max(1);
        let side = edge as u32 + 1;
        let shape = RuntimeShape::<u32, 3>::new([side, side, side]);
        let values = vec![value; shape.usize()];
        Self {
            edge,
            shape,
            values,
        }
    }

    /// Number of unit cubes along each axis.
    pub fn edge(&self) -> i32 {
        self.edge
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    pub fn contains(&self, p: IVec3) -> bool {
        p.cmpge(IVec3::ZERO).all() && p.cmple(IVec3::splat(self.edge)).all()
    }

    /// Only valid for coordinates that satisfy [`Self::contains`].
    #[inline]
    pub fn linearize(&self, p: IVec3) -> usize {
        self.shape.linearize(p.as_uvec3().to_array()) as usize
    }

    #[inline]
    pub fn delinearize(&self, i: usize) -> IVec3 {
        let [x, y, z] = self.shape.delinearize(i as u32);
        IVec3::new(x as i32, y as i32, z as i32)
    }

    pub fn get(&self, p: IVec3) -> Option<f32> {
        self.contains(p).then(|| self[p])
    }

    /// Every sample coordinate, X fastest.
    pub fn iter_points(&self) -> impl Iterator<Item = IVec3> {
        let n = self.edge;
        iproduct!(0..=n, 0..=n, 0..=n).map(|(z, y, x)| IVec3::new(x, y, z))
    }

    /// Every unit cube's minimum corner, X fastest.
    pub fn iter_cubes(&self) -> impl Iterator<Item = IVec3> {
        let n = self.edge;
        iproduct!(0..n, 0..n, 0..n).map(|(z, y, x)| IVec3::new(x, y, z))
    }
}

impl Index<IVec3> for SampleGrid {
    type Output = f32;

    #[inline]
    fn index(&self, p: IVec3) -> &Self::Output {
        &self.values[self.linearize(p)]
    }
}

impl IndexMut<IVec3> for SampleGrid {
    #[inline]
    fn index_mut(&mut self, p: IVec3) -> &mut Self::Output {
        let i = self.linearize(p);
        &mut self.values[i]
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

    #[test]
    fn grid_includes_both_boundary_layers() {
        let grid = SampleGrid::filled(3, 1.0);
        assert_eq!(grid.len(), 4 * 4 * 4);
        assert_eq!(grid.iter_points().count(), grid.len());
        assert_eq!(grid.iter_cubes().count(), 27);
        assert!(grid.contains(IVec3::splat(3)));
        assert!(!grid.contains(IVec3::new(4, 0, 0)));
        assert!(!grid.contains(IVec3::new(0, -1, 0)));
        assert_eq!(grid.get(IVec3::new(0, -1, 0)), None);
    }

    #[test]
    fn linearization_round_trips_in_iteration_order() {
        let grid = SampleGrid::filled(4, 0.0);
        for (i, p) in grid.iter_points().enumerate() {
            assert_eq!(grid.linearize(p), i);
            assert_eq!(grid.delinearize(i), p);
        }
    }

    #[test]
    fn index_writes_one_sample() {
        let mut grid = SampleGrid::filled(2, 0.0);
        grid[IVec3::new(1, 2, 0)] = 5.0;
        assert_eq!(grid.get(IVec3::new(1, 2, 0)), Some(5.0));
        assert_eq!(grid.values().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn debug_lists_edge_and_samples() {
        let grid = SampleGrid::filled(1, 0.5);
        let text = format!("{:?}", grid);
        assert!(text.starts_with("SampleGrid { edge: 1, values: [0.5"), "{}", text);
        assert!(!text.contains("shape"));
    }
}
