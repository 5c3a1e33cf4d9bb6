use crate::core::ilattice::prelude::Extent;
use crate::glam::{IVec3, Vec3};
use crate::units::*;

/// Past this magnitude, `f32` can no longer tell neighboring grid points apart.
pub const MAX_WORLD_COORDINATE: f32 = 16_777_216.0;

pub fn chunk_min(key: ChunkUnits<IVec3>, chunk_edge: i32) -> WorldUnits<IVec3> {
    WorldUnits(key.0 * chunk_edge)
}

/// The box covered by the chunk at `key`. Neighboring chunks share their boundary samples, so treat it as closed.
pub fn chunk_extent(key: ChunkUnits<IVec3>, chunk_edge: i32) -> WorldUnits<Extent<Vec3>> {
    let WorldUnits(min) = chunk_min(key, chunk_edge);
    WorldUnits(Extent::from_min_and_shape(min.as_vec3(), Vec3::splat(chunk_edge as f32)))
}

/// Returns the [`ChunkUnits`] coordinates of the chunk whose half-open cell contains `p`.
pub fn in_chunk(p: WorldUnits<Vec3>, chunk_edge: i32) -> ChunkUnits<IVec3> {
    ChunkUnits((p.0 / chunk_edge as f32).floor().as_ivec3())
}

/// Like [`in_chunk`], but `None` if `p` is not finite or any coordinate is beyond [`MAX_WORLD_COORDINATE`].
pub fn checked_in_chunk(p: WorldUnits<Vec3>, chunk_edge: i32) -> Option<ChunkUnits<IVec3>> {
    (p.0.is_finite() && p.0.abs().max_element() <= MAX_WORLD_COORDINATE).then(|| in_chunk(p, chunk_edge))
}

/// Transforms a [`WorldUnits`] extent into the [`ChunkUnits`] extent of every chunk it touches, upper faces included.
/// The world extent is first clamped to [`MAX_WORLD_COORDINATE`].
pub fn in_chunk_extent(e: WorldUnits<Extent<Vec3>>, chunk_edge: i32) -> ChunkUnits<Extent<IVec3>> {
    let clamp = |v: Vec3| WorldUnits(v.clamp(Vec3::splat(-MAX_WORLD_COORDINATE), Vec3::splat(MAX_WORLD_COORDINATE)));
    ChunkUnits(Extent::from_min_and_max(
        in_chunk(clamp(e.0.minimum), chunk_edge).0,
        in_chunk(clamp(e.0.least_upper_bound()), chunk_edge).0,
    ))
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
