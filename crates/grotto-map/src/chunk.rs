use crate::capsule::{CapsuleField, CapsuleId};
use crate::config::CaveConfig;
use crate::coordinates::chunk_min;
use crate::core::ilattice::prelude::Extent;
use crate::glam::{DVec3, IVec3, Vec3};
use crate::grid::SampleGrid;
use crate::marching_cubes::{march_into, ChunkMesh};
use crate::octree::{CapsuleMembership, SpatialOctree};
use crate::texture::TextureBlend;
use crate::units::*;

use std::mem;

/// A cube of `chunk_edge` unit cubes: its `(edge + 1)³` field samples, the capsules that can reach it, and the mesh of
/// its surface.
#[derive(Clone, Debug)]
pub struct Chunk {
    key: ChunkUnits<IVec3>,
    min: WorldUnits<IVec3>,
    terrain_surface: f32,
    grid: SampleGrid,
    capsules: Vec<CapsuleId>,
    mesh: ChunkMesh,
    texture: Option<TextureBlend>,
}

/// How far [`Chunk::generate`] got.
#[derive(Clone, Debug)]
pub enum ChunkBuild {
    /// No capsule reaches the chunk, so nothing was sampled.
    NoCapsules,
    /// Sampled, but the surface doesn't cross the chunk.
    Empty(Chunk),
    Meshed(Chunk),
}

impl ChunkBuild {
    pub fn into_chunk(self) -> Option<Chunk> {
        match self {
            Self::NoCapsules => None,
            Self::Empty(c) | Self::Meshed(c) => Some(c),
        }
    }

    pub fn is_meshed(&self) -> bool {
        matches!(self, Self::Meshed(_))
    }
}

impl Chunk {
    /// A chunk whose every sample is outside of the surface.
    pub fn outside(key: ChunkUnits<IVec3>, config: &CaveConfig) -> Self {
        let min = chunk_min(key, config.chunk_edge);
        Self {
            key,
            min,
            terrain_surface: config.terrain_surface,
            grid: SampleGrid::filled(config.chunk_edge, config.outside_sample()),
            capsules: Vec::new(),
            mesh: ChunkMesh::default(),
            texture: config.textures.blend(min.0.y as f32, config.chunk_edge),
        }
    }

    /// Samples the field over the chunk at `key` and meshes it.
    pub fn generate(key: ChunkUnits<IVec3>, config: &CaveConfig, field: &CapsuleField) -> ChunkBuild {
        let WorldUnits(extent) = config.chunk_extent(key);
        let capsules = field.intersecting(&extent);
        if capsules.is_empty() {
            return ChunkBuild::NoCapsules;
        }

        let mut chunk = Self::outside(key, config);
        chunk.capsules = capsules;
        chunk.populate(config, field);
        chunk.remesh();

        if chunk.mesh.is_empty() {
            ChunkBuild::Empty(chunk)
        } else {
            ChunkBuild::Meshed(chunk)
        }
    }

    /// Writes the nearest weighted capsule distance plus wall noise into every sample that some capsule contains.
    /// Every other sample keeps the outside value.
    fn populate(&mut self, config: &CaveConfig, field: &CapsuleField) {
        let octree = corner_octree(self.min, self.grid.edge(), config.octree_capacity);
        let membership = CapsuleMembership::collect(&octree, field, &self.capsules);

        let outside = config.outside_sample();
        for (id, point) in octree.iter_points() {
            let sample = match field.closest_weighted_distance(membership.of(id).iter().copied(), point.position) {
                Some(d) => d + config.noise.bump(point.position, config.bumpiness, config.bumpiness_amp),
                None => outside,
            };
            self.grid[point.value] = sample;
        }
    }

    /// Rebuilds the mesh from the current samples.
    pub fn remesh(&mut self) {
        let mesh = mem::take(&mut self.mesh);
        self.mesh = march_into(&self.grid, self.terrain_surface, mesh);
    }

    /// Adds `strength` to (`add`) or subtracts it from every sample within L∞ distance `radius` of `world_point`, then
    /// remeshes. Adding fills space; subtracting carves it.
    ///
    /// Samples on the chunk's outer layer are never edited, so neighbors keep agreeing on their shared faces. Returns the
    /// number of edited samples, which is 0 for a point that is not finite.
    pub fn brush(&mut self, world_point: WorldUnits<Vec3>, add: bool, radius: i32, strength: f32) -> usize {
        if !world_point.0.is_finite() {
            return 0;
        }
        let edge = self.grid.edge();
        // f64 holds every i32 radius and floored f32 coordinate exactly, so the bounds can't overflow.
        let center = world_point.0.floor().as_dvec3() - self.min.0.as_dvec3();
        let radius = DVec3::splat(radius.max(0) as f64);
        let delta = if add { strength } else { -strength };

        let lo = (center - radius).max(DVec3::ONE);
        let hi = (center + radius).min(DVec3::splat((edge - 1) as f64));
        if lo.cmpgt(hi).any() {
            return 0;
        }
        let (lo, hi) = (lo.as_ivec3(), hi.as_ivec3());

        let mut edited = 0;
        for z in lo.z..=hi.z {
            for y in lo.y..=hi.y {
                for x in lo.x..=hi.x {
                    self.grid[IVec3::new(x, y, z)] += delta;
                    edited += 1;
                }
            }
        }
        self.remesh();
        edited
    }

    pub fn key(&self) -> ChunkUnits<IVec3> {
        self.key
    }

    pub fn min(&self) -> WorldUnits<IVec3> {
        self.min
    }

    pub fn edge(&self) -> i32 {
        self.grid.edge()
    }

    pub fn extent(&self) -> WorldUnits<Extent<Vec3>> {
        WorldUnits(Extent::from_min_and_shape(self.min.0.as_vec3(), Vec3::splat(self.edge() as f32)))
    }

    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    /// Capsules that can reach this chunk.
    pub fn capsules(&self) -> &[CapsuleId] {
        &self.capsules
    }

    /// Positions are relative to [`Self::min`].
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    pub fn texture(&self) -> Option<TextureBlend> {
        self.texture
    }

    pub fn num_triangles(&self) -> usize {
        self.mesh.num_triangles()
    }

    pub fn world_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let offset = self.min.0.as_vec3();
        self.mesh
            .triangles()
            .map(move |t| [t[0] + offset, t[1] + offset, t[2] + offset])
    }
}

/// Indexes every grid corner of the chunk at `min`, keeping its chunk-local coordinates as the value.
pub fn corner_octree(min: WorldUnits<IVec3>, edge: i32, capacity: usize) -> SpatialOctree<IVec3> {
    let min = min.0.as_vec3();
    let boundary = Extent::from_min_and_shape(min, Vec3::splat(edge as f32));
    let mut octree = SpatialOctree::new(boundary, capacity);
    for p in SampleGrid::filled(edge, 0.0).iter_points() {
        octree.insert(min + p.as_vec3(), p);
    }
    octree
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
