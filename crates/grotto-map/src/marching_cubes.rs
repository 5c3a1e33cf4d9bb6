pub mod tables;

use crate::core::SmallKeyHashMap;
use crate::glam::{IVec3, Vec3};
use crate::grid::SampleGrid;

use std::mem;
use tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, END, TRI_TABLE};

/// Triangle mesh of one chunk, in chunk-local coordinates.
///
/// Normals are area-weighted and point toward samples below the threshold, i.e. into the open cave.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |t| {
            [
                self.positions[t[0] as usize],
                self.positions[t[1] as usize],
                self.positions[t[2] as usize],
            ]
        })
    }

    fn compute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);
        for t in self.indices.chunks_exact(3) {
            let [a, b, c] = [t[0] as usize, t[1] as usize, t[2] as usize];
            // Unnormalized, so larger triangles weigh more.
            let n = (self.positions[b] - self.positions[a]).cross(self.positions[c] - self.positions[a]);
            self.normals[a] += n;
            self.normals[b] += n;
            self.normals[c] += n;
        }
        for n in self.normals.iter_mut() {
            *n = n.normalize_or_zero();
        }
    }
}

/// Accumulates triangles while sharing vertices at bitwise-equal positions.
#[derive(Default)]
pub struct MeshBuilder {
    mesh: ChunkMesh,
    vertex_ids: SmallKeyHashMap<[u32; 3], u32>,
}

impl MeshBuilder {
    /// Reuses the buffers of `mesh`.
    pub fn reuse(mut mesh: ChunkMesh) -> Self {
        mesh.clear();
        Self {
            mesh,
            vertex_ids: SmallKeyHashMap::default(),
        }
    }

    pub fn vertex(&mut self, p: Vec3) -> u32 {
        // Adding zero folds -0.0 into 0.0.
        let p = p + Vec3::ZERO;
        let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
        let positions = &mut self.mesh.positions;
        *self.vertex_ids.entry(key).or_insert_with(|| {
            positions.push(p);
            (positions.len() - 1) as u32
        })
    }

    pub fn finish(mut self) -> ChunkMesh {
        self.mesh.compute_normals();
        self.mesh
    }
}

/// Bit `i` is set when corner `i` is below `threshold`.
pub fn cube_configuration(samples: &[f32; 8], threshold: f32) -> u8 {
    samples
        .iter()
        .enumerate()
        .filter(|(_, &s)| s < threshold)
        .fold(0, |config, (i, _)| config | (1 << i))
}

/// The point on `p1..p2` where the linearly interpolated sample crosses `threshold`.
///
/// Equal samples would divide by zero; `threshold` itself is used as the interpolation factor instead.
pub fn interpolate_edge(p1: Vec3, p2: Vec3, s1: f32, s2: f32, threshold: f32) -> Vec3 {
    let difference = s2 - s1;
    let t = if difference == 0.0 {
        threshold
    } else {
        (threshold - s1) / difference
    };
    p1 + (p2 - p1) * t
}

/// Emits the triangles of the unit cube at `min` into `builder`. Returns the number of triangles.
pub fn march_cube(samples: &[f32; 8], min: Vec3, threshold: f32, builder: &mut MeshBuilder) -> usize {
    let config = cube_configuration(samples, threshold) as usize;
    if EDGE_TABLE[config] == 0 {
        return 0;
    }

    let mut num_triangles = 0;
    for triangle in TRI_TABLE[config].chunks_exact(3) {
        if triangle[0] == END {
            break;
        }
        for &edge in triangle {
            // Neighboring cubes walk a shared edge in opposite directions. Always interpolate from the lower corner, so
            // both compute the bitwise-same vertex.
            let [mut c1, mut c2] = EDGE_CORNERS[edge as usize];
            if CORNER_OFFSETS[c1] > CORNER_OFFSETS[c2] {
                mem::swap(&mut c1, &mut c2);
            }
            let p1 = min + IVec3::from(CORNER_OFFSETS[c1]).as_vec3();
            let p2 = min + IVec3::from(CORNER_OFFSETS[c2]).as_vec3();
            let vertex = interpolate_edge(p1, p2, samples[c1], samples[c2], threshold);
            let id = builder.vertex(vertex);
            builder.mesh.indices.push(id);
        }
        num_triangles += 1;
    }
    num_triangles
}

/// Runs marching cubes over every unit cube of `grid`.
pub fn march(grid: &SampleGrid, threshold: f32) -> ChunkMesh {
    march_into(grid, threshold, ChunkMesh::default())
}

/// Like [`march`], but reuses the allocations of `mesh`.
pub fn march_into(grid: &SampleGrid, threshold: f32, mesh: ChunkMesh) -> ChunkMesh {
    let mut builder = MeshBuilder::reuse(mesh);
    for cube in grid.iter_cubes() {
        let mut samples = [0.0; 8];
        for (sample, offset) in samples.iter_mut().zip(CORNER_OFFSETS.iter()) {
            *sample = grid[cube + IVec3::from(*offset)];
        }
        march_cube(&samples, cube.as_vec3(), threshold, &mut builder);
    }
    builder.finish()
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
