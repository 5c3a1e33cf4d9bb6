use crate::glam::Vec3;

use ::noise::{NoiseFn, Perlin};

/// Deterministic coherent 3D noise in `[0, 1]`, assembled from six 2D Perlin samples over every ordered pair of axes.
#[derive(Clone, Debug)]
pub struct CaveNoise {
    perlin: Perlin,
}

impl CaveNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// 2D Perlin noise remapped from `[-1, 1]` to `[0, 1]`.
    pub fn sample2(&self, x: f32, y: f32) -> f32 {
        let v = self.perlin.get([x as f64, y as f64]) as f32;
        (0.5 * v + 0.5).clamp(0.0, 1.0)
    }

    /// The mean of the six pairwise samples `xy, xz, yx, zx, yz, zy`.
    pub fn sample3(&self, p: Vec3) -> f32 {
        let Vec3 { x, y, z } = p;
        let sum = self.sample2(x, y)
            + self.sample2(x, z)
            + self.sample2(y, x)
            + self.sample2(z, x)
            + self.sample2(y, z)
            + self.sample2(z, y);
        sum / 6.0
    }

    /// Wall perturbation added to a field sample at `p`. Zero-mean around the noise midpoint and bounded by `amplitude / 2`.
    pub fn bump(&self, p: Vec3, bumpiness: f32, amplitude: f32) -> f32 {
        (self.sample3(p * bumpiness) - 0.5) * amplitude
    }
}

impl Default for CaveNoise {
    fn default() -> Self {
        Self::new(0)
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

    use approx::assert_relative_eq;

    #[test]
    fn noise_is_deterministic_and_bounded() {
        let a = CaveNoise::new(7);
        let b = CaveNoise::new(7);
        for i in 0..100 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * -1.13, i as f32 * 0.071);
            let v = a.sample3(p);
            assert_eq!(v, b.sample3(p));
            assert!((0.0..=1.0).contains(&v), "{}", v);
        }
    }

    #[test]
    fn lattice_points_sample_the_midpoint() {
        // Gradient noise vanishes on integer lattice points.
        let noise = CaveNoise::new(3);
        assert_relative_eq!(noise.sample3(Vec3::new(1.0, 2.0, 3.0)), 0.5);
        assert_relative_eq!(noise.bump(Vec3::new(1.0, 2.0, 3.0), 1.0, 40.0), 0.0);
    }

    #[test]
    fn bump_is_bounded_by_half_amplitude() {
        let noise = CaveNoise::new(11);
        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.9, (i % 7) as f32 * 1.3, i as f32 * -0.4);
            assert!(noise.bump(p, 0.3, 10.0).abs() <= 5.0);
        }
    }
}
