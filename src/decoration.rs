//! Planning of stalactites and stalagmites.
//!
//! Props are hung from the ceiling and stood on the floor above and below skeleton points. Finding the actual wall is a
//! ray cast against the rendered chunks, which is left to the host; this module only decides where to cast, which prop to
//! place, and how big it is.

use grotto_map::glam::Vec3;
use grotto_map::Skeleton;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct DecorationSettings {
    pub enabled: bool,
    /// Every `frequency`-th skeleton point is decorated. Bigger values place fewer props.
    pub frequency: usize,
    /// `[min, max)` scale multiplier.
    pub stalactite_scale: [f32; 2],
    pub stalagmite_scale: [f32; 2],
    /// Number of stalactite prop variants to choose from.
    pub stalactite_variants: usize,
    pub stalagmite_variants: usize,
    pub seed: u64,
}

impl Default for DecorationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: 1,
            stalactite_scale: [1.0, 1.0],
            stalagmite_scale: [1.0, 1.0],
            stalactite_variants: 1,
            stalagmite_variants: 1,
            seed: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DecorationKind {
    /// Hangs from the ceiling.
    Stalactite,
    /// Stands on the floor.
    Stalagmite,
}

impl DecorationKind {
    /// Direction of the ray that finds the wall holding this prop.
    pub fn ray_direction(self) -> Vec3 {
        match self {
            Self::Stalactite => Vec3::Y,
            Self::Stalagmite => Vec3::NEG_Y,
        }
    }
}

/// A ray to cast from a skeleton point, and the prop to place where it hits terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorationRay {
    pub kind: DecorationKind,
    pub origin: Vec3,
    pub direction: Vec3,
    pub scale: f32,
    pub variant: usize,
}

impl DecorationRay {
    /// Translation from the hit point that sinks the prop into the wall by a third of its scale.
    pub fn embed_offset(&self) -> Vec3 {
        -self.direction * self.scale / 3.0
    }
}

pub struct DecorationPlanner {
    settings: DecorationSettings,
}

impl DecorationPlanner {
    pub fn new(settings: DecorationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DecorationSettings {
        &self.settings
    }

    /// Rays for every point `j` of branch `i` with `(i + j) % frequency == 0`. Deterministic for a fixed seed.
    pub fn plan(&self, skeleton: &Skeleton) -> Vec<DecorationRay> {
        let s = &self.settings;
        if !s.enabled {
            return Vec::new();
        }

        let mut rng = StdRng::seed_from_u64(s.seed);
        let frequency = s.frequency.max(1);
        let kinds = [
            (DecorationKind::Stalactite, s.stalactite_variants, s.stalactite_scale),
            (DecorationKind::Stalagmite, s.stalagmite_variants, s.stalagmite_scale),
        ];

        let mut rays = Vec::new();
        for (i, j, origin) in skeleton.points() {
            if (i + j) % frequency != 0 {
                continue;
            }
            for &(kind, variants, [min, max]) in kinds.iter() {
                if variants == 0 {
                    continue;
                }
                let scale = if max > min { rng.gen_range(min..max) } else { min };
                rays.push(DecorationRay {
                    kind,
                    origin,
                    direction: kind.ray_direction(),
                    scale,
                    variant: rng.gen_range(0..variants),
                });
            }
        }
        log::debug!("Planned {} decoration rays", rays.len());
        rays
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

    fn skeleton() -> Skeleton {
        let line: Vec<_> = (0..6).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let branch = vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 3.0)];
        Skeleton::new(vec![line, branch]).unwrap()
    }

    fn settings() -> DecorationSettings {
        DecorationSettings {
            enabled: true,
            frequency: 2,
            stalactite_scale: [0.5, 1.5],
            stalagmite_scale: [2.0, 3.0],
            stalactite_variants: 3,
            stalagmite_variants: 2,
            seed: 7,
        }
    }

    #[test]
    fn every_frequency_th_point_gets_both_rays() {
        let rays = DecorationPlanner::new(settings()).plan(&skeleton());

        // Branch 0: j in {0, 2, 4}. Branch 1: j = 1.
        assert_eq!(rays.len(), 2 * 4);
        let origins: Vec<_> = rays.iter().step_by(2).map(|p| p.origin).collect();
        assert_eq!(
            origins,
            vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 3.0)]
        );

        for p in rays.iter() {
            match p.kind {
                DecorationKind::Stalactite => {
                    assert_eq!(p.direction, Vec3::Y);
                    assert!((0.5..1.5).contains(&p.scale));
                    assert!(p.variant < 3);
                }
                DecorationKind::Stalagmite => {
                    assert_eq!(p.direction, Vec3::NEG_Y);
                    assert!((2.0..3.0).contains(&p.scale));
                    assert!(p.variant < 2);
                }
            }
        }
    }

    #[test]
    fn plans_are_deterministic_per_seed() {
        let a = DecorationPlanner::new(settings()).plan(&skeleton());
        let b = DecorationPlanner::new(settings()).plan(&skeleton());
        assert_eq!(a, b);
    }

    #[test]
    fn disabled_or_variantless_kinds_place_nothing() {
        let disabled = DecorationSettings {
            enabled: false,
            ..settings()
        };
        assert!(DecorationPlanner::new(disabled).plan(&skeleton()).is_empty());

        let no_stalagmites = DecorationSettings {
            stalagmite_variants: 0,
            frequency: 0,
            ..settings()
        };
        let rays = DecorationPlanner::new(no_stalagmites).plan(&skeleton());
        // Frequency 0 acts like 1.
        assert_eq!(rays.len(), 8);
        assert!(rays.iter().all(|p| p.kind == DecorationKind::Stalactite));
    }

    #[test]
    fn props_sink_against_the_ray() {
        let ray = DecorationRay {
            kind: DecorationKind::Stalagmite,
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Y,
            scale: 1.5,
            variant: 0,
        };
        assert_relative_eq!(ray.embed_offset(), Vec3::new(0.0, 0.5, 0.0));
    }
}
