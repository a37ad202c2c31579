// Simple particle struct to keep track of individual position, velocity, and color.
// Positions live in backing-store pixels, z is only a depth cue.

use crate::color::Color;
use crate::config::FieldConfig;
use nalgebra_glm as glm;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: glm::DVec3,
    pub vel: glm::DVec3,
    pub color: Color,
    /// Pointer proximity in [0, 1] from the latest update, 0 when out of reach.
    pub influence: f64,
}

impl Particle {
    pub fn new(pos: glm::DVec3, vel: glm::DVec3, color: Color) -> Particle {
        Particle {
            pos,
            vel,
            color,
            influence: 0.0,
        }
    }

    // Uniform position inside the surface, velocity components in [-speed/2, speed/2)
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        width: f64,
        height: f64,
        config: &FieldConfig,
    ) -> Particle {
        let pos = glm::vec3(
            rng.gen::<f64>() * width,
            rng.gen::<f64>() * height,
            rng.gen::<f64>() * config.z_range,
        );
        let vel = glm::vec3(
            (rng.gen::<f64>() - 0.5) * config.speed,
            (rng.gen::<f64>() - 0.5) * config.speed,
            (rng.gen::<f64>() - 0.5) * config.speed,
        );
        Particle::new(pos, vel, Color::random_from_palette(rng))
    }

    /// 1 at the front of the field, 0 at the back.
    pub fn depth_scale(&self, z_range: f64) -> f64 {
        (z_range - self.pos.z) / z_range
    }

    pub fn planar_speed(&self) -> f64 {
        glm::length(&glm::vec2(self.vel.x, self.vel.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawn_respects_surface_and_speed() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let p = Particle::spawn(&mut rng, 640.0, 480.0, &config);
            assert!(p.pos.x >= 0.0 && p.pos.x <= 640.0);
            assert!(p.pos.y >= 0.0 && p.pos.y <= 480.0);
            assert!(p.pos.z >= 0.0 && p.pos.z <= config.z_range);
            for v in p.vel.iter() {
                assert!(v.abs() <= config.speed / 2.0);
            }
            assert_eq!(p.influence, 0.0);
        }
    }

    #[test]
    fn depth_scale_runs_front_to_back() {
        let mut p = Particle::new(glm::vec3(0.0, 0.0, 0.0), glm::vec3(0.0, 0.0, 0.0), Color::WHITE);
        assert_eq!(p.depth_scale(1000.0), 1.0);
        p.pos.z = 1000.0;
        assert_eq!(p.depth_scale(1000.0), 0.0);
        p.pos.z = 250.0;
        assert!((p.depth_scale(1000.0) - 0.75).abs() < 1e-12);
    }
}
