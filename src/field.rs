// The particle field: a fixed-size cloud of particles drifting inside the
// canvas, pulled toward the pointer, linked by fading lines when close.
//
// All coordinates are backing-store pixels. Anything handed to a Surface is
// divided by the device pixel ratio, since the surface transform already
// scales CSS pixels up by it.

use crate::animator::Scene;
use crate::color::Color;
use crate::config::FieldConfig;
use crate::error::RenderError;
use crate::particle::Particle;
use crate::surface::{Surface, Viewport};
use log::debug;
use nalgebra_glm as glm;
use rand::Rng;

/// Sprites whose pointer influence exceeds this get a glow pass.
pub const GLOW_THRESHOLD: f64 = 0.3;
const GLOW_BLUR: f64 = 15.0;
const MAX_LINE_ALPHA: f64 = 0.5;
pub const LINE_WIDTH: f64 = 0.5;

/// A line between two particles, endpoints in CSS pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Connection {
    pub from: usize,
    pub to: usize,
    pub start: glm::DVec2,
    pub end: glm::DVec2,
    pub start_color: Color,
    pub end_color: Color,
    pub alpha: f64,
}

/// One particle as drawn: a filled circle in CSS pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub center: glm::DVec2,
    pub radius: f64,
    pub alpha: f64,
    pub color: Color,
    pub glow: f64,
}

impl Sprite {
    pub fn glow_blur(&self) -> Option<f64> {
        if self.glow > GLOW_THRESHOLD {
            Some(GLOW_BLUR * self.glow)
        } else {
            None
        }
    }
}

pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    dpr: f64,
    pointer: Option<glm::DVec2>,
}

impl ParticleField {
    pub fn new(config: FieldConfig) -> Result<ParticleField, RenderError> {
        config.validate()?;
        Ok(ParticleField {
            config,
            particles: Vec::with_capacity(config.particle_count as usize),
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
            pointer: None,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Throws away every particle and spawns a fresh set of the configured
    /// size across a `width` x `height` backing store.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f64, height: f64, dpr: f64) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;

        let config = self.config;
        self.particles.clear();
        self.particles.extend(
            (0..config.particle_count).map(|_| Particle::spawn(&mut *rng, width, height, &config)),
        );
        debug!(
            "particle field regenerated: {} particles over {}x{} @{}x",
            self.particles.len(),
            width,
            height,
            dpr
        );
    }

    /// Pointer position in CSS pixels. Only the latest one matters; it is
    /// scaled into backing pixels with the current dpr on every step, so a
    /// dpr change does not leave it stale.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer = Some(glm::vec2(x, y));
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Pointer position in backing-store pixels.
    pub fn pointer(&self) -> Option<glm::DVec2> {
        self.pointer.map(|css| css * self.dpr)
    }

    /// Advances every particle by one frame: pointer pull, integration,
    /// damping, anti-stall nudge and reflection off the field walls.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let config = self.config;
        let pointer = if config.mouse_influence {
            self.pointer()
        } else {
            None
        };
        let reach = config.mouse_radius * self.dpr;
        let max_speed = config.max_speed();
        let floor = config.stall_floor();
        let jitter = config.speed * 0.1;
        let (width, height) = (self.width, self.height);

        for p in &mut self.particles {
            p.influence = 0.0;
            if let Some(pointer) = pointer {
                let to_pointer = pointer - glm::vec2(p.pos.x, p.pos.y);
                let distance = glm::length(&to_pointer);
                if distance < reach {
                    p.influence = 1.0 - distance / reach;
                    // Sitting right on the pointer there is no direction to pull in
                    if distance > 0.0 {
                        let impulse = to_pointer / distance * (p.influence * config.mouse_force);
                        p.vel.x += impulse.x;
                        p.vel.y += impulse.y;

                        let speed = p.planar_speed();
                        if speed > max_speed {
                            p.vel.x *= max_speed / speed;
                            p.vel.y *= max_speed / speed;
                        }
                    }
                }
            }

            p.pos += p.vel;
            p.vel *= config.damping;

            if p.vel.x.abs() < floor {
                p.vel.x += (rng.gen::<f64>() - 0.5) * jitter;
            }
            if p.vel.y.abs() < floor {
                p.vel.y += (rng.gen::<f64>() - 0.5) * jitter;
            }

            reflect(&mut p.pos.x, &mut p.vel.x, width);
            reflect(&mut p.pos.y, &mut p.vel.y, height);
            reflect(&mut p.pos.z, &mut p.vel.z, config.z_range);
        }
    }

    /// Every unordered pair closer than the connection reach, each pair once.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        let n = self.particles.len();
        (0..n).flat_map(move |i| (i + 1..n).filter_map(move |j| self.connection(i, j)))
    }

    fn connection(&self, i: usize, j: usize) -> Option<Connection> {
        let a = &self.particles[i];
        let b = &self.particles[j];
        let reach = self.config.max_distance * self.dpr;
        let distance = glm::distance(&a.pos, &b.pos);
        if distance >= reach {
            return None;
        }
        Some(Connection {
            from: i,
            to: j,
            start: self.to_css(a),
            end: self.to_css(b),
            start_color: a.color,
            end_color: b.color,
            alpha: (1.0 - distance / reach) * MAX_LINE_ALPHA,
        })
    }

    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        let config = self.config;
        self.particles.iter().map(move |p| {
            let scale = p.depth_scale(config.z_range);
            let opacity = 0.6 + scale * 0.4;
            Sprite {
                center: self.to_css(p),
                radius: config.particle_size * scale * 3.0,
                alpha: (opacity * (1.0 + p.influence * 0.5)).min(1.0),
                color: p.color,
                glow: p.influence,
            }
        })
    }

    fn to_css(&self, p: &Particle) -> glm::DVec2 {
        glm::vec2(p.pos.x / self.dpr, p.pos.y / self.dpr)
    }
}

// Flip the velocity and pull the coordinate back inside [0, bound]
fn reflect(coord: &mut f64, vel: &mut f64, bound: f64) {
    if *coord < 0.0 || *coord > bound {
        *vel = -*vel;
        *coord = coord.max(0.0).min(bound);
    }
}

impl Scene for ParticleField {
    fn resize<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R) {
        let (width, height) = viewport.backing_size();
        self.regenerate(rng, width as f64, height as f64, viewport.dpr);
    }

    fn advance<R: Rng + ?Sized>(&mut self, _now_ms: f64, rng: &mut R) {
        self.step(rng);
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), RenderError> {
        for connection in self.connections() {
            surface.stroke_connection(&connection)?;
        }
        for sprite in self.sprites() {
            surface.fill_sprite(&sprite)?;
        }
        Ok(())
    }

    fn pointer_moved(&mut self, x: f64, y: f64) {
        self.set_pointer(x, y);
    }
}
