//! The particle field: a bounded 2D area and the particles drifting in it.
//!
//! The field knows nothing about the browser. It is driven by the frame loop
//! ([`ParticleField::step`]) and by input events ([`ParticleField::resize`],
//! [`ParticleField::on_pointer_move`]), and is drawn by
//! [`renderer::render_frame`](crate::renderer::render_frame).

use crate::config::FieldConfig;
use crate::links;
use crate::particle::Particle;
use rand::Rng;

pub struct ParticleField<R: Rng> {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    config: FieldConfig,
    rng: R,
}

impl<R: Rng> ParticleField<R> {
    /// Creates the field and populates it for a `width` x `height` canvas.
    pub fn new(width: f64, height: f64, config: FieldConfig, rng: R) -> Self {
        let mut field = ParticleField {
            width: 0.0,
            height: 0.0,
            particles: Vec::new(),
            config,
            rng,
        };
        field.initialize(width, height);
        field
    }

    /// Replaces the whole particle set with `floor(width * height / density)`
    /// freshly spawned particles.
    pub fn initialize(&mut self, width: f64, height: f64) {
        self.width = sanitize(width);
        self.height = sanitize(height);
        let count = particle_count_for(self.width, self.height, self.config.density);

        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            particles.push(Particle::random(
                &mut self.rng,
                self.width,
                self.height,
                &self.config,
            ));
        }
        self.particles = particles;
    }

    /// Canvas size changed; particles are regenerated, not carried over.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.initialize(width, height);
    }

    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.step(width, height);
        }
    }

    /// Nudges every particle near the pointer toward it. Returns how many
    /// particles were affected.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> usize {
        if !x.is_finite() || !y.is_finite() {
            return 0;
        }
        let FieldConfig {
            pointer_radius,
            pointer_strength,
            max_speed,
            ..
        } = self.config;
        self.particles
            .iter_mut()
            .map(|p| p.attract_to([x, y], pointer_radius, pointer_strength, max_speed))
            .filter(|&nudged| nudged)
            .count()
    }

    /// Index pairs of particles closer than the configured link distance.
    pub fn links(&self) -> Vec<(usize, usize)> {
        links::find_links(&self.particles, self.config.link_distance)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}

/// Upper bound on the particle count, whatever the canvas size or density.
pub const MAX_PARTICLES: usize = 5_000;

pub fn particle_count_for(width: f64, height: f64, density: f64) -> usize {
    let area = sanitize(width) * sanitize(height);
    if !(density > 0.0) {
        return 0;
    }
    let count = (area / density).floor();
    // An overflowing area or a tiny density gives inf, which `as` would
    // saturate to usize::MAX
    if count.is_finite() && count < MAX_PARTICLES as f64 {
        count as usize
    } else {
        MAX_PARTICLES
    }
}

// NaN, infinite and negative sizes all collapse to an empty canvas
fn sanitize(dimension: f64) -> f64 {
    if dimension.is_finite() && dimension > 0.0 {
        dimension
    } else {
        0.0
    }
}
