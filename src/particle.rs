// Simple particle struct to keep track of individual position, velocity,
// size, opacity, and color

use crate::color::Hsl;
use crate::config::FieldConfig;
use rand::Rng;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    pub opacity: f64,
    pub color: Hsl,
}

impl Particle {
    pub fn new(
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        radius: f64,
        opacity: f64,
        color: Hsl,
    ) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            opacity,
            color,
        }
    }

    /// Spawns a particle uniformly inside a `width` x `height` canvas.
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64, config: &FieldConfig) -> Particle {
        let pos = [rng.gen::<f64>() * width, rng.gen::<f64>() * height];
        let vel = [
            (rng.gen::<f64>() - 0.5) * config.velocity_spread,
            (rng.gen::<f64>() - 0.5) * config.velocity_spread,
        ];
        let radius = rng.gen_range(config.radius_range.0, config.radius_range.1);
        let opacity = rng.gen_range(config.opacity_range.0, config.opacity_range.1);
        let hue = rng.gen_range(config.hue_range.0, config.hue_range.1);
        Particle::new(
            pos,
            vel,
            radius,
            opacity,
            Hsl::new(hue, config.saturation, config.lightness),
        )
    }

    // Moves by one frame of velocity. The bounds test runs on the moved
    // position and only flips the heading, so a particle can sit up to one
    // step outside the canvas until the next frame carries it back.
    pub fn step(&mut self, width: f64, height: f64) {
        self.pos = vecmath::vec2_add(self.pos, self.vel);
        if self.pos[0] < 0.0 || self.pos[0] > width {
            self.vel[0] *= -1.0;
        }
        if self.pos[1] < 0.0 || self.pos[1] > height {
            self.vel[1] *= -1.0;
        }
    }

    pub fn distance_to(&self, point: Vector2<f64>) -> f64 {
        vecmath::vec2_len(vecmath::vec2_sub(point, self.pos))
    }

    pub fn speed(&self) -> f64 {
        vecmath::vec2_len(self.vel)
    }

    /// Pulls the velocity toward `pointer` when it lies within `radius`.
    /// Returns whether the particle was nudged.
    pub fn attract_to(
        &mut self,
        pointer: Vector2<f64>,
        radius: f64,
        strength: f64,
        max_speed: Option<f64>,
    ) -> bool {
        let to_pointer = vecmath::vec2_sub(pointer, self.pos);
        if vecmath::vec2_len(to_pointer) >= radius {
            return false;
        }
        self.vel = vecmath::vec2_add(self.vel, vecmath::vec2_scale(to_pointer, strength));
        if let Some(max_speed) = max_speed {
            let speed = self.speed();
            if speed > max_speed {
                self.vel = vecmath::vec2_scale(self.vel, max_speed / speed);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(x: f64, y: f64) -> Particle {
        Particle::new([x, y], [0.0, 0.0], 2.0, 0.5, Hsl::new(220.0, 70.0, 60.0))
    }

    #[test]
    fn random_attributes_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = FieldConfig::default();
        for _ in 0..500 {
            let p = Particle::random(&mut rng, 640.0, 480.0, &config);
            assert!(p.pos[0] >= 0.0 && p.pos[0] < 640.0);
            assert!(p.pos[1] >= 0.0 && p.pos[1] < 480.0);
            assert!(p.vel[0] >= -0.25 && p.vel[0] < 0.25);
            assert!(p.vel[1] >= -0.25 && p.vel[1] < 0.25);
            assert!(p.radius >= 1.0 && p.radius < 3.0);
            assert!(p.opacity >= 0.2 && p.opacity < 0.7);
            assert!(p.color.hue >= 200.0 && p.color.hue < 260.0);
            assert_eq!(p.color.saturation, 70.0);
            assert_eq!(p.color.lightness, 60.0);
        }
    }

    #[test]
    fn step_moves_by_velocity() {
        let mut p = still(10.0, 10.0);
        p.vel = [0.2, -0.1];
        p.step(100.0, 100.0);
        assert!((p.pos[0] - 10.2).abs() < 1e-12);
        assert!((p.pos[1] - 9.9).abs() < 1e-12);
        assert_eq!(p.vel, [0.2, -0.1]);
    }

    #[test]
    fn step_flips_outward_velocity_at_edges() {
        let mut left = still(0.1, 50.0);
        left.vel = [-0.25, 0.0];
        left.step(100.0, 100.0);
        assert_eq!(left.vel[0], 0.25);
        // overshoot is kept, not clamped
        assert!(left.pos[0] < 0.0);
        left.step(100.0, 100.0);
        assert!(left.pos[0] > 0.0);

        let mut bottom = still(50.0, 99.9);
        bottom.vel = [0.0, 0.25];
        bottom.step(100.0, 100.0);
        assert_eq!(bottom.vel[1], -0.25);
        assert_eq!(bottom.vel[0], 0.0);
    }

    #[test]
    fn landing_exactly_on_edge_does_not_flip() {
        let mut p = still(99.75, 50.0);
        p.vel = [0.25, 0.0];
        p.step(100.0, 100.0);
        assert_eq!(p.pos[0], 100.0);
        assert_eq!(p.vel[0], 0.25);
    }

    #[test]
    fn attract_only_inside_radius() {
        let mut near = still(0.0, 0.0);
        assert!(near.attract_to([30.0, 40.0], 100.0, 0.00005, None));
        assert!((near.vel[0] - 0.0015).abs() < 1e-12);
        assert!((near.vel[1] - 0.002).abs() < 1e-12);

        // the radius test is strict
        let mut edge = still(0.0, 0.0);
        assert!(!edge.attract_to([60.0, 80.0], 100.0, 0.00005, None));

        let mut far = still(0.0, 0.0);
        assert!(!far.attract_to([0.0, 100.0], 100.0, 0.00005, None));
        assert_eq!(far.vel, [0.0, 0.0]);
    }

    #[test]
    fn attract_respects_max_speed() {
        let mut p = still(0.0, 0.0);
        p.vel = [1.0, 0.0];
        p.attract_to([50.0, 0.0], 100.0, 0.1, Some(2.0));
        assert!((p.speed() - 2.0).abs() < 1e-12);
    }
}
