//! Mouse-reactive particle field

use rand::Rng;
use serde::Serialize;

use super::{clamp_dt, Point};

#[derive(Debug, Clone)]
pub struct ParticleConfig {
    pub count: usize,
    /// Pixels per second
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Pointer repulsion radius in pixels
    pub repel_radius: f32,
    /// Pixels per second pushed at the pointer itself, falling off linearly
    pub repel_strength: f32,
    /// Particles closer than this get a link line
    pub link_distance: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 80,
            max_speed: 30.0,
            min_radius: 1.0,
            max_radius: 3.0,
            repel_radius: 120.0,
            repel_strength: 240.0,
            link_distance: 110.0,
        }
    }
}

impl ParticleConfig {
    /// Fewer particles for narrow viewports
    pub fn for_viewport(width: f32) -> Self {
        let count = if width < 768.0 { 40 } else { 80 };
        Self { count, ..Self::default() }
    }

    /// Speed taken as a magnitude, radius bounds ordered, radii/distances finite and >= 0.
    pub fn normalized(mut self) -> Self {
        let finite = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.max_speed = finite(self.max_speed.abs());
        let (a, b) = (finite(self.min_radius), finite(self.max_radius));
        self.min_radius = a.min(b);
        self.max_radius = a.max(b);
        self.repel_radius = finite(self.repel_radius);
        self.repel_strength = finite(self.repel_strength);
        self.link_distance = finite(self.link_distance);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    /// 1.0 when touching, 0.0 at the link distance
    pub alpha: f32,
}

pub struct ParticleField {
    config: ParticleConfig,
    width: f32,
    height: f32,
    pointer: Option<Point>,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(config: ParticleConfig, width: f32, height: f32, rng: &mut R) -> Self {
        let config = config.normalized();
        let particles = (0..config.count)
            .map(|_| Particle {
                position: Point::new(rng.gen_range(0.0..width.max(1.0)), rng.gen_range(0.0..height.max(1.0))),
                velocity: Point::new(
                    rng.gen_range(-config.max_speed..=config.max_speed),
                    rng.gen_range(-config.max_speed..=config.max_speed),
                ),
                radius: rng.gen_range(config.min_radius..=config.max_radius),
            })
            .collect();
        Self { config, width, height, pointer: None, particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn on_pointer_move(&mut self, p: Point) {
        self.pointer = Some(p);
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
    }

    /// Keep particles inside the new bounds.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        for p in &mut self.particles {
            p.position.x = p.position.x.rem_euclid(width.max(1.0));
            p.position.y = p.position.y.rem_euclid(height.max(1.0));
        }
    }

    /// Advance one frame of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let dt = clamp_dt(dt);
        let (w, h) = (self.width.max(1.0), self.height.max(1.0));
        for p in &mut self.particles {
            let mut push = Point::default();
            if let Some(pointer) = self.pointer {
                let d = p.position.distance(pointer);
                if d < self.config.repel_radius && d > f32::EPSILON {
                    let force = (1.0 - d / self.config.repel_radius) * self.config.repel_strength;
                    push.x = (p.position.x - pointer.x) / d * force;
                    push.y = (p.position.y - pointer.y) / d * force;
                }
            }
            p.position.x = (p.position.x + (p.velocity.x + push.x) * dt).rem_euclid(w);
            p.position.y = (p.position.y + (p.velocity.y + push.y) * dt).rem_euclid(h);
        }
    }

    pub fn link_pairs(&self) -> Vec<Link> {
        let max = self.config.link_distance;
        let mut links = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let d = a.position.distance(b.position);
                if d < max {
                    links.push(Link { a: i, b: j, alpha: 1.0 - d / max });
                }
            }
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still_field(points: &[Point]) -> ParticleField {
        let config = ParticleConfig { count: 0, ..Default::default() };
        let mut field = ParticleField::new(config, 400.0, 300.0, &mut StdRng::seed_from_u64(0));
        field.particles = points
            .iter()
            .map(|&position| Particle { position, velocity: Point::default(), radius: 2.0 })
            .collect();
        field
    }

    #[test]
    fn spawns_inside_viewport() {
        let field = ParticleField::new(ParticleConfig::default(), 800.0, 600.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(field.particles().len(), 80);
        for p in field.particles() {
            assert!((0.0..800.0).contains(&p.position.x));
            assert!((0.0..600.0).contains(&p.position.y));
            assert!(p.radius >= 1.0 && p.radius <= 3.0);
        }
        assert_eq!(ParticleConfig::for_viewport(400.0).count, 40);
    }

    #[test]
    fn inverted_config_is_normalized() {
        let config = ParticleConfig { count: 20, min_radius: 3.0, max_radius: 1.0, max_speed: -10.0, ..Default::default() };
        let field = ParticleField::new(config, 200.0, 200.0, &mut StdRng::seed_from_u64(7));
        assert_eq!(field.particles().len(), 20);
        for p in field.particles() {
            assert!(p.radius >= 1.0 && p.radius <= 3.0);
            assert!(p.velocity.x.abs() <= 10.0 && p.velocity.y.abs() <= 10.0);
        }

        let nan = ParticleConfig { max_speed: f32::NAN, link_distance: -5.0, ..Default::default() }.normalized();
        assert_eq!(nan.max_speed, 0.0);
        assert_eq!(nan.link_distance, 0.0);
    }

    #[test]
    fn wraps_at_edges() {
        let mut field = still_field(&[Point::new(399.0, 1.0)]);
        field.particles[0].velocity = Point::new(40.0, -40.0);
        field.step(0.05);
        let p = field.particles()[0].position;
        assert!((p.x - 1.0).abs() < 1e-3, "x wrapped to {}", p.x);
        assert!((p.y - 299.0).abs() < 1e-3, "y wrapped to {}", p.y);
    }

    #[test]
    fn pointer_repels() {
        let mut field = still_field(&[Point::new(110.0, 100.0), Point::new(350.0, 250.0)]);
        field.on_pointer_move(Point::new(100.0, 100.0));
        field.step(0.016);
        assert!(field.particles()[0].position.x > 110.0);
        assert_eq!(field.particles()[1].position, Point::new(350.0, 250.0));

        field.on_pointer_leave();
        let before = field.particles()[0].position;
        field.step(0.016);
        assert_eq!(field.particles()[0].position, before);
    }

    #[test]
    fn links_fade_with_distance() {
        let field = still_field(&[Point::new(0.0, 0.0), Point::new(55.0, 0.0), Point::new(300.0, 0.0)]);
        let links = field.link_pairs();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].a, links[0].b), (0, 1));
        assert!((links[0].alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut field = still_field(&[Point::new(10.0, 10.0)]);
        field.particles[0].velocity = Point::new(100.0, 0.0);
        field.step(10.0);
        assert!((field.particles()[0].position.x - 15.0).abs() < 1e-3);
    }
}
