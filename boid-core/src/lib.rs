#![cfg_attr(not(feature = "std"), no_std)]

//! Flocking core: boids that steer by separation, alignment, cohesion and
//! arena-boundary avoidance, updated once per fixed tick.

mod math;

pub mod boid;
pub mod boundary;
pub mod flock;
pub mod rng;
pub mod vector;

pub use boid::{Boid, BoidId, BoidUpdate, KindTuning, Turn};
pub use boid_shared::{ArenaBounds, BoidKind, BoidSnapshot, Drawable, Position, SteeringSettings};
pub use boundary::{boundary_avoidance, boundary_avoidance_with_margin};
pub use flock::{Flock, FlockView, DEFAULT_CAPACITY};
pub use rng::{RandomSource, SimpleRng};
pub use vector::{lerp, normalize_angle, Vector2D};

/// Anything that advances with the simulation clock
pub trait Simulated {
    /// Advance by `dt` seconds. `dt` must not be negative.
    fn update(&mut self, dt: f32);
}

/// Anything that can describe itself to a renderer
pub trait Render {
    fn render(&self, sink: &mut dyn FnMut(Drawable));
}
