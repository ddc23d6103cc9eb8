use boid_shared::{BoidKind, BoidSnapshot, Drawable, Position};

use crate::boundary::boundary_avoidance_with_margin;
use crate::flock::FlockView;
use crate::vector::{normalize_angle, Vector2D};
use crate::Render;

/// Side length of the square sprite used by [`BoidKind::Dart`]
pub const SPRITE_SIZE: f32 = 32.0;
/// Distance from a triangle boid's centre to its tip
pub const TRIANGLE_SIZE: f32 = 10.0;

/// Handle of a boid inside the flock that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoidId(pub u32);

/// Per-kind motion constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindTuning {
    /// Units per second
    pub speed: f32,
    /// Degrees per second
    pub turn_rate: f32,
    /// Other boids closer than this are pushed away from
    pub avoid_radius: f32,
}

impl KindTuning {
    pub fn for_kind(kind: BoidKind) -> Self {
        match kind {
            BoidKind::Standard => Self {
                speed: 35.0,
                turn_rate: 90.0,
                avoid_radius: 5.0,
            },
            BoidKind::Dart => Self {
                speed: 150.0,
                turn_rate: 480.0,
                avoid_radius: 30.0,
            },
        }
    }
}

impl From<BoidKind> for KindTuning {
    fn from(kind: BoidKind) -> Self {
        Self::for_kind(kind)
    }
}

/// Turn decision for one tick. Turning always happens at the full rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Counter-clockwise on screen
    Left,
    Straight,
    /// Clockwise on screen
    Right,
}

impl Turn {
    /// Pick a direction from a signed angle, ignoring anything inside `dead_zone`
    pub fn toward(angle: f32, dead_zone: f32) -> Self {
        if angle == 0.0 || !(angle.abs() >= dead_zone) {
            Turn::Straight
        } else if angle > 0.0 {
            Turn::Right
        } else {
            Turn::Left
        }
    }

    /// Signed heading change for a turn of `max_degrees`
    pub fn degrees(self, max_degrees: f32) -> f32 {
        match self {
            Turn::Left => -max_degrees,
            Turn::Straight => 0.0,
            Turn::Right => max_degrees,
        }
    }
}

/// State a boid will take at the end of the current tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidUpdate {
    pub position: Vector2D,
    pub heading: f32,
    pub turn: Turn,
}

/// A single boid entity
#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub kind: BoidKind,
    pub tuning: KindTuning,
    // canonical; `forward` is derived from it
    heading: f32,
    forward: Vector2D,
    member: Option<BoidId>,
}

impl Boid {
    /// Create a boid at `position` facing `heading` degrees (0 = up, clockwise)
    pub fn new(position: Vector2D, heading: f32, kind: BoidKind) -> Self {
        let heading = normalize_angle(heading);
        Self {
            position,
            kind,
            tuning: KindTuning::for_kind(kind),
            heading,
            forward: Vector2D::from_heading(heading),
            member: None,
        }
    }

    /// Create a boid facing along `forward`; a zero vector faces up
    pub fn facing(position: Vector2D, forward: Vector2D, kind: BoidKind) -> Self {
        Self::new(position, forward.heading(), kind)
    }

    #[cfg(feature = "std")]
    pub fn random(bounds: &boid_shared::ArenaBounds, kind: BoidKind) -> Self {
        Self::random_with(&mut rand::thread_rng(), bounds, kind)
    }

    /// Uniform position inside `region` with a uniform heading
    #[cfg(feature = "std")]
    pub fn random_with<G: rand::Rng>(
        rng: &mut G,
        region: &boid_shared::ArenaBounds,
        kind: BoidKind,
    ) -> Self {
        let position = Vector2D::new(
            rng.gen_range(region.left..=region.right),
            rng.gen_range(region.top..=region.bottom),
        );
        Self::new(position, rng.gen_range(0.0..360.0), kind)
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.tuning.speed = speed;
        self
    }

    pub fn with_turn_rate(mut self, turn_rate: f32) -> Self {
        self.tuning.turn_rate = turn_rate;
        self
    }

    pub fn with_avoid_radius(mut self, avoid_radius: f32) -> Self {
        self.tuning.avoid_radius = avoid_radius;
        self
    }

    /// Heading in degrees, always in [0, 360)
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Unit vector matching [`Boid::heading`]
    pub fn forward(&self) -> Vector2D {
        self.forward
    }

    pub fn set_heading(&mut self, degrees: f32) {
        self.heading = normalize_angle(degrees);
        self.forward = Vector2D::from_heading(self.heading);
    }

    /// Id in the owning flock, `None` while the boid is not in one
    pub fn id(&self) -> Option<BoidId> {
        self.member
    }

    pub(crate) fn set_member(&mut self, member: Option<BoidId>) {
        self.member = member;
    }

    pub fn snapshot(&self) -> BoidSnapshot {
        BoidSnapshot {
            position: self.position.into(),
            heading: self.heading,
        }
    }

    pub fn drawable(&self) -> Drawable {
        match self.kind {
            BoidKind::Standard => {
                let tip = self.forward * TRIANGLE_SIZE;
                Drawable::Polygon {
                    points: [
                        (self.position + tip.rotate(135.0)).into(),
                        (self.position + tip.rotate(-135.0)).into(),
                        (self.position + tip).into(),
                    ],
                }
            }
            BoidKind::Dart => {
                let half = SPRITE_SIZE / 2.0;
                Drawable::Sprite {
                    top_left: Position::new(self.position.x - half, self.position.y - half),
                    size: SPRITE_SIZE,
                    // the sprite art faces right
                    rotation: 90.0 - self.heading,
                }
            }
        }
    }

    /// Work out where this boid goes this tick, reading only the snapshot in `view`.
    ///
    /// Movement is dead reckoning plus small nudges away from crowding
    /// neighbours and toward the centroid. Turning is bang-bang: boundary
    /// avoidance wins whenever it asks for a turn, otherwise the boid turns
    /// toward the blend of flock alignment and centering.
    pub fn plan(&self, view: &FlockView<'_>, dt: f32) -> BoidUpdate {
        let settings = view.settings;
        let step = self.tuning.speed * dt;

        let mut position = self.position + self.forward * step;
        if let Some(repulsion) = view.neighbor_repulsion(self) {
            position += repulsion * (step * settings.separation_nudge);
        }
        let centroid = view.try_centroid();
        if let Some(centroid) = centroid {
            position += (centroid - self.position).normalize() * (step * settings.cohesion_nudge);
        }

        let mut turn = Turn::Straight;
        if let Some(avoidance) =
            boundary_avoidance_with_margin(position, view.bounds, settings.boundary_margin)
        {
            turn = Turn::toward(self.forward.angle_to(&avoidance), settings.dead_zone);
            if turn != Turn::Straight {
                log::trace!("{:?} steering back into the arena ({:?})", self.member, turn);
            }
        }
        if turn == Turn::Straight {
            if let Some(centroid) = centroid {
                turn = self.flock_turn(view, centroid);
            }
        }

        BoidUpdate {
            position,
            heading: normalize_angle(self.heading + turn.degrees(self.tuning.turn_rate * dt)),
            turn,
        }
    }

    // Flock aggregates are compared against the snapshot position, not the moved one
    fn flock_turn(&self, view: &FlockView<'_>, centroid: Vector2D) -> Turn {
        let settings = view.settings;
        let alignment = self.forward.angle_to(&view.average_heading()) * settings.alignment_weight;
        let centering = if view.has_neighbor_within(self, settings.inner_range) {
            0.0
        } else {
            self.forward.angle_to(&(centroid - self.position)) * settings.centering_weight
        };
        Turn::toward(alignment + centering, settings.dead_zone)
    }

    /// Commit a planned update
    pub fn apply(&mut self, update: BoidUpdate) {
        self.position = update.position;
        self.set_heading(update.heading);
    }
}

impl Render for Boid {
    fn render(&self, sink: &mut dyn FnMut(Drawable)) {
        sink(self.drawable());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boid_creation() {
        let boid = Boid::new(Vector2D::new(10.0, 20.0), 450.0, BoidKind::Standard);

        assert_eq!(boid.position, Vector2D::new(10.0, 20.0));
        assert_eq!(boid.heading(), 90.0);
        assert!((boid.forward().x - 1.0).abs() < 1e-6);
        assert_eq!(boid.tuning, KindTuning::for_kind(BoidKind::Standard));
        assert_eq!(boid.id(), None);
    }

    #[test]
    fn test_facing_zero_vector_points_up() {
        let boid = Boid::facing(Vector2D::zero(), Vector2D::zero(), BoidKind::Standard);
        assert_eq!(boid.heading(), 0.0);
        assert!((boid.forward().magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_kind_tuning() {
        let dart = Boid::new(Vector2D::zero(), 0.0, BoidKind::Dart);
        assert_eq!(dart.tuning.speed, 150.0);
        assert_eq!(dart.tuning.turn_rate, 480.0);
        assert_eq!(dart.tuning.avoid_radius, 30.0);

        let slow = dart.with_speed(10.0).with_turn_rate(45.0).with_avoid_radius(2.0);
        assert_eq!(
            slow.tuning,
            KindTuning {
                speed: 10.0,
                turn_rate: 45.0,
                avoid_radius: 2.0
            }
        );
    }

    #[test]
    fn test_turn_toward() {
        assert_eq!(Turn::toward(0.2, 0.5), Turn::Straight);
        assert_eq!(Turn::toward(-0.2, 0.5), Turn::Straight);
        assert_eq!(Turn::toward(30.0, 0.5), Turn::Right);
        assert_eq!(Turn::toward(-30.0, 0.5), Turn::Left);
        assert_eq!(Turn::toward(0.0, 0.0), Turn::Straight);
        assert_eq!(Turn::toward(f32::NAN, 0.5), Turn::Straight);
        assert_eq!(Turn::Left.degrees(9.0), -9.0);
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let boid = Boid::new(Vector2D::new(1.0, 2.0), 45.0, BoidKind::Standard);
        let before = boid.clone();
        let snapshot = boid.snapshot();
        assert_eq!(snapshot.position, Position::new(1.0, 2.0));
        assert_eq!(snapshot.heading, 45.0);
        assert_eq!(boid, before);
    }

    #[test]
    fn test_triangle_drawable_points_forward() {
        let boid = Boid::new(Vector2D::new(50.0, 50.0), 90.0, BoidKind::Standard);
        match boid.drawable() {
            Drawable::Polygon { points } => {
                let tip = points[2];
                assert!((tip.x - 60.0).abs() < 1e-4);
                assert!((tip.y - 50.0).abs() < 1e-4);
                // both base corners sit behind the centre
                assert!(points[0].x < 50.0 && points[1].x < 50.0);
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_dart_drawable_is_sprite() {
        let boid = Boid::new(Vector2D::new(50.0, 50.0), 30.0, BoidKind::Dart);
        assert_eq!(
            boid.drawable(),
            Drawable::Sprite {
                top_left: Position::new(34.0, 34.0),
                size: SPRITE_SIZE,
                rotation: 60.0,
            }
        );
    }

    #[test]
    fn test_random_boid_inside_region() {
        let region = boid_shared::ArenaBounds::new(0.0, 0.0, 100.0, 50.0);
        for _ in 0..50 {
            let boid = Boid::random(&region, BoidKind::Standard);
            assert!(region.contains(&boid.position.into()));
            assert!((0.0..360.0).contains(&boid.heading()));
        }
    }
}
