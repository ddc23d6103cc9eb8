#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};

/// Represents a 2D position in arena coordinates (y grows downward)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

/// Rectangle the boids are steered to stay inside.
///
/// `top` is the smaller y value: the arena uses screen coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ArenaBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ArenaBounds {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// True when the rectangle has a positive, finite area
    pub fn is_valid(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
            && self.left < self.right
            && self.top < self.bottom
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.x >= self.left
            && position.x <= self.right
            && position.y >= self.top
            && position.y <= self.bottom
    }
}

impl Default for ArenaBounds {
    /// A 1920x1080 screen with a 100 unit border
    fn default() -> Self {
        Self::new(100.0, 100.0, 1820.0, 980.0)
    }
}

/// Agent variants; each maps to its own tuning constants and look
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoidKind {
    /// Slow triangle-shaped boid
    #[default]
    Standard,
    /// Fast, sharp-turning boid drawn as a sprite
    Dart,
}

/// Weights of the per-tick steering blend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SteeringSettings {
    /// Fraction of the step length used to push away from crowding neighbours
    pub separation_nudge: f32,
    /// Fraction of the step length used to drift toward the flock centroid
    pub cohesion_nudge: f32,
    /// Weight of the angle toward the average heading
    pub alignment_weight: f32,
    /// Weight of the angle toward the centroid
    pub centering_weight: f32,
    /// Centering is skipped while another boid is closer than this
    pub inner_range: f32,
    /// Angles (degrees) smaller than this produce no turn
    pub dead_zone: f32,
    /// Share of the target direction in the average heading when a target is set
    pub target_bias: f32,
    /// Distance inside the bounds at which boundary avoidance starts
    pub boundary_margin: f32,
}

impl Default for SteeringSettings {
    fn default() -> Self {
        Self {
            separation_nudge: 0.2,
            cohesion_nudge: 0.1,
            alignment_weight: 0.8,
            centering_weight: 0.2,
            inner_range: 10.0,
            dead_zone: 0.5,
            target_bias: 0.5,
            boundary_margin: 0.0,
        }
    }
}

/// Read-only projection of a boid consumed by renderers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidSnapshot {
    pub position: Position,
    /// Heading in degrees, 0 = up, clockwise, always in [0, 360)
    pub heading: f32,
}

/// Something a renderer knows how to draw
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Drawable {
    /// Filled triangle in world coordinates
    Polygon { points: [Position; 3] },
    /// Square image blitted at `top_left`, rotated counter-clockwise by `rotation` degrees
    Sprite {
        top_left: Position,
        size: f32,
        rotation: f32,
    },
    /// Axis-aligned square outline
    Square { center: Position, size: f32 },
}

#[cfg(feature = "std")]
mod config {
    use super::*;

    /// One flock to spawn at startup
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct FlockConfig {
        pub name: String,
        pub count: usize,
        #[serde(default)]
        pub kind: BoidKind,
        /// Optional point the flock's average heading is biased toward
        #[serde(default)]
        pub target: Option<Position>,
        /// Region boids spawn in; the arena bounds when absent
        #[serde(default)]
        pub spawn: Option<ArenaBounds>,
    }

    impl Default for FlockConfig {
        fn default() -> Self {
            Self {
                name: "flock".to_string(),
                count: 4,
                kind: BoidKind::Standard,
                target: None,
                spawn: None,
            }
        }
    }

    /// Full simulation configuration, usually loaded from JSON
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    pub struct SimulationConfig {
        pub bounds: ArenaBounds,
        pub steering: SteeringSettings,
        /// Fixed time step in seconds
        pub dt: f32,
        pub ticks: u64,
        pub seed: u64,
        pub flocks: Vec<FlockConfig>,
        /// Static scene objects with no physics
        pub markers: Vec<Position>,
    }

    impl Default for SimulationConfig {
        fn default() -> Self {
            Self {
                bounds: ArenaBounds::default(),
                steering: SteeringSettings::default(),
                dt: 1.0 / 60.0,
                ticks: 600,
                seed: 1,
                flocks: vec![FlockConfig::default()],
                markers: Vec::new(),
            }
        }
    }

    impl SimulationConfig {
        pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
            serde_json::from_str(json)
        }
    }

    /// Positions of one flock at the end of a tick
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct FlockFrame {
        pub name: String,
        pub boids: Vec<BoidSnapshot>,
    }

    /// Everything emitted for a single rendered frame
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct FrameReport {
        pub tick: u64,
        /// Simulated seconds since start
        pub time: f32,
        pub flocks: Vec<FlockFrame>,
        pub drawables: Vec<Drawable>,
    }

    impl FrameReport {
        /// Serialize as a single JSON line (no trailing newline)
        pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
            serde_json::to_string(self)
        }
    }
}

#[cfg(feature = "std")]
pub use config::{FlockConfig, FlockFrame, FrameReport, SimulationConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let p1 = Position::new(0.0, 0.0);
        let p2 = Position::new(3.0, 4.0);
        assert_eq!(p1.distance_to(&p2), 5.0);
    }

    #[test]
    fn test_bounds_geometry() {
        let bounds = ArenaBounds::new(100.0, 50.0, 500.0, 250.0);
        assert_eq!(bounds.width(), 400.0);
        assert_eq!(bounds.height(), 200.0);
        assert_eq!(bounds.center(), Position::new(300.0, 150.0));
        assert!(bounds.is_valid());
        assert!(bounds.contains(&Position::new(100.0, 250.0)));
        assert!(!bounds.contains(&Position::new(99.0, 100.0)));
    }

    #[test]
    fn test_inverted_bounds_are_invalid() {
        assert!(!ArenaBounds::new(10.0, 0.0, 5.0, 10.0).is_valid());
        assert!(!ArenaBounds::new(0.0, 10.0, 5.0, 10.0).is_valid());
        assert!(!ArenaBounds::new(0.0, 0.0, f32::INFINITY, 10.0).is_valid());
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config = SimulationConfig::from_json(
            r#"{ "ticks": 10, "flocks": [ { "name": "darts", "count": 3, "kind": "dart" } ] }"#,
        )
        .unwrap();
        assert_eq!(config.ticks, 10);
        assert_eq!(config.bounds, ArenaBounds::default());
        assert_eq!(config.steering, SteeringSettings::default());
        assert_eq!(config.flocks.len(), 1);
        assert_eq!(config.flocks[0].kind, BoidKind::Dart);
        assert!(config.flocks[0].target.is_none());
    }

    #[test]
    fn test_partial_steering_settings() {
        let config =
            SimulationConfig::from_json(r#"{ "steering": { "boundary_margin": 20.0 } }"#).unwrap();
        assert_eq!(config.steering.boundary_margin, 20.0);
        assert_eq!(config.steering.dead_zone, 0.5);
    }

    #[test]
    fn test_drawable_is_tagged() {
        let square = Drawable::Square {
            center: Position::new(1.0, 2.0),
            size: 10.0,
        };
        let json = serde_json::to_string(&square).unwrap();
        assert!(json.contains(r#""shape":"square""#));
        let back: Drawable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, square);
    }
}
