use anyhow::{bail, Result};
use boid_core::{Boid, Drawable, Flock, Position, Render, SimpleRng, Simulated};
use boid_shared::{FlockFrame, FrameReport, SimulationConfig};
use rand::{rngs::StdRng, SeedableRng};

/// Side of the square drawn for a [`Marker`]
pub const MARKER_SIZE: f32 = 10.0;

/// An object living in a [`Scene`].
///
/// Physics is an optional capability: the clock only advances objects
/// that return something from [`SceneObject::as_simulated`].
pub trait SceneObject: Render {
    fn name(&self) -> &str;

    fn as_simulated(&mut self) -> Option<&mut dyn Simulated> {
        None
    }

    /// Boid snapshots for the frame report, if the object has any
    fn frame(&self) -> Option<FlockFrame> {
        None
    }

    fn summary(&self) -> Option<FlockSummary> {
        None
    }
}

/// Aggregate numbers logged while a run is in progress
#[derive(Debug, Clone, PartialEq)]
pub struct FlockSummary {
    pub name: String,
    pub members: usize,
    pub centroid: Option<Position>,
    pub span: f32,
}

/// A named flock placed in a scene
pub struct FlockEntity {
    name: String,
    flock: Flock,
}

impl FlockEntity {
    pub fn new(name: impl Into<String>, flock: Flock) -> Self {
        Self {
            name: name.into(),
            flock,
        }
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn flock_mut(&mut self) -> &mut Flock {
        &mut self.flock
    }
}

impl Render for FlockEntity {
    fn render(&self, sink: &mut dyn FnMut(Drawable)) {
        self.flock.render(sink);
    }
}

impl SceneObject for FlockEntity {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_simulated(&mut self) -> Option<&mut dyn Simulated> {
        Some(&mut self.flock)
    }

    fn frame(&self) -> Option<FlockFrame> {
        Some(FlockFrame {
            name: self.name.clone(),
            boids: self.flock.snapshots().collect(),
        })
    }

    fn summary(&self) -> Option<FlockSummary> {
        Some(FlockSummary {
            name: self.name.clone(),
            members: self.flock.len(),
            centroid: self.flock.try_centroid().map(Position::from),
            span: self.flock.span(),
        })
    }
}

/// Static scene object with no physics, drawn as a small square
pub struct Marker {
    name: String,
    position: Position,
}

impl Marker {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

impl Render for Marker {
    fn render(&self, sink: &mut dyn FnMut(Drawable)) {
        sink(Drawable::Square {
            center: self.position,
            size: MARKER_SIZE,
        });
    }
}

impl SceneObject for Marker {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered collection of scene objects
pub struct Scene {
    name: String,
    objects: Vec<Box<dyn SceneObject>>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
        }
    }

    /// Spawn every configured flock and marker.
    ///
    /// Spawn positions come from a `StdRng` seeded with `config.seed`, and
    /// each flock gets its own seeded tie-break source, so equal configs
    /// produce equal runs.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let mut scene = Scene::new("simulation");
        let mut spawner = StdRng::seed_from_u64(config.seed);

        for (index, flock_config) in config.flocks.iter().enumerate() {
            let tie_break = SimpleRng::new(
                fold_seed(config.seed) ^ (index as u32 + 1).wrapping_mul(0x9e37_79b9),
            );
            let mut flock = Flock::with_rng(config.bounds, tie_break).with_settings(config.steering);
            flock.set_target(flock_config.target);

            let region = flock_config.spawn.unwrap_or(config.bounds);
            for _ in 0..flock_config.count {
                let boid = Boid::random_with(&mut spawner, &region, flock_config.kind);
                if flock.add_boid(boid).is_err() {
                    bail!(
                        "Flock '{}' is full after {} boids",
                        flock_config.name,
                        flock.len()
                    );
                }
            }

            log::info!(
                "Spawned flock '{}' with {} {:?} boids",
                flock_config.name,
                flock.len(),
                flock_config.kind
            );
            scene.add_object(Box::new(FlockEntity::new(flock_config.name.clone(), flock)));
        }

        for (index, position) in config.markers.iter().enumerate() {
            scene.add_object(Box::new(Marker::new(format!("marker-{}", index), *position)));
        }

        Ok(scene)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_object(&mut self, object: Box<dyn SceneObject>) {
        log::debug!("Scene '{}': added '{}'", self.name, object.name());
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Box<dyn SceneObject>] {
        &self.objects
    }

    /// Advance every simulated object; returns how many were advanced
    pub fn update_simulation(&mut self, dt: f32) -> usize {
        let mut updated = 0;
        for object in &mut self.objects {
            if let Some(simulated) = object.as_simulated() {
                simulated.update(dt);
                updated += 1;
            }
        }
        updated
    }

    /// Drawables of all objects, in scene order
    pub fn render(&self) -> Vec<Drawable> {
        let mut drawables = Vec::new();
        for object in &self.objects {
            object.render(&mut |drawable| drawables.push(drawable));
        }
        drawables
    }

    pub fn frame(&self, tick: u64, time: f32) -> FrameReport {
        FrameReport {
            tick,
            time,
            flocks: self.objects.iter().filter_map(|object| object.frame()).collect(),
            drawables: self.render(),
        }
    }

    pub fn summaries(&self) -> Vec<FlockSummary> {
        self.objects
            .iter()
            .filter_map(|object| object.summary())
            .collect()
    }
}

/// Fold a 64-bit seed into 32 bits without dropping the upper half
pub fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use boid_core::{ArenaBounds, BoidKind, Vector2D};

    #[test]
    fn test_markers_are_not_simulated() {
        let mut scene = Scene::new("markers");
        scene.add_object(Box::new(Marker::new("a", Position::new(1.0, 2.0))));
        assert_eq!(scene.update_simulation(0.1), 0);
        assert_eq!(
            scene.render(),
            vec![Drawable::Square {
                center: Position::new(1.0, 2.0),
                size: MARKER_SIZE,
            }]
        );
        assert!(scene.summaries().is_empty());
    }

    #[test]
    fn test_flock_entity_is_simulated() {
        let mut flock = Flock::new(ArenaBounds::new(-100.0, -100.0, 100.0, 100.0));
        flock
            .add_boid(Boid::new(Vector2D::zero(), 90.0, BoidKind::Standard))
            .unwrap();

        let mut scene = Scene::new("one flock");
        scene.add_object(Box::new(FlockEntity::new("birds", flock)));
        scene.add_object(Box::new(Marker::new("post", Position::new(0.0, 0.0))));

        assert_eq!(scene.update_simulation(1.0), 1);

        let frame = scene.frame(1, 1.0);
        assert_eq!(frame.flocks.len(), 1);
        assert_eq!(frame.flocks[0].name, "birds");
        let moved = frame.flocks[0].boids[0].position;
        assert!((moved.x - 35.0).abs() < 1e-3);
        assert_eq!(frame.drawables.len(), 2);
    }

    #[test]
    fn test_fold_seed_keeps_upper_bits() {
        assert_eq!(fold_seed(7), 7);
        // only the high word differs
        assert_ne!(fold_seed(7), fold_seed(7 | (1 << 40)));
        assert_ne!(fold_seed(1 << 32), fold_seed(1 << 33));
    }

    #[test]
    fn test_from_config_spawns_inside_region() {
        let mut config = SimulationConfig::default();
        config.flocks[0].count = 20;
        config.flocks[0].spawn = Some(ArenaBounds::new(200.0, 200.0, 300.0, 250.0));
        config.markers.push(Position::new(5.0, 5.0));

        let scene = Scene::from_config(&config).unwrap();
        assert_eq!(scene.objects().len(), 2);

        let summaries = scene.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].members, 20);

        let frame = scene.frame(0, 0.0);
        let region = config.flocks[0].spawn.unwrap();
        assert!(frame.flocks[0]
            .boids
            .iter()
            .all(|boid| region.contains(&boid.position)));
    }
}
