use boid_shared::{ArenaBounds, BoidSnapshot, Drawable, Position, SteeringSettings};

use crate::boid::{Boid, BoidId, BoidUpdate};
use crate::rng::{RandomSource, SimpleRng};
use crate::vector::normalize_angle;
use crate::{Render, Simulated, Vector2D};

/// Members a [`Flock`] holds unless another capacity is requested
pub const DEFAULT_CAPACITY: usize = 256;

/// Read-only view of a flock as it was at the start of a tick.
///
/// All neighbour queries go through this type so that every boid in a tick
/// sees the same state, whatever order the boids are planned in.
#[derive(Debug, Clone, Copy)]
pub struct FlockView<'a> {
    pub members: &'a [Boid],
    pub target: Option<Vector2D>,
    pub bounds: &'a ArenaBounds,
    pub settings: &'a SteeringSettings,
    /// Drawn once per tick; every tie-break in the tick derives from it
    pub tick_seed: u32,
}

impl<'a> FlockView<'a> {
    /// Mean member position.
    ///
    /// # Panics
    ///
    /// Panics if the flock is empty: there is no meaningful centre to
    /// return. Use [`FlockView::try_centroid`] when membership may be empty.
    pub fn centroid(&self) -> Vector2D {
        match self.try_centroid() {
            Some(centroid) => centroid,
            None => panic!("centroid of an empty flock"),
        }
    }

    pub fn try_centroid(&self) -> Option<Vector2D> {
        if self.members.is_empty() {
            return None;
        }
        let mut sum = Vector2D::zero();
        for boid in self.members {
            sum += boid.position;
        }
        Some(sum / self.members.len() as f32)
    }

    /// Mean forward vector, pulled toward the target when one is set.
    ///
    /// The result is not normalized and may be zero when headings cancel.
    ///
    /// # Panics
    ///
    /// Panics if the flock is empty.
    pub fn average_heading(&self) -> Vector2D {
        assert!(!self.members.is_empty(), "average heading of an empty flock");

        let mut sum = Vector2D::zero();
        for boid in self.members {
            sum += boid.forward();
        }
        let mean = sum / self.members.len() as f32;

        match self.target {
            Some(target) => {
                let bias = self.settings.target_bias;
                let toward = (target - self.centroid()).normalize();
                mean * (1.0 - bias) + toward * bias
            }
            None => mean,
        }
    }

    /// Combined unit push away from every other member inside `boid`'s avoid radius.
    ///
    /// Members sitting exactly on `boid` push from a random direction picked
    /// by [`FlockView::tie_break`]. Returns `None` if nobody is in range or
    /// the pushes cancel.
    pub fn neighbor_repulsion(&self, boid: &Boid) -> Option<Vector2D> {
        let radius = boid.tuning.avoid_radius;
        let slot = self.slot_of(boid);
        let mut total = Vector2D::zero();
        let mut count = 0;

        for (index, other) in self.members.iter().enumerate() {
            if is_same_boid(other, boid) {
                continue;
            }
            let distance = boid.position.distance(&other.position);
            if distance >= radius {
                continue;
            }
            if distance > 0.0 {
                total += (boid.position - other.position) / distance;
            } else {
                total += Vector2D::from_heading(self.tie_break(slot, index as u32));
            }
            count += 1;
        }

        if count == 0 {
            return None;
        }
        let push = total.normalize();
        if push.is_zero() {
            None
        } else {
            Some(push)
        }
    }

    /// True if any other member is strictly closer than `range`
    pub fn has_neighbor_within(&self, boid: &Boid, range: f32) -> bool {
        self.others(boid)
            .any(|other| boid.position.distance(&other.position) < range)
    }

    /// Largest distance between any two members; 0 with fewer than two
    pub fn span(&self) -> f32 {
        let mut max_span = 0.0f32;
        for (i, boid) in self.members.iter().enumerate() {
            for other in &self.members[i + 1..] {
                max_span = max_span.max(boid.position.distance(&other.position));
            }
        }
        max_span
    }

    /// Direction in degrees that member `slot` is pushed from a coincident member `other`.
    ///
    /// Depends only on the tick seed and the pair, so it is the same whatever
    /// order members are planned in. The two members of a pair get opposite
    /// directions.
    pub fn tie_break(&self, slot: u32, other: u32) -> f32 {
        let (low, high) = if slot <= other { (slot, other) } else { (other, slot) };
        let angle = SimpleRng::new(pair_seed(self.tick_seed, low, high)).next_angle();
        if slot <= other {
            angle
        } else {
            normalize_angle(angle + 180.0)
        }
    }

    // boids that are not members get a slot past the end
    fn slot_of(&self, boid: &Boid) -> u32 {
        self.members
            .iter()
            .position(|member| is_same_boid(member, boid))
            .unwrap_or(self.members.len()) as u32
    }

    fn others<'b>(&'b self, boid: &'b Boid) -> impl Iterator<Item = &'a Boid> + 'b {
        self.members.iter().filter(move |other| !is_same_boid(other, boid))
    }
}

fn pair_seed(tick_seed: u32, low: u32, high: u32) -> u32 {
    let mut hash = tick_seed ^ low.wrapping_mul(0x9e37_79b9) ^ high.wrapping_mul(0x85eb_ca6b);
    hash ^= hash >> 16;
    hash = hash.wrapping_mul(0x7feb_352d);
    hash ^= hash >> 15;
    hash
}

fn is_same_boid(a: &Boid, b: &Boid) -> bool {
    core::ptr::eq(a, b) || (a.id().is_some() && a.id() == b.id())
}

/// A group of boids sharing aggregate behaviour.
///
/// The flock owns its members; boids refer back to it only through their
/// [`BoidId`]. Storage is a fixed-capacity `heapless::Vec`, so the same type
/// works without an allocator.
pub struct Flock<R = SimpleRng, const N: usize = DEFAULT_CAPACITY> {
    boids: heapless::Vec<Boid, N>,
    target: Option<Vector2D>,
    bounds: ArenaBounds,
    settings: SteeringSettings,
    rng: R,
    tick_seed: u32,
    next_id: u32,
}

impl Flock {
    /// Empty flock with default steering and a fixed-seed tie-break source
    pub fn new(bounds: ArenaBounds) -> Self {
        Self::with_rng(bounds, SimpleRng::default())
    }
}

impl<R: RandomSource> Flock<R> {
    pub fn with_rng(bounds: ArenaBounds, rng: R) -> Self {
        Self::from_parts(bounds, SteeringSettings::default(), rng)
    }
}

impl<R: RandomSource, const N: usize> Flock<R, N> {
    pub fn from_parts(bounds: ArenaBounds, settings: SteeringSettings, rng: R) -> Self {
        Self {
            boids: heapless::Vec::new(),
            target: None,
            bounds,
            settings,
            rng,
            tick_seed: 0,
            next_id: 0,
        }
    }

    pub fn with_settings(mut self, settings: SteeringSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn bounds(&self) -> &ArenaBounds {
        &self.bounds
    }

    pub fn settings(&self) -> &SteeringSettings {
        &self.settings
    }

    pub fn target(&self) -> Option<Vector2D> {
        self.target
    }

    /// Point the flock's average heading is biased toward; `None` for free flight
    pub fn set_target(&mut self, target: Option<Position>) {
        self.target = target.map(Vector2D::from);
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Members in insertion order
    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn get(&self, id: BoidId) -> Option<&Boid> {
        self.index_of(id).map(|index| &self.boids[index])
    }

    /// Add a boid and give it a fresh id.
    ///
    /// When the flock is full the boid is handed back, detached.
    pub fn add_boid(&mut self, mut boid: Boid) -> Result<BoidId, Boid> {
        let id = BoidId(self.next_id);
        boid.set_member(Some(id));
        match self.boids.push(boid) {
            Ok(()) => {
                self.next_id += 1;
                Ok(id)
            }
            Err(mut boid) => {
                log::debug!("flock full at {} boids, rejecting new member", N);
                boid.set_member(None);
                Err(boid)
            }
        }
    }

    /// Take a boid out of the flock, keeping the order of the rest
    pub fn remove_boid(&mut self, id: BoidId) -> Option<Boid> {
        let index = self.index_of(id)?;
        self.boids[index..].rotate_left(1);
        let mut boid = self.boids.pop()?;
        boid.set_member(None);
        Some(boid)
    }

    pub fn view(&self) -> FlockView<'_> {
        FlockView {
            members: &self.boids,
            target: self.target,
            bounds: &self.bounds,
            settings: &self.settings,
            tick_seed: self.tick_seed,
        }
    }

    /// See [`FlockView::centroid`]; panics on an empty flock
    pub fn centroid(&self) -> Vector2D {
        self.view().centroid()
    }

    pub fn try_centroid(&self) -> Option<Vector2D> {
        self.view().try_centroid()
    }

    /// See [`FlockView::average_heading`]; panics on an empty flock
    pub fn average_heading(&self) -> Vector2D {
        self.view().average_heading()
    }

    pub fn span(&self) -> f32 {
        self.view().span()
    }

    /// Repulsion acting on member `id` under the current tick seed
    pub fn neighbor_repulsion(&self, id: BoidId) -> Option<Vector2D> {
        let index = self.index_of(id)?;
        let view = self.view();
        view.neighbor_repulsion(&view.members[index])
    }

    /// Draw a fresh tick seed from the flock's random source.
    ///
    /// [`Flock::update`] does this itself; callers driving [`Flock::plan`]
    /// and [`Flock::apply`] by hand call it once before planning a tick.
    pub fn begin_tick(&mut self) {
        self.tick_seed = (self.rng.next_f32() * (1u32 << 24) as f32) as u32;
    }

    /// Compute member `id`'s next state without changing anything
    pub fn plan(&self, id: BoidId, dt: f32) -> Option<BoidUpdate> {
        let index = self.index_of(id)?;
        let view = self.view();
        Some(view.members[index].plan(&view, dt))
    }

    /// Commit an update produced by [`Flock::plan`]; false if `id` is not a member
    pub fn apply(&mut self, id: BoidId, update: BoidUpdate) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.boids[index].apply(update);
                true
            }
            None => false,
        }
    }

    /// Advance every member by `dt` seconds.
    ///
    /// All members are planned against the same snapshot before any of
    /// them moves, so the result does not depend on member order.
    pub fn update(&mut self, dt: f32) {
        self.begin_tick();
        let view = self.view();
        // at most N members, so the collect never overflows
        let plans: heapless::Vec<BoidUpdate, N> = view
            .members
            .iter()
            .map(|boid| boid.plan(&view, dt))
            .collect();

        for (boid, plan) in self.boids.iter_mut().zip(plans) {
            boid.apply(plan);
        }
        log::trace!("flock of {} advanced by {}s", self.boids.len(), dt);
    }

    pub fn snapshots(&self) -> impl Iterator<Item = BoidSnapshot> + '_ {
        self.boids.iter().map(Boid::snapshot)
    }

    fn index_of(&self, id: BoidId) -> Option<usize> {
        self.boids.iter().position(|boid| boid.id() == Some(id))
    }
}

impl<R: RandomSource, const N: usize> Simulated for Flock<R, N> {
    fn update(&mut self, dt: f32) {
        Flock::update(self, dt);
    }
}

impl<R, const N: usize> Render for Flock<R, N> {
    fn render(&self, sink: &mut dyn FnMut(Drawable)) {
        for boid in self.boids.iter() {
            boid.render(sink);
        }
    }
}
