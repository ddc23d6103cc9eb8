//! Random sources used to break ties between coincident boids.

/// Supplies uniformly distributed floats in `[0, 1)`.
///
/// The flock draws from it only when two boids occupy exactly the same
/// spot, so a seeded source makes whole runs reproducible.
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;

    /// Uniform angle in degrees, `[0, 360)`
    fn next_angle(&mut self) -> f32 {
        self.next_f32() * 360.0
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

/// Simple pseudo-random number generator using LCG (Linear Congruential Generator)
/// This is a basic RNG suitable for embedded systems where we don't need cryptographic quality
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Generate next u32 value
    pub fn next_u32(&mut self) -> u32 {
        // LCG parameters from Numerical Recipes
        const A: u32 = 1664525;
        const C: u32 = 1013904223;

        self.state = self.state.wrapping_mul(A).wrapping_add(C);
        self.state
    }

    /// Generate a float in a specific range
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + RandomSource::next_f32(self) * (max - min)
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(0x5eed)
    }
}

impl RandomSource for SimpleRng {
    fn next_f32(&mut self) -> f32 {
        // top 24 bits fit the f32 mantissa exactly, so the result never rounds up to 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

#[cfg(feature = "std")]
impl RandomSource for rand::rngs::StdRng {
    fn next_f32(&mut self) -> f32 {
        rand::Rng::gen::<f32>(self)
    }
}

#[cfg(feature = "std")]
impl RandomSource for rand::rngs::ThreadRng {
    fn next_f32(&mut self) -> f32 {
        rand::Rng::gen::<f32>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_repeatability() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_f32_range() {
        let mut rng = SimpleRng::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f32();
            assert!((0.0..1.0).contains(&val));
        }
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }

    #[test]
    fn test_angle_range() {
        let mut rng = SimpleRng::default();
        for _ in 0..1000 {
            let angle = rng.next_angle();
            assert!((0.0..360.0).contains(&angle));
        }
    }

    #[test]
    fn test_std_rng_source() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let val = RandomSource::next_f32(&mut rng);
        assert!((0.0..1.0).contains(&val));
    }
}
