//! Seeded pseudo-random number generator
//!
//! Every component that needs randomness owns one of these, forked from the
//! run seed, so a simulation is reproducible from `(seed, run_index)` alone.
//! The generator is xorshift64*.

/// Seeded random number generator
///
/// Deterministic: same seed + run index = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte seed and run index
    pub fn new(seed: &[u8; 32], run_index: u32) -> Self {
        let mut state = 0u64;
        for (i, chunk) in seed.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state ^= u64::from_le_bytes(bytes).wrapping_add(i as u64);
        }

        state ^= (run_index as u64).wrapping_mul(0x517cc1b727220a95);
        // xorshift never leaves the all-zero state
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Create an RNG from a plain integer seed (command-line friendly)
    pub fn from_u64(seed: u64, run_index: u32) -> Self {
        let mut bytes = [0u8; 32];
        for (i, chunk) in bytes.chunks_mut(8).enumerate() {
            let word = seed.rotate_left(i as u32 * 16) ^ (i as u64);
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Self::new(&bytes, run_index)
    }

    /// Derive an independent stream, e.g. one per simulation component
    pub fn fork(&self, stream: u32) -> Self {
        let mut new_state = self.state;
        new_state ^= (stream as u64 + 1).wrapping_mul(0x9e3779b97f4a7c15);
        if new_state == 0 {
            new_state = 0x517cc1b727220a95;
        }

        let mut rng = Self { state: new_state };
        rng.next_u64();
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate a value in range [0, max)
    pub fn next_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as usize
    }

    /// Uniform float in [0, 1) with 53 bits of precision
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// True with probability `p`: always false for `p <= 0`, always true for
    /// `p >= 1`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut r1 = SeededRng::new(&[42u8; 32], 0);
        let mut r2 = SeededRng::new(&[42u8; 32], 0);

        for _ in 0..100 {
            assert_eq!(r1.next_u64(), r2.next_u64());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = SeededRng::from_u64(1, 0);
        let mut rng2 = SeededRng::from_u64(2, 0);

        let vals1: Vec<_> = (0..10).map(|_| rng1.next_u64()).collect();
        let vals2: Vec<_> = (0..10).map(|_| rng2.next_u64()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_different_run_index() {
        let mut rng1 = SeededRng::from_u64(42, 0);
        let mut rng2 = SeededRng::from_u64(42, 1);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_forks_are_independent() {
        let root = SeededRng::from_u64(42, 0);
        let mut a = root.fork(1);
        let mut b = root.fork(2);
        let va: Vec<_> = (0..10).map(|_| a.next_u64()).collect();
        let vb: Vec<_> = (0..10).map(|_| b.next_u64()).collect();
        assert_ne!(va, vb);

        // forking does not advance the parent
        let mut again = root.fork(1);
        assert_eq!(again.next_u64(), va[0]);
    }

    #[test]
    fn test_zero_seed_still_moves() {
        let mut rng = SeededRng::new(&[0u8; 32], 0);
        let vals: Vec<_> = (0..4).map(|_| rng.next_u64()).collect();
        assert!(vals.iter().any(|v| *v != 0));
    }

    #[test]
    fn test_next_range() {
        let mut rng = SeededRng::from_u64(42, 0);

        for max in [1usize, 3, 10, 1000] {
            for _ in 0..100 {
                let val = rng.next_range(max);
                assert!(val < max, "next_range({}) returned {}", max, val);
            }
        }

        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_next_range_covers_all_actions() {
        let mut rng = SeededRng::from_u64(7, 0);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[rng.next_range(3)] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_next_f64_unit_interval() {
        let mut rng = SeededRng::from_u64(42, 0);
        let mut total = 0.0;
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
            total += x;
        }
        let mean = total / 10_000.0;
        assert!(mean > 0.45 && mean < 0.55, "mean {} not ~0.5", mean);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = SeededRng::from_u64(42, 0);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
            assert!(!rng.chance(-0.5));
            assert!(rng.chance(2.0));
        }
    }
}
