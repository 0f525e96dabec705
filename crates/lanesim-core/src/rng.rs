//! Random number generator abstraction for determinism.
//!
//! Production runs use [`MinStdRand`], a Lehmer generator whose state can be
//! jumped forward in O(log z). Tests inject scripted implementations.

/// Abstraction over the shared random stream.
///
/// Every method takes `&mut self`: the stream has exactly one active caller,
/// and the step orchestrator only touches it from its sequential draw phase.
pub trait RandomSource: Send {
    /// Draws a real number in `[0, 1)`.
    fn uniform_real(&mut self) -> f32;

    /// Draws an integer in `[min, max]` inclusive. Bounds are per call.
    fn uniform_int(&mut self, min: i32, max: i32) -> i32;

    /// Advances the stream by `z` draws without producing them.
    fn discard(&mut self, z: u64);

    /// Returns true iff a fresh real draw is below `p`.
    fn flip_coin(&mut self, p: f64) -> bool {
        f64::from(self.uniform_real()) < p
    }
}

const MULTIPLIER: u64 = 48_271;
const MODULUS: u64 = 2_147_483_647;
/// Smallest value the recurrence produces.
const MIN: u64 = 1;
/// Width of the output range, `max - min`.
const SPAN: u64 = MODULUS - 2;

/// The "minimal standard" multiplicative congruential generator,
/// `x' = 48271 * x mod (2^31 - 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinStdRand {
    state: u64,
}

impl MinStdRand {
    /// Seed used when none is supplied.
    pub const DEFAULT_SEED: u64 = 1;

    /// Creates a generator from `seed`. A seed congruent to 0 selects state 1.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let state = seed % MODULUS;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Current internal state.
    #[must_use]
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advances the recurrence once and returns the new state, in
    /// `[1, 2^31 - 2]`.
    pub fn next_raw(&mut self) -> u64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        self.state
    }

    /// Draws an offset in `[0, range]` with rejection, so that every offset
    /// is equally likely.
    fn offset(&mut self, range: u64) -> u64 {
        match range.cmp(&SPAN) {
            std::cmp::Ordering::Less => {
                let buckets = range + 1;
                let scaling = SPAN / buckets;
                let past = buckets * scaling;
                loop {
                    let r = self.next_raw() - MIN;
                    if r < past {
                        return r / scaling;
                    }
                }
            }
            std::cmp::Ordering::Equal => self.next_raw() - MIN,
            std::cmp::Ordering::Greater => {
                let width = SPAN + 1;
                loop {
                    let high = width * self.offset(range / width);
                    let r = high + (self.next_raw() - MIN);
                    if r <= range && r >= high {
                        return r;
                    }
                }
            }
        }
    }
}

impl Default for MinStdRand {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl RandomSource for MinStdRand {
    #[allow(clippy::cast_precision_loss)]
    fn uniform_real(&mut self) -> f32 {
        let r = (self.next_raw() - MIN) as f32 / (SPAN + 1) as f32;
        // f32 rounding can land exactly on 1.0; clamp to the largest value below it.
        if r >= 1.0 { 1.0 - f32::EPSILON / 2.0 } else { r }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "uniform_int called with min > max");
        let range = (i64::from(max) - i64::from(min)).max(0) as u64;
        (i64::from(min) + self.offset(range) as i64) as i32
    }

    fn discard(&mut self, z: u64) {
        self.state = self.state * pow_mod(MULTIPLIER, z, MODULUS) % MODULUS;
    }
}

/// Computes `base^exp mod modulus` by square-and-multiply.
///
/// `modulus` must be below 2^32 so that products fit in a `u64`.
#[must_use]
pub fn pow_mod(base: u64, mut exp: u64, modulus: u64) -> u64 {
    let mut result = 1 % modulus;
    let mut b = base % modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % modulus;
        }
        b = b * b % modulus;
        exp >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- recurrence ---

    #[test]
    fn test_default_seed_first_values() {
        let mut rng = MinStdRand::default();
        assert_eq!(rng.next_raw(), 48_271);
        assert_eq!(rng.next_raw(), 182_605_794);
    }

    #[test]
    fn test_ten_thousandth_value_matches_reference() {
        // Reference value for minstd_rand with the default seed.
        let mut rng = MinStdRand::default();
        for _ in 0..9_999 {
            rng.next_raw();
        }
        assert_eq!(rng.next_raw(), 399_268_537);
    }

    #[test]
    fn test_zero_seed_maps_to_one() {
        assert_eq!(MinStdRand::new(0).state(), 1);
        assert_eq!(MinStdRand::new(MODULUS).state(), 1);
    }

    // --- skip-ahead ---

    #[test]
    fn test_discard_matches_sequential_draws() {
        for seed in [1_u64, 7, 42, 123_456_789, u64::MAX] {
            for z in [0_u64, 1, 2, 3, 17, 1_000, 65_537] {
                let mut stepped = MinStdRand::new(seed);
                for _ in 0..z {
                    stepped.next_raw();
                }
                let mut jumped = MinStdRand::new(seed);
                jumped.discard(z);
                assert_eq!(jumped, stepped, "seed {seed}, z {z}");
            }
        }
    }

    #[test]
    fn test_discard_by_period_is_identity() {
        let mut rng = MinStdRand::new(99);
        rng.discard(MODULUS - 1);
        assert_eq!(rng.state(), 99);
    }

    #[test]
    fn test_pow_mod_small_cases() {
        assert_eq!(pow_mod(2, 10, 1_000), 24);
        assert_eq!(pow_mod(5, 0, 13), 1);
        assert_eq!(pow_mod(7, 1, 1), 0);
    }

    // --- distributions ---

    #[test]
    fn test_uniform_real_stays_in_unit_interval() {
        let mut rng = MinStdRand::new(5);
        for _ in 0..10_000 {
            let r = rng.uniform_real();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn test_uniform_real_consumes_one_draw() {
        let mut a = MinStdRand::new(11);
        let mut b = MinStdRand::new(11);
        a.uniform_real();
        b.next_raw();
        assert_eq!(a, b);
    }

    #[test]
    fn test_flip_coin_degenerate_probabilities() {
        let mut rng = MinStdRand::new(3);
        for _ in 0..1_000 {
            assert!(!rng.flip_coin(0.0));
            assert!(rng.flip_coin(1.0));
        }
    }

    #[test]
    fn test_uniform_int_respects_bounds() {
        let mut rng = MinStdRand::new(8);
        let mut seen = [false; 7];
        for _ in 0..5_000 {
            let x = rng.uniform_int(-3, 3);
            assert!((-3..=3).contains(&x));
            seen[usize::try_from(x + 3).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s), "every value should appear");
    }

    #[test]
    fn test_uniform_int_single_value_range() {
        let mut rng = MinStdRand::new(8);
        assert_eq!(rng.uniform_int(4, 4), 4);
    }

    #[test]
    fn test_uniform_int_wide_range_uses_upscaling() {
        let mut rng = MinStdRand::new(21);
        for _ in 0..1_000 {
            let x = rng.uniform_int(i32::MIN, i32::MAX);
            assert!((i32::MIN..=i32::MAX).contains(&x));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = MinStdRand::new(2024);
        let mut b = MinStdRand::new(2024);
        for _ in 0..100 {
            assert_eq!(a.uniform_int(0, 9), b.uniform_int(0, 9));
            assert_eq!(a.uniform_real().to_bits(), b.uniform_real().to_bits());
        }
    }
}
