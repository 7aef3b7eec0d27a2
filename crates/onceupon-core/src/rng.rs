//! Deterministic random number generator
//!
//! xorshift64, so a given seed yields the same sequence on every platform.
//! Used to pick check-in codes, to fail simulated purchases at a fixed
//! rate, and in tests that sample answer sets.

/// A small deterministic random number generator
#[derive(Debug, Clone)]
pub struct CodeRng {
    state: u64,
}

impl CodeRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift requires a non-zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// A value in `0..n`; `n` must be non-zero
    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// True with probability `percent`/100
    pub fn chance(&mut self, percent: u8) -> bool {
        percent > 0 && self.below(100) < u64::from(percent)
    }

    /// Shuffle a slice in place (Fisher-Yates)
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.below(i as u64 + 1) as usize;
            slice.swap(i, j);
        }
    }

    /// Pick a random element from a slice
    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        let i = self.below(slice.len() as u64) as usize;
        slice.get(i)
    }
}

impl Default for CodeRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = CodeRng::new(42);
        let mut rng2 = CodeRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = CodeRng::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_pick() {
        let mut rng = CodeRng::new(42);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());

        let codes = ["a", "b", "c"];
        for _ in 0..50 {
            assert!(codes.contains(rng.pick(&codes).unwrap()));
        }
    }

    #[test]
    fn test_chance_bounds() {
        let mut rng = CodeRng::new(42);
        assert!((0..200).all(|_| !rng.chance(0)));
        assert!((0..200).all(|_| rng.chance(100)));
        let hits = (0..1000).filter(|_| rng.chance(30)).count();
        assert!((200..400).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = CodeRng::new(42);
        let original = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut shuffled = original.clone();
        rng.shuffle(&mut shuffled);

        let mut sorted = shuffled.clone();
        sorted.sort();
        assert_eq!(sorted, original);
        assert_ne!(shuffled, original);
    }
}
