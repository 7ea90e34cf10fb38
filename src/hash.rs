//! Small deterministic hashing and sampling helpers.

/// Fast 2-value hash with xorshift
#[inline(always)]
pub fn hash2(a: u64, b: u64) -> u64 {
    let mut seed = a.wrapping_mul(2654435761).wrapping_add(b.wrapping_mul(2246822519));
    seed ^= seed << 13;
    seed ^= seed >> 7;
    seed ^= seed << 17;
    seed
}

/// Deterministic uniform value in [0, 1) from a seed, via the splitmix64 finalizer
#[inline(always)]
pub fn rand_simple(seed: u64) -> f64 {
    let mut x = seed.wrapping_mul(0x9e3779b97f4a7c15);
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    (x >> 11) as f64 / 9007199254740992.0
}

/// Reproducible stream of uniform samples keyed by (seed, counter)
#[derive(Clone, Debug)]
pub struct SampleStream {
    seed: u64,
    counter: u64,
}

impl SampleStream {
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    /// Next sample in [0, 1)
    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        self.counter = self.counter.wrapping_add(1);
        rand_simple(hash2(self.seed, self.counter))
    }

    /// Next sample in [lo, hi)
    #[inline]
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }

    /// Pick an index below `len` (which must be non-zero)
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64) as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range() {
        let mut s = SampleStream::new(7);
        for _ in 0..10_000 {
            let v = s.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_reproducible() {
        let a: Vec<f64> = {
            let mut s = SampleStream::new(42);
            (0..16).map(|_| s.next_unit()).collect()
        };
        let b: Vec<f64> = {
            let mut s = SampleStream::new(42);
            (0..16).map(|_| s.next_unit()).collect()
        };
        assert_eq!(a, b);
        let mut other = SampleStream::new(43);
        assert_ne!(a[0], other.next_unit());
    }

    #[test]
    fn test_index_in_bounds() {
        let mut s = SampleStream::new(1);
        assert!((0..1000).all(|_| s.next_index(3) < 3));
    }
}
