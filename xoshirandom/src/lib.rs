//! Seedable xoshiro256++ PRNG.
//!
//! Reference: https://prng.di.unimi.it/
//!
//! Two components of the workspace need a random stream that is fully
//! reproducible from a small seed: the Zobrist key tables (two tile sets,
//! or two boards, must draw *identical* key tables whenever they are seeded
//! identically, so that their hashes are cross-comparable) and the random
//! tile dealer in the CLI. The standard library deliberately offers no
//! seedable generator, so this crate carries one.

/// Fast, high-quality PRNG using the xoshiro256++ algorithm.
///
/// Period 2^256 - 1; passes BigCrush and PractRand. Not cryptographic.
#[derive(Clone, Debug)]
pub struct Xoshiro256PlusPlus {
    s: [u64; 4],
}

impl Xoshiro256PlusPlus {
    /// Create a new RNG seeded from a u64.
    ///
    /// Uses SplitMix64 to expand the seed into the full 256-bit state,
    /// as recommended by the xoshiro authors. Distinct seeds yield
    /// distinct, well-mixed states even for small consecutive seeds.
    pub fn seed_from_u64(seed: u64) -> Self {
        let mut z = seed;
        let mut state = [0u64; 4];
        for s in &mut state {
            z = z.wrapping_add(0x9e3779b97f4a7c15);
            let mut x = z;
            x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
            *s = x ^ (x >> 31);
        }
        Self { s: state }
    }

    /// Generate the next u64 value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a random u32 (uses upper bits of u64 for better quality).
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate a random index in range [0, n) without modulo bias.
    #[inline]
    pub fn next_index(&mut self, n: u32) -> u32 {
        if n.is_power_of_two() {
            return self.next_u32() & (n - 1);
        }

        // Lemire's nearly divisionless method
        let mut x = self.next_u32();
        let mut m = (x as u64) * (n as u64);
        let mut l = m as u32;

        if l < n {
            let t = n.wrapping_neg() % n;
            while l < t {
                x = self.next_u32();
                m = (x as u64) * (n as u64);
                l = m as u32;
            }
        }

        (m >> 32) as u32
    }

    /// Fill a slice with random u64 values. Convenience for building
    /// Zobrist key tables.
    pub fn fill_u64(&mut self, table: &mut [u64]) {
        for slot in table {
            *slot = self.next_u64();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Xoshiro256PlusPlus::seed_from_u64(0);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(1);
        // Mixing via SplitMix64 means even adjacent seeds differ immediately.
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_index_in_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for n in 1..50u32 {
            for _ in 0..100 {
                assert!(rng.next_index(n) < n);
            }
        }
    }

    #[test]
    fn next_index_covers_all_values() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(123);
        let mut seen = [false; 7];
        for _ in 0..1000 {
            seen[rng.next_index(7) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn fill_u64_fills_every_slot() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
        let mut table = [0u64; 28];
        rng.fill_u64(&mut table);
        // All-zero slots after filling would be astronomically unlikely.
        assert!(table.iter().all(|&k| k != 0));
    }
}
