//! Seeded MT19937 stream.
//!
//! Seeding and every derived draw follow the conventions of the Python `random`
//! module, which earlier releases of this tool were built on. Any change here
//! changes every password ever generated.

use crate::seed::DerivedSeed;
use rand_mt::Mt;
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

const TWO_POW_26: f64 = 67_108_864.0;
const TWO_POW_53: f64 = 9_007_199_254_740_992.0;

pub struct SeededRng {
    mt: Mt,
}

impl SeededRng {
    pub fn from_seed(seed: &DerivedSeed) -> Self {
        Self::from_text(seed.as_str())
    }

    /// Seeds from `text ‖ SHA-512(text)` taken as one big-endian integer.
    pub fn from_text(text: &str) -> Self {
        let mut material = Zeroizing::new(text.as_bytes().to_vec());
        material.extend_from_slice(&Sha512::digest(text.as_bytes()));

        let key = key_words(&material);
        Self {
            mt: Mt::new_with_key(key.iter().copied()),
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.mt.next_u32()
    }

    /// Uniform float in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        let a = self.next_u32() >> 5;
        let b = self.next_u32() >> 6;
        (f64::from(a) * TWO_POW_26 + f64::from(b)) * (1.0 / TWO_POW_53)
    }

    /// Returns `k` random bits, `1 <= k <= 64`.
    pub fn bits(&mut self, k: u32) -> u64 {
        debug_assert!((1..=64).contains(&k));

        if k <= 32 {
            return u64::from(self.next_u32() >> (32 - k));
        }

        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32() >> (64 - k));
        (high << 32) | low
    }

    /// Unbiased integer in `[0, n)` by rejection sampling.
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);

        let n = n as u64;
        let k = u64::BITS - n.leading_zeros();

        loop {
            let r = self.bits(k);
            if r < n {
                return r as usize;
            }
        }
    }

    pub fn choice_index(&mut self, len: usize) -> usize {
        (self.next_f64() * len as f64) as usize
    }

    /// Fisher-Yates, last position first.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

/// Splits a big-endian integer into 32-bit words, least significant first.
fn key_words(material: &[u8]) -> Zeroizing<Vec<u32>> {
    let mut words: Vec<u32> = material
        .rchunks(4)
        .map(|chunk| chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
        .collect();

    while words.len() > 1 && words.last() == Some(&0) {
        words.pop();
    }
    if words.is_empty() {
        words.push(0);
    }

    Zeroizing::new(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::derive_seed;

    const SEED: &str = "210b39c1c6767072c5b764e9a0fbf22239ee19193875cb3429b8329dc299b656";

    #[test]
    fn test_key_words_order() {
        let words = key_words(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(*words, vec![0x0304_0506, 0x0102]);
    }

    #[test]
    fn test_key_words_strips_leading_zeros() {
        let words = key_words(&[0, 0, 0, 0, 0, 0, 0, 9]);
        assert_eq!(*words, vec![9]);

        let words = key_words(&[0, 0, 0, 0]);
        assert_eq!(*words, vec![0]);
    }

    #[test]
    fn test_key_length_for_hex_seed() {
        let mut material = SEED.as_bytes().to_vec();
        material.extend_from_slice(&Sha512::digest(SEED.as_bytes()));
        assert_eq!(key_words(&material).len(), 32);
    }

    #[test]
    fn test_regression_first_outputs() {
        let mut rng = SeededRng::from_text(SEED);
        assert_eq!(rng.next_u32(), 1_008_355_268);
        assert_eq!(rng.next_u32(), 1_010_634_500);
        assert_eq!(rng.next_u32(), 2_615_564_589);
    }

    #[test]
    fn test_from_seed_matches_from_text() {
        let seed = derive_seed("github", "correct horse", 0);
        let mut rng1 = SeededRng::from_seed(&seed);
        let mut rng2 = SeededRng::from_text(SEED);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_regression_empty_text() {
        let mut rng = SeededRng::from_text("");
        assert_eq!(rng.next_u32(), 4_124_137_760);
    }

    #[test]
    fn test_regression_next_f64() {
        let mut rng = SeededRng::from_text(SEED);
        assert_eq!(rng.next_f64(), 0.23477600690205902);
    }

    #[test]
    fn test_regression_bits() {
        let mut rng = SeededRng::from_text(SEED);
        assert_eq!(rng.bits(8), 60);
        assert_eq!(rng.bits(40), 666_730_565_380);
        assert_eq!(rng.bits(64), 10_008_018_515_909_181_134);
    }

    #[test]
    fn test_regression_below() {
        let mut rng = SeededRng::from_text(SEED);
        let draws: Vec<usize> = (0..5).map(|_| rng.below(7)).collect();
        assert_eq!(draws, vec![1, 1, 4, 6, 4]);
    }

    #[test]
    fn test_regression_choice_index() {
        let mut rng = SeededRng::from_text(SEED);
        let draws: Vec<usize> = (0..5).map(|_| rng.choice_index(26)).collect();
        assert_eq!(draws, vec![6, 15, 14, 15, 11]);
    }

    #[test]
    fn test_regression_shuffle() {
        let mut rng = SeededRng::from_text(SEED);
        let mut items: Vec<u32> = (0..10).collect();
        rng.shuffle(&mut items);
        assert_eq!(items, vec![6, 0, 2, 5, 8, 1, 7, 4, 9, 3]);
    }

    #[test]
    fn test_shuffle_short_slices() {
        let mut rng = SeededRng::from_text(SEED);

        let mut empty: Vec<u8> = vec![];
        rng.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![b'x'];
        rng.shuffle(&mut single);
        assert_eq!(single, vec![b'x']);
    }

    #[test]
    fn test_below_range() {
        let mut rng = SeededRng::from_text("range");
        for n in 1..100 {
            for _ in 0..20 {
                assert!(rng.below(n) < n);
            }
        }
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = SeededRng::from_text("range");
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_independent_instances() {
        let mut rng1 = SeededRng::from_text(SEED);
        let mut rng2 = SeededRng::from_text(SEED);

        let _ = rng1.next_u32();
        let _ = rng1.next_u32();

        let mut rng3 = SeededRng::from_text(SEED);
        assert_eq!(rng2.next_u32(), rng3.next_u32());
    }
}
