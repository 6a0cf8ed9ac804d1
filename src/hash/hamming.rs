/// Perceptual fingerprint of one 9x9 pixel block.
///
/// `ordinal` is the 1-based position of the source frame. It is carried
/// along for presentation and persistence but never takes part in
/// [`Fingerprint::distance`] or in hash equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint {
    pub vertical: u64,
    pub horizontal: u64,
    pub ordinal: u32,
}

impl Fingerprint {
    pub fn new(vertical: u64, horizontal: u64, ordinal: u32) -> Self {
        Self {
            vertical,
            horizontal,
            ordinal,
        }
    }

    /// Hamming distance of the vertical hashes plus Hamming distance of the
    /// horizontal hashes, in `0..=128`.
    #[inline]
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        hamming_distance(self.vertical, other.vertical)
            + hamming_distance(self.horizontal, other.horizontal)
    }

    /// The `(vertical, horizontal)` pair, ignoring the ordinal.
    #[inline]
    pub fn hashes(&self) -> (u64, u64) {
        (self.vertical, self.horizontal)
    }

    #[inline]
    pub fn same_hashes(&self, other: &Fingerprint) -> bool {
        self.hashes() == other.hashes()
    }
}

#[inline]
pub fn hamming_distance(hash1: u64, hash2: u64) -> u32 {
    (hash1 ^ hash2).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_fingerprint(rng: &mut StdRng) -> Fingerprint {
        Fingerprint::new(rng.random(), rng.random(), rng.random())
    }

    #[test]
    fn test_distance_bounds() {
        let zero = Fingerprint::new(0, 0, 1);
        let ones = Fingerprint::new(u64::MAX, u64::MAX, 2);
        let half = Fingerprint::new(u64::MAX, 0, 3);

        assert_eq!(zero.distance(&zero), 0);
        assert_eq!(zero.distance(&ones), 128);
        assert_eq!(zero.distance(&half), 64);
        assert_eq!(ones.distance(&half), 64);
    }

    #[test]
    fn test_distance_ignores_ordinal() {
        let a = Fingerprint::new(0xF0, 0x0F, 1);
        let b = Fingerprint::new(0xF0, 0x0F, 900);
        assert_eq!(a.distance(&b), 0);
        assert!(a.same_hashes(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_metric_properties() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let a = random_fingerprint(&mut rng);
            let b = random_fingerprint(&mut rng);
            let c = random_fingerprint(&mut rng);

            assert_eq!(a.distance(&a), 0);
            assert_eq!(a.distance(&b), b.distance(&a));
            assert!(a.distance(&b) + b.distance(&c) >= a.distance(&c));
        }
    }

    #[test]
    fn test_distance_zero_only_for_equal_bits() {
        let a = Fingerprint::new(1, 0, 0);
        let b = Fingerprint::new(0, 1, 0);
        assert_eq!(a.distance(&b), 2);
        assert_eq!(hamming_distance(0b1011, 0b0001), 2);
    }
}
