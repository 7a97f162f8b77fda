//! Seed-derived noise substrate.
//!
//! Only the permutation table is built today; it is the lookup that gradient
//! noise sampling indexes into, and it is fully determined by the seed.

/// Number of distinct entries in the permutation.
pub const PERMUTATION_SIZE: usize = 256;

/// Deterministic value in `[0, 1)` derived from `seed`.
///
/// Same input, same output: there is no internal state.
pub fn seeded_random(seed: f64) -> f64 {
    let x = seed.sin() * 10000.0;
    x - x.floor()
}

/// Shuffled 0..=255 followed by a copy of itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    entries: [u8; PERMUTATION_SIZE * 2],
}

impl PermutationTable {
    /// Builds the table with a Fisher-Yates shuffle driven by [`seeded_random`].
    pub fn from_seed(seed: f64) -> Self {
        let mut base = [0u8; PERMUTATION_SIZE];
        for (i, slot) in base.iter_mut().enumerate() {
            *slot = i as u8;
        }

        for i in (1..PERMUTATION_SIZE).rev() {
            let draw = seeded_random(seed + i as f64);
            // rounding can push the fractional part to exactly 1.0
            let j = ((draw * (i + 1) as f64).floor() as usize).min(i);
            base.swap(i, j);
        }

        let mut entries = [0u8; PERMUTATION_SIZE * 2];
        entries[..PERMUTATION_SIZE].copy_from_slice(&base);
        entries[PERMUTATION_SIZE..].copy_from_slice(&base);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.entries
    }

    /// Hash lookup for gradient sampling: `get(get(x) + y)` stays in bounds
    /// for any lattice coordinate because the index wraps around the doubled
    /// table.
    pub fn get(&self, index: usize) -> u8 {
        self.entries[index & (PERMUTATION_SIZE * 2 - 1)]
    }
}

/// Noise generator owning its permutation table.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    permutation: PermutationTable,
}

impl PerlinNoise {
    pub fn new(seed: f64) -> Self {
        Self {
            permutation: PermutationTable::from_seed(seed),
        }
    }

    pub fn permutation(&self) -> &PermutationTable {
        &self.permutation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid_table(table: &PermutationTable) {
        assert_eq!(table.len(), 512);
        let mut seen = [false; PERMUTATION_SIZE];
        for &value in &table.as_slice()[..PERMUTATION_SIZE] {
            assert!(!seen[value as usize], "duplicate entry {value}");
            seen[value as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(
            &table.as_slice()[..PERMUTATION_SIZE],
            &table.as_slice()[PERMUTATION_SIZE..]
        );
    }

    #[test]
    fn test_seeded_random_is_pure_and_in_range() {
        for seed in [0.0, 1.0, 42.5, -17.0, 999_999.0] {
            let a = seeded_random(seed);
            assert_eq!(a, seeded_random(seed));
            assert!((0.0..1.0).contains(&a));
        }
        assert_eq!(seeded_random(0.0), 0.0);
    }

    #[test]
    fn test_permutation_table_is_doubled_permutation() {
        for seed in [0.0, 1.0, 12345.678, 999_999.0, -3.5] {
            assert_valid_table(&PermutationTable::from_seed(seed));
        }
    }

    #[test]
    fn test_permutation_table_is_seed_deterministic() {
        let a = PermutationTable::from_seed(4242.0);
        let b = PermutationTable::from_seed(4242.0);
        assert_eq!(a, b);
        let c = PermutationTable::from_seed(4243.5);
        assert_ne!(a, c);
    }

    #[test]
    fn test_permutation_table_actually_shuffles() {
        let table = PermutationTable::from_seed(77.0);
        let identity = (0..PERMUTATION_SIZE).all(|i| table.get(i) as usize == i);
        assert!(!identity);
    }

    #[test]
    fn test_get_wraps_around() {
        let noise = PerlinNoise::new(10.0);
        let table = noise.permutation();
        assert_eq!(table.get(3), table.get(3 + 256));
        assert_eq!(table.get(513), table.get(1));
    }

    #[test]
    fn test_known_seed_produces_known_table() {
        let noise = PerlinNoise::new(1234.0);
        let table = noise.permutation().as_slice();
        assert_eq!(
            &table[..16],
            &[225, 170, 13, 42, 40, 36, 137, 242, 33, 97, 162, 63, 2, 129, 93, 237]
        );
        assert_eq!(&table[250..256], &[183, 153, 71, 44, 64, 89]);
        assert_eq!(&table[256 + 250..], &[183, 153, 71, 44, 64, 89]);
    }
}
