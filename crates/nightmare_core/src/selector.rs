//! Weighted random choice over a small candidate set.

use rand::Rng;

use crate::error::SelectError;

/// Picks one of `items`, each with probability proportional to its weight.
///
/// An all-zero weight vector selects the first item. Zero-weight items are
/// never chosen otherwise: an item wins when its cumulative weight strictly
/// exceeds the draw.
pub fn weighted_random<'a, T>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut impl Rng,
) -> Result<&'a T, SelectError> {
    if items.is_empty() {
        return Err(SelectError::Empty);
    }
    if items.len() != weights.len() {
        return Err(SelectError::LengthMismatch {
            items: items.len(),
            weights: weights.len(),
        });
    }
    if let Some((index, &weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(SelectError::InvalidWeight { index, weight });
    }

    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return Ok(&items[0]);
    }

    let mut remaining = rng.random::<f64>() * total;
    let mut last_positive = 0;
    for (index, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        last_positive = index;
        remaining -= weight;
        if remaining < 0.0 {
            return Ok(&items[index]);
        }
    }

    // float drift left a remainder after the full walk
    Ok(&items[last_positive])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const ITEMS: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn test_all_zero_weights_fall_back_to_first() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            assert_eq!(
                weighted_random(&ITEMS, &[0.0, 0.0, 0.0], &mut rng),
                Ok(&"a")
            );
        }
    }

    #[test]
    fn test_single_positive_weight_always_wins() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..500 {
            assert_eq!(weighted_random(&ITEMS, &[1.0, 0.0, 0.0], &mut rng), Ok(&"a"));
            assert_eq!(weighted_random(&ITEMS, &[0.0, 1.0, 0.0], &mut rng), Ok(&"b"));
            assert_eq!(weighted_random(&ITEMS, &[0.0, 0.0, 3.0], &mut rng), Ok(&"c"));
        }
    }

    #[test]
    fn test_distribution_follows_weights() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut counts = [0usize; 3];
        for _ in 0..10_000 {
            let item = weighted_random(&[0usize, 1, 2], &[0.0, 90.0, 10.0], &mut rng)
                .copied()
                .unwrap_or(0);
            counts[item] += 1;
        }
        assert_eq!(counts[0], 0);
        assert!(counts[1] > 8_500, "counts: {counts:?}");
        assert!(counts[2] > 700, "counts: {counts:?}");
    }

    #[test]
    fn test_precondition_errors() {
        let mut rng = StdRng::seed_from_u64(4);
        let empty: [&str; 0] = [];
        assert_eq!(
            weighted_random(&empty, &[], &mut rng),
            Err(SelectError::Empty)
        );
        assert_eq!(
            weighted_random(&ITEMS, &[1.0], &mut rng),
            Err(SelectError::LengthMismatch {
                items: 3,
                weights: 1
            })
        );
        assert_eq!(
            weighted_random(&ITEMS, &[1.0, -2.0, 0.0], &mut rng),
            Err(SelectError::InvalidWeight {
                index: 1,
                weight: -2.0
            })
        );
    }
}
