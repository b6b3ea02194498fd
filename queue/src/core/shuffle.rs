//! Uniform permutation of a slice

use rand::Rng;

/// In-place Fisher–Yates: walk down from the last slot, swapping each with a
/// uniformly chosen slot at or below it. Every permutation is equally likely
/// given a uniform `rng`.
pub fn fisher_yates<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Lehmer-code rank of `permutation` relative to `original`, in `0..n!`.
/// Returns `None` if `permutation` is not a rearrangement of `original`.
pub fn permutation_rank<T: PartialEq>(original: &[T], permutation: &[T]) -> Option<usize> {
    if original.len() != permutation.len() {
        return None;
    }

    let mut remaining: Vec<usize> = (0..original.len()).collect();
    let mut rank = 0;

    for item in permutation {
        let position = remaining.iter().position(|&index| original[index] == *item)?;
        rank = rank * remaining.len() + position;
        remaining.remove(position);
    }

    Some(rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);

        let mut empty: Vec<u8> = vec![];
        fisher_yates(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec!["only"];
        fisher_yates(&mut single, &mut rng);
        assert_eq!(single, vec!["only"]);
    }

    #[test]
    fn test_shuffle_keeps_every_element() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items: Vec<u32> = (0..50).collect();
        fisher_yates(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_permutation_rank() {
        let original = ["a", "b", "c"];
        assert_eq!(permutation_rank(&original, &["a", "b", "c"]), Some(0));
        assert_eq!(permutation_rank(&original, &["c", "b", "a"]), Some(5));
        assert_eq!(permutation_rank(&original, &["a", "c"]), None);
        assert_eq!(permutation_rank(&original, &["a", "b", "d"]), None);
    }

    #[test]
    fn test_shuffle_is_uniform_over_three_items() {
        const TRIALS: usize = 60_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let original = ['a', 'b', 'c'];
        let mut counts = [0usize; 6];

        for _ in 0..TRIALS {
            let mut items = original;
            fisher_yates(&mut items, &mut rng);
            counts[permutation_rank(&original, &items).unwrap()] += 1;
        }

        // Expected 10_000 each; standard deviation is about 91
        for (rank, count) in counts.iter().enumerate() {
            assert!(
                (9_400..=10_600).contains(count),
                "permutation {rank} appeared {count} times: {counts:?}"
            );
        }
    }
}
