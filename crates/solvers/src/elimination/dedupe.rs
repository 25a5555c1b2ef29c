//! Permutation deduplication for results of an unordered search.

use super::Triple;
use std::collections::HashSet;

/// Canonicalizes every [Triple] and drops repeated canonical forms, keeping first-seen order.
///
/// ### Takes
/// - `triples`: Results in arrival order.
///
/// ### Returns
/// - `Vec<Triple>`: One canonical (ascending) [Triple] per distinct multiset.
pub fn dedupe<I>(triples: I) -> Vec<Triple>
where
    I: IntoIterator<Item = Triple>,
{
    let mut seen = HashSet::new();
    triples
        .into_iter()
        .map(|t| t.canonical())
        .filter(|t| seen.insert(*t))
        .collect()
}

/// Sorts results so that a listing is stable across runs regardless of worker interleaving.
pub fn sort_results(triples: &mut [Triple]) {
    triples.sort();
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn permutations_collapse() {
        let results = vec![
            Triple::new(199, 175, 223),
            Triple::new(175, 223, 199),
            Triple::new(225, 209, 217),
            Triple::new(223, 199, 175),
        ];
        assert_eq!(
            dedupe(results),
            vec![Triple::new(175, 199, 223), Triple::new(209, 217, 225)]
        );
    }

    #[test]
    fn sorted_listing() {
        let mut results = vec![Triple::new(209, 217, 225), Triple::new(175, 199, 223)];
        sort_results(&mut results);
        assert_eq!(results[0], Triple::new(175, 199, 223));
    }

    proptest! {
        #[test]
        fn idempotent_and_unique(raw in proptest::collection::vec((1u32..8, 1u32..8, 1u32..8), 0..64)) {
            let triples: Vec<Triple> = raw.into_iter().map(|(a, b, c)| Triple::new(a, b, c)).collect();
            let once = dedupe(triples.clone());
            let twice = dedupe(once.clone());
            prop_assert_eq!(&once, &twice);
            let unique: HashSet<Triple> = once.iter().map(|t| t.canonical()).collect();
            prop_assert_eq!(unique.len(), once.len());
            for t in &triples {
                prop_assert!(once.contains(&t.canonical()));
            }
        }
    }
}
