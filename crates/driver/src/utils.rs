use crate::{types::Shard, CandidateOrder, CandidateSource};
use betting_game_solvers::elimination::{Triple, Value};
use std::ops::Range;

/// Splits `0..len` into at most `parts` contiguous, non-empty, ascending ranges.
///
/// # Arguments
/// * `len` - The number of items to split.
/// * `parts` - The maximum number of ranges. Must be non-zero.
///
/// # Returns
/// * `Vec<Range<usize>>` - Ranges covering `0..len` exactly once.
pub(crate) fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let chunk = (len + parts - 1) / parts;
    (0..len)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(len))
        .collect()
}

/// Builds one [Shard] per worker for the given candidate source.
pub(crate) fn shards(source: &CandidateSource, bound: Value, workers: usize) -> Vec<Shard> {
    match source {
        CandidateSource::Enumerate(order) => partition(bound as usize, workers)
            .into_iter()
            .map(|r| Shard::Rows {
                p1: (r.start as Value + 1)..(r.end as Value + 1),
                bound,
                order: *order,
            })
            .collect(),
        CandidateSource::Explicit(triples) => partition(triples.len(), workers)
            .into_iter()
            .map(|r| Shard::Explicit(triples[r].to_vec()))
            .collect(),
    }
}

/// Enumerates every candidate with leading amount `p1`, in ascending order.
pub(crate) fn row(p1: Value, bound: Value, order: CandidateOrder) -> impl Iterator<Item = Triple> {
    let start = match order {
        CandidateOrder::Unordered => 1,
        CandidateOrder::NonDecreasing => p1,
    };
    (start..=bound).flat_map(move |p2| {
        let start = match order {
            CandidateOrder::Unordered => 1,
            CandidateOrder::NonDecreasing => p2,
        };
        (start..=bound).map(move |p3| Triple::new(p1, p2, p3))
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partition_covers_once() {
        for len in 0..40 {
            for parts in 1..10 {
                let ranges = partition(len, parts);
                assert!(ranges.len() <= parts);
                let flat: Vec<usize> = ranges.iter().flat_map(|r| r.clone()).collect();
                assert_eq!(flat, (0..len).collect::<Vec<_>>());
                assert!(ranges.iter().all(|r| !r.is_empty()));
            }
        }
    }

    #[test]
    fn partition_like_eight_workers_over_255() {
        let ranges = partition(255, 8);
        assert_eq!(ranges.len(), 8);
        assert_eq!(ranges[0], 0..32);
        assert_eq!(ranges[7], 224..255);
    }

    #[test]
    fn rows_are_one_based() {
        let shards = shards(&CandidateSource::default(), 10, 3);
        assert_eq!(
            shards[0],
            Shard::Rows {
                p1: 1..5,
                bound: 10,
                order: CandidateOrder::Unordered
            }
        );
        match &shards[2] {
            Shard::Rows { p1, .. } => assert_eq!(*p1, 9..11),
            other => panic!("unexpected shard {:?}", other),
        }
    }

    #[test]
    fn row_sizes() {
        assert_eq!(row(3, 5, CandidateOrder::Unordered).count(), 25);
        // p2 in 3..=5, p3 in p2..=5: 3 + 2 + 1
        assert_eq!(row(3, 5, CandidateOrder::NonDecreasing).count(), 6);
        assert!(row(3, 5, CandidateOrder::NonDecreasing)
            .all(|t| t.0[0] <= t.0[1] && t.0[1] <= t.0[2]));
    }

    #[test]
    fn explicit_shards_keep_order() {
        let triples: Vec<Triple> = (1..=5).map(|v| Triple::new(v, v, v)).collect();
        let shards = shards(&CandidateSource::Explicit(triples.clone()), 255, 2);
        assert_eq!(
            shards,
            vec![
                Shard::Explicit(triples[0..3].to_vec()),
                Shard::Explicit(triples[3..5].to_vec())
            ]
        );
    }
}
