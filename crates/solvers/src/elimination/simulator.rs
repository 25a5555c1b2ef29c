//! The simulator module replays a rest sequence against a [Triple].

use super::{pair, Outcome, RestIndex, RestSequence, Triple, TurnPolicy};

/// Plays a single turn in which `rest` sits out.
///
/// ### Takes
/// - `triple`: The amounts held before the turn.
/// - `rest`: The [RestIndex] of the resting player.
///
/// ### Returns
/// - `Some(Triple)`: The amounts after the smaller of the two betting players has doubled.
/// - `None`: The two betting players held equal amounts; the game is over.
#[inline]
pub fn step(mut triple: Triple, rest: RestIndex) -> Option<Triple> {
    let (a, b) = pair(rest);
    let players = &mut triple.0;
    let (winner, loser) = match players[a].cmp(&players[b]) {
        std::cmp::Ordering::Equal => return None,
        std::cmp::Ordering::Less => (a, b),
        std::cmp::Ordering::Greater => (b, a),
    };
    // The loser always holds strictly more than the winner, so neither side can underflow, and
    // the doubled winner stays below the pre-turn total.
    players[loser] -= players[winner];
    players[winner] *= 2;
    Some(triple)
}

/// Replays every turn of `rests` on a private copy of `triple`.
///
/// ### Takes
/// - `triple`: The starting amounts. Never mutated.
/// - `rests`: The resting player for each turn, in order.
///
/// ### Returns
/// - [Outcome::Survived] if no turn tied, otherwise [Outcome::Tied] with the 1-based turn.
pub fn play<I>(triple: Triple, rests: I) -> Outcome
where
    I: IntoIterator<Item = RestIndex>,
{
    let total = triple.sum();
    let mut state = triple;
    for (turn, rest) in (1u32..).zip(rests) {
        match step(state, rest) {
            Some(next) => {
                debug_assert_eq!(next.sum(), total, "money was created or destroyed");
                state = next;
            }
            None => return Outcome::Tied { turn },
        }
    }
    Outcome::Survived
}

/// Returns whether `triple` survives the full `sequence` under the given [TurnPolicy].
pub fn survives(triple: Triple, sequence: &RestSequence, policy: TurnPolicy) -> bool {
    let rests = sequence.as_slice();
    policy.accepts(play(triple, rests.iter().copied()), rests.len())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elimination::generate;
    use proptest::prelude::*;

    #[test]
    fn single_turn_examples() {
        // (1,4,6): 1 beats 4, 4 beats 6, 1 beats 6.
        let start = Triple::new(1, 4, 6);
        assert_eq!(step(start, 2), Some(Triple::new(2, 3, 6)));
        assert_eq!(step(start, 0), Some(Triple::new(1, 8, 2)));
        assert_eq!(step(start, 1), Some(Triple::new(2, 4, 5)));
    }

    #[test]
    fn tie_ends_the_game() {
        assert_eq!(step(Triple::new(1, 1, 6), 2), None);
        assert_eq!(play(Triple::new(1, 1, 6), [2, 0, 0]), Outcome::Tied { turn: 1 });
        // (1,4,6) -> rest 1 -> (2,4,5) -> rest 2 -> (4,2,5) -> rest 0 -> (4,4,3) -> rest 2 ties.
        assert_eq!(play(Triple::new(1, 4, 6), [1, 2, 0, 2]), Outcome::Tied { turn: 4 });
    }

    #[test]
    fn tie_on_first_pair_fails_unless_empty() {
        let triple = Triple::new(5, 5, 9);
        let empty = generate(0, 0).unwrap();
        assert!(survives(triple, &empty, TurnPolicy::Strict));
        for turns in 1..=4 {
            // Seed 2 rests player 2 first, so the equal pair bets on turn one.
            let sequence = generate(turns, 2).unwrap();
            assert!(!survives(triple, &sequence, TurnPolicy::Strict));
        }
    }

    #[test]
    fn final_turn_tie_policy() {
        let triple = Triple::new(1, 1, 6);
        let sequence = generate(1, 2).unwrap();
        assert!(!survives(triple, &sequence, TurnPolicy::Strict));
        assert!(survives(triple, &sequence, TurnPolicy::FinalTurnTie));
        let longer = generate(2, 2).unwrap();
        assert!(!survives(triple, &longer, TurnPolicy::FinalTurnTie));
    }

    proptest! {
        #[test]
        fn conservation_every_turn(
            a in 1u32..=255,
            b in 1u32..=255,
            c in 1u32..=255,
            rests in proptest::collection::vec(0u8..3, 0..24),
        ) {
            let mut state = Triple::new(a, b, c);
            let total = state.sum();
            for rest in rests {
                match step(state, rest) {
                    Some(next) => {
                        prop_assert_eq!(next.sum(), total);
                        prop_assert!(next.0.iter().all(|&v| v > 0));
                        state = next;
                    }
                    None => break,
                }
            }
        }
    }
}
