//! The exhaustive module contains the two implementations of the [Verifier] trait: one that
//! expands each seed's digits while it plays, and one that walks a shared [SequenceTable].

use super::{
    play, sequence_count, Outcome, RestDigits, SequenceTable, Triple, TurnPolicy, Verifier,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The [VerifierStrategy] selects how rest sequences are produced for each triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerifierStrategy {
    /// Expand each seed's base-3 digits on the fly.
    OnTheFly,
    /// Precompute every sequence once and share the table across triples.
    #[default]
    Precomputed,
}

/// A [Verifier] that generates each sequence lazily from its seed.
#[derive(Debug, Clone)]
pub struct OnTheFlyVerifier {
    turns: u32,
    count: u64,
    policy: TurnPolicy,
}

impl OnTheFlyVerifier {
    /// Creates a new [OnTheFlyVerifier]. Fails if `3^turns` overflows a `u64`.
    pub fn try_new(turns: u32, policy: TurnPolicy) -> Result<Self> {
        Ok(Self {
            turns,
            count: sequence_count(turns)?,
            policy,
        })
    }
}

impl Verifier for OnTheFlyVerifier {
    fn turns(&self) -> u32 {
        self.turns
    }

    fn policy(&self) -> TurnPolicy {
        self.policy
    }

    fn counterexample(&self, triple: &Triple) -> Option<(u64, Outcome)> {
        (0..self.count).find_map(|seed| {
            let outcome = play(*triple, RestDigits::new(self.turns, seed));
            (!self.policy.accepts(outcome, self.turns as usize)).then_some((seed, outcome))
        })
    }
}

/// A [Verifier] backed by a precomputed [SequenceTable], shared read-only between workers.
#[derive(Debug, Clone)]
pub struct TableVerifier {
    table: Arc<SequenceTable>,
    policy: TurnPolicy,
}

impl TableVerifier {
    /// Creates a new [TableVerifier] over an existing table.
    pub fn new(table: Arc<SequenceTable>, policy: TurnPolicy) -> Self {
        Self { table, policy }
    }

    /// Builds the table for `turns` and wraps it. Fails past
    /// [MAX_TABLE_TURNS](super::MAX_TABLE_TURNS).
    pub fn try_new(turns: u32, policy: TurnPolicy) -> Result<Self> {
        Ok(Self::new(Arc::new(SequenceTable::build(turns)?), policy))
    }
}

impl Verifier for TableVerifier {
    fn turns(&self) -> u32 {
        self.table.turns()
    }

    fn policy(&self) -> TurnPolicy {
        self.policy
    }

    fn counterexample(&self, triple: &Triple) -> Option<(u64, Outcome)> {
        let turns = self.table.turns() as usize;
        (0u64..).zip(self.table.iter()).find_map(|(seed, rests)| {
            let outcome = play(*triple, rests.iter().copied());
            (!self.policy.accepts(outcome, turns)).then_some((seed, outcome))
        })
    }
}

/// Builds the [Verifier] for the given strategy.
///
/// ### Takes
/// - `turns`: The number of turns every sequence must survive.
/// - `policy`: The [TurnPolicy] in force.
/// - `strategy`: The [VerifierStrategy] to use.
///
/// ### Returns
/// - `Ok(Arc<dyn Verifier>)`: A verifier that may be shared between worker threads.
/// - `Err(anyhow::Error)`: The turn count is unsupported by the strategy.
pub fn build_verifier(
    turns: u32,
    policy: TurnPolicy,
    strategy: VerifierStrategy,
) -> Result<Arc<dyn Verifier + Send + Sync>> {
    Ok(match strategy {
        VerifierStrategy::OnTheFly => Arc::new(OnTheFlyVerifier::try_new(turns, policy)?),
        VerifierStrategy::Precomputed => Arc::new(TableVerifier::try_new(turns, policy)?),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elimination::{generate, survives};

    /// Checks every sequence without stopping early.
    fn reference_all_survive(triple: Triple, turns: u32, policy: TurnPolicy) -> bool {
        let failures = (0..sequence_count(turns).unwrap())
            .filter(|&seed| !survives(triple, &generate(turns, seed).unwrap(), policy))
            .count();
        failures == 0
    }

    fn both(turns: u32, policy: TurnPolicy) -> [Arc<dyn Verifier + Send + Sync>; 2] {
        [
            build_verifier(turns, policy, VerifierStrategy::OnTheFly).unwrap(),
            build_verifier(turns, policy, VerifierStrategy::Precomputed).unwrap(),
        ]
    }

    #[test]
    fn one_four_six_survives_one_turn() {
        for verifier in both(1, TurnPolicy::Strict) {
            assert!(verifier.all_survive(&Triple::new(1, 4, 6)));
        }
    }

    #[test]
    fn one_four_six_fails_from_three_turns() {
        for turns in 3..=6 {
            for verifier in both(turns, TurnPolicy::Strict) {
                assert!(!verifier.all_survive(&Triple::new(1, 4, 6)));
            }
        }
        for verifier in both(2, TurnPolicy::Strict) {
            assert!(verifier.all_survive(&Triple::new(1, 4, 6)));
        }
    }

    #[test]
    fn equal_pair_fails_immediately() {
        for turns in 1..=5 {
            for verifier in both(turns, TurnPolicy::Strict) {
                let (seed, outcome) = verifier.counterexample(&Triple::new(1, 1, 6)).unwrap();
                // Seed 2 is the first to rest player 2 on turn one.
                assert_eq!(seed, 2);
                assert_eq!(outcome, Outcome::Tied { turn: 1 });
            }
        }
    }

    #[test]
    fn known_solution_lasts_twelve_turns() {
        let triple = Triple::new(175, 199, 223);
        for verifier in both(12, TurnPolicy::FinalTurnTie) {
            assert!(verifier.all_survive(&triple));
        }
        // Under the strict policy the same triple is only guaranteed eleven tie-free turns.
        let strict = OnTheFlyVerifier::try_new(11, TurnPolicy::Strict).unwrap();
        assert!(strict.all_survive(&triple));
        let strict = OnTheFlyVerifier::try_new(12, TurnPolicy::Strict).unwrap();
        assert!(!strict.all_survive(&triple));
    }

    #[test]
    fn zero_turns_always_survive() {
        for verifier in both(0, TurnPolicy::Strict) {
            assert!(verifier.all_survive(&Triple::new(3, 3, 3)));
        }
    }

    #[test]
    fn short_circuit_matches_reference() {
        let policies = [TurnPolicy::Strict, TurnPolicy::FinalTurnTie];
        for turns in 0..=5 {
            for policy in policies {
                let verifiers = both(turns, policy);
                for a in 1..=9 {
                    for b in 1..=9 {
                        for c in [1, 3, 6, 7, 10] {
                            let triple = Triple::new(a, b, c);
                            let expected = reference_all_survive(triple, turns, policy);
                            for verifier in &verifiers {
                                assert_eq!(verifier.all_survive(&triple), expected, "{triple}");
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn precomputed_cap_is_enforced() {
        assert!(build_verifier(15, TurnPolicy::Strict, VerifierStrategy::Precomputed).is_err());
        assert!(build_verifier(15, TurnPolicy::Strict, VerifierStrategy::OnTheFly).is_ok());
        assert!(build_verifier(41, TurnPolicy::Strict, VerifierStrategy::OnTheFly).is_err());
    }
}
