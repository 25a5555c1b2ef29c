//! The verifier module holds the [Verifier] trait.

use super::{Outcome, Triple, TurnPolicy};

/// The [Verifier] trait defines the interface for deciding whether a [Triple] survives every
/// possible rest sequence of a fixed length.
pub trait Verifier {
    /// The number of turns every sequence must survive.
    fn turns(&self) -> u32;

    /// The [TurnPolicy] applied to each sequence's [Outcome].
    fn policy(&self) -> TurnPolicy;

    /// Find the first rest sequence, in seed order, that the [Triple] does not survive.
    ///
    /// ### Takes
    /// - `triple`: The starting amounts under test.
    ///
    /// ### Returns
    /// - `Some((seed, outcome))`: The seed of the first failing sequence and how it ended.
    /// - `None`: Every sequence survives.
    fn counterexample(&self, triple: &Triple) -> Option<(u64, Outcome)>;

    /// Returns `true` iff the [Triple] survives every rest sequence. Stops at the first failure.
    fn all_survive(&self, triple: &Triple) -> bool {
        self.counterexample(triple).is_none()
    }
}
