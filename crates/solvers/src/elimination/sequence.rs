//! The sequence module enumerates every possible history of resting players.
//!
//! A history of `turns` turns is identified by a seed in `[0, 3^turns)`. Turn `i` rests the
//! player given by the `i`th base-3 digit of the seed, least significant digit first. This is an
//! exhaustive enumeration, not a random source: every history maps to exactly one seed.

use super::{RestIndex, PLAYERS};
use anyhow::{anyhow, ensure, Result};

/// The largest turn count for which a [SequenceTable] may be built (`3^14 * 14` bytes).
pub const MAX_TABLE_TURNS: u32 = 14;

/// Returns the number of distinct rest sequences of length `turns`: `3^turns`.
///
/// ### Takes
/// - `turns`: The length of the sequences.
///
/// ### Returns
/// - `Ok(u64)`: `3^turns`.
/// - `Err(anyhow::Error)`: `3^turns` does not fit in a `u64`.
pub fn sequence_count(turns: u32) -> Result<u64> {
    PLAYERS
        .checked_pow(turns)
        .ok_or(anyhow!("3^{} rest sequences overflow a u64", turns))
}

/// A [RestSequence] is one fully materialized history of resting players.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RestSequence(Vec<RestIndex>);

impl RestSequence {
    /// Returns the rest indices, one per turn.
    pub fn as_slice(&self) -> &[RestIndex] {
        &self.0
    }

    /// Returns the number of turns in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence holds no turns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Produces the [RestSequence] identified by `seed`.
///
/// ### Takes
/// - `turns`: The length of the sequence.
/// - `seed`: The sequence seed, in `[0, 3^turns)`.
///
/// ### Returns
/// - `Ok(RestSequence)`: The sequence; position `i` holds `⌊seed / 3^i⌋ mod 3`.
/// - `Err(anyhow::Error)`: The seed is out of range.
pub fn generate(turns: u32, seed: u64) -> Result<RestSequence> {
    let count = sequence_count(turns)?;
    ensure!(
        seed < count,
        "Sequence seed {} out of range for {} turns (must be < {})",
        seed,
        turns,
        count
    );
    Ok(RestSequence(RestDigits::new(turns, seed).collect()))
}

/// [RestDigits] yields the base-3 digits of a seed lazily, without materializing the sequence.
/// The caller is responsible for the seed being in range; see [generate] for the checked form.
#[derive(Debug, Clone)]
pub struct RestDigits {
    seed: u64,
    remaining: u32,
}

impl RestDigits {
    /// Creates a digit iterator over `turns` digits of `seed`.
    pub fn new(turns: u32, seed: u64) -> Self {
        Self {
            seed,
            remaining: turns,
        }
    }
}

impl Iterator for RestDigits {
    type Item = RestIndex;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let digit = (self.seed % PLAYERS) as RestIndex;
        self.seed /= PLAYERS;
        Some(digit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for RestDigits {}

/// The [SequenceTable] holds every rest sequence of a fixed length in one flat buffer so that
/// the digit expansion is paid once and shared by every triple under test.
#[derive(Debug)]
pub struct SequenceTable {
    turns: u32,
    digits: Vec<RestIndex>,
}

impl SequenceTable {
    /// Precomputes all `3^turns` sequences.
    ///
    /// ### Takes
    /// - `turns`: The length of the sequences.
    ///
    /// ### Returns
    /// - `Ok(SequenceTable)`: The populated table.
    /// - `Err(anyhow::Error)`: `turns` exceeds [MAX_TABLE_TURNS].
    pub fn build(turns: u32) -> Result<Self> {
        ensure!(
            turns <= MAX_TABLE_TURNS,
            "A precomputed sequence table supports at most {} turns, got {}",
            MAX_TABLE_TURNS,
            turns
        );
        let count = sequence_count(turns)?;
        let mut digits = Vec::with_capacity(count as usize * turns as usize);
        for seed in 0..count {
            digits.extend(RestDigits::new(turns, seed));
        }
        tracing::debug!(target: "sequence-table", "Built table of {} sequences for {} turns", count, turns);
        Ok(Self { turns, digits })
    }

    /// Returns the length of every sequence in the table.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Returns the number of sequences in the table.
    pub fn len(&self) -> usize {
        if self.turns == 0 {
            1
        } else {
            self.digits.len() / self.turns as usize
        }
    }

    /// Always `false`; a table holds at least the empty sequence.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the sequence identified by `seed`, if in range.
    pub fn get(&self, seed: u64) -> Option<&[RestIndex]> {
        let seed = seed as usize;
        if seed >= self.len() {
            return None;
        }
        let width = self.turns as usize;
        self.digits.get(seed * width..(seed + 1) * width)
    }

    /// Iterates the sequences in seed order.
    pub fn iter(&self) -> impl Iterator<Item = &[RestIndex]> + '_ {
        (0..self.len() as u64).filter_map(move |seed| self.get(seed))
    }
}
