//! The types module contains all of the types relevant to the betting game.

use anyhow::{anyhow, ensure, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The [Value] type represents the amount of money held by a single player.
pub type Value = u32;

/// The [RestIndex] type identifies the player that sits out a turn. Always one of `0`, `1`, `2`.
pub type RestIndex = u8;

/// The number of distinct choices of resting player per turn.
pub const PLAYERS: u64 = 3;

/// Returns the indices of the two players that bet against one another while `rest` sits out.
///
/// ### Takes
/// - `rest`: The [RestIndex] of the resting player.
///
/// ### Returns
/// - `(usize, usize)`: The indices of the two betting players, in ascending order.
#[inline]
pub fn pair(rest: RestIndex) -> (usize, usize) {
    match rest {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// The [Triple] struct holds the amounts of money of the three players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple(pub [Value; 3]);

impl Triple {
    /// Creates a new [Triple] from the three players' amounts.
    pub const fn new(p1: Value, p2: Value, p3: Value) -> Self {
        Self([p1, p2, p3])
    }

    /// Returns the total amount of money in the game. Invariant across every turn.
    pub fn sum(&self) -> u64 {
        self.0.iter().map(|&v| v as u64).sum()
    }

    /// Returns the canonical form of the [Triple]: its components sorted ascending.
    pub fn canonical(&self) -> Self {
        let mut sorted = self.0;
        sorted.sort_unstable();
        Self(sorted)
    }

    /// Returns `true` if every component lies within `[1, bound]`.
    pub fn within(&self, bound: Value) -> bool {
        self.0.iter().all(|&v| v >= 1 && v <= bound)
    }
}

impl From<[Value; 3]> for Triple {
    fn from(values: [Value; 3]) -> Self {
        Self(values)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for Triple {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<Value>()
                    .map_err(|e| anyhow!("Invalid triple component {:?}: {}", part, e))
            })
            .collect::<Result<Vec<_>>>()?;
        ensure!(
            values.len() == 3,
            "A triple needs exactly three components, got {}",
            values.len()
        );
        Ok(Self([values[0], values[1], values[2]]))
    }
}

/// The [Outcome] of replaying a single rest sequence against a [Triple].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every turn of the sequence was played without a tie.
    Survived,
    /// The two betting players held equal amounts on the given turn (1-based).
    Tied {
        /// The turn on which the game ended.
        turn: u32,
    },
}

/// The [TurnPolicy] fixes what "the game lasts at least `turns` turns" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnPolicy {
    /// Every one of the `turns` turns must be played without a tie.
    #[default]
    Strict,
    /// The game may end on turn `turns` itself; only earlier ties fail.
    FinalTurnTie,
}

impl TurnPolicy {
    /// Returns whether the [Outcome] of a sequence of `turns` turns counts as surviving.
    pub fn accepts(&self, outcome: Outcome, turns: usize) -> bool {
        match (self, outcome) {
            (_, Outcome::Survived) => true,
            (TurnPolicy::Strict, Outcome::Tied { .. }) => false,
            (TurnPolicy::FinalTurnTie, Outcome::Tied { turn }) => turn as usize >= turns,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pair_excludes_rest() {
        for rest in 0..3u8 {
            let (a, b) = pair(rest);
            assert!(a < b);
            assert_ne!(a, rest as usize);
            assert_ne!(b, rest as usize);
        }
    }

    #[test]
    fn canonical_sorts_components() {
        assert_eq!(Triple::new(223, 175, 199).canonical(), Triple::new(175, 199, 223));
        assert_eq!(Triple::new(1, 1, 6).canonical(), Triple::new(1, 1, 6));
    }

    #[test]
    fn parse_and_display() {
        let triple: Triple = " 1, 4,6".parse().unwrap();
        assert_eq!(triple, Triple::new(1, 4, 6));
        assert_eq!(triple.to_string(), "1,4,6");
        assert!("1,4".parse::<Triple>().is_err());
        assert!("1,4,x".parse::<Triple>().is_err());
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&Triple::new(175, 199, 223)).unwrap();
        assert_eq!(json, "[175,199,223]");
    }

    #[test]
    fn policy_on_final_turn() {
        let last = Outcome::Tied { turn: 12 };
        let early = Outcome::Tied { turn: 11 };
        assert!(!TurnPolicy::Strict.accepts(last, 12));
        assert!(TurnPolicy::FinalTurnTie.accepts(last, 12));
        assert!(!TurnPolicy::FinalTurnTie.accepts(early, 12));
        assert!(TurnPolicy::Strict.accepts(Outcome::Survived, 12));
    }
}
