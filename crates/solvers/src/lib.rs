//! Solvers for the three-player betting game: given starting amounts, decide whether every
//! possible order of resting players keeps the game alive for a minimum number of turns.

pub mod elimination;
