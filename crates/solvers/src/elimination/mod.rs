//! Data structures, types, and the exhaustive survival verifier for the three-player
//! betting game.

mod types;
pub use types::*;

mod sequence;
pub use sequence::{
    generate, sequence_count, RestDigits, RestSequence, SequenceTable, MAX_TABLE_TURNS,
};

mod simulator;
pub use simulator::{play, step, survives};

mod verifier;
pub use verifier::Verifier;

mod exhaustive;
pub use exhaustive::{build_verifier, OnTheFlyVerifier, TableVerifier, VerifierStrategy};

mod dedupe;
pub use dedupe::{dedupe, sort_results};
