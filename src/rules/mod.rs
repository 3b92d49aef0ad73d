//! Rules collaborators: the transition oracle and the static evaluator.
//!
//! Battle simulators implement `TransitionOracle` and `Evaluator`; the
//! searches only ever reach the rules through these two traits.

pub mod engine;

pub use engine::{
    checked_transitions, most_likely, sample_outcome, total_probability, Evaluator, Outcome,
    TransitionOracle,
};
