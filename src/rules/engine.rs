//! Transition oracle and evaluator traits, plus outcome selection helpers.
//!
//! Rules implementations provide:
//! - Which states a move pair can lead to, and how likely each is
//! - A static score for a non-terminal state

use crate::core::{MoveId, MovePair, ProbabilityCheck, RulesError, SearchError, SearchRng};

/// A possible resulting state and its probability.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome<S> {
    /// State after the move pair resolves this way.
    pub state: S,

    /// Occurrence probability in `[0, 1]`.
    pub probability: f64,
}

impl<S> Outcome<S> {
    /// Create an outcome.
    pub fn new(state: S, probability: f64) -> Self {
        Self { state, probability }
    }

    /// An outcome that always happens.
    pub fn certain(state: S) -> Self {
        Self::new(state, 1.0)
    }
}

/// State-transition oracle.
///
/// ## Implementation Notes
///
/// - Each returned state must be an independent copy
/// - Probabilities should sum to 1; zero-probability outcomes may be elided
/// - Return an empty list only when neither side can move
pub trait TransitionOracle<S> {
    /// All outcomes of applying `self_move` and `opp_move` to `state`.
    fn transitions(
        &self,
        state: &S,
        self_move: &MoveId,
        opp_move: &MoveId,
    ) -> Result<Vec<Outcome<S>>, RulesError>;
}

/// Static evaluation. Higher is better for the searching side.
///
/// Must be pure and deterministic.
pub trait Evaluator<S> {
    /// Score a state.
    fn evaluate(&self, state: &S) -> f64;
}

/// Query the oracle and reject outcome lists that would corrupt the
/// expected-value math or sampling.
pub fn checked_transitions<S, O>(
    oracle: &O,
    state: &S,
    pair: &MovePair,
    check: &ProbabilityCheck,
) -> Result<Vec<Outcome<S>>, SearchError>
where
    O: TransitionOracle<S> + ?Sized,
{
    let outcomes = oracle.transitions(state, &pair.self_move, &pair.opp_move)?;
    let total = total_probability(&outcomes);

    if outcomes.is_empty() || !check.accepts(total) {
        return Err(SearchError::OracleInconsistency {
            total,
            outcomes: outcomes.len(),
        });
    }

    Ok(outcomes)
}

/// Sum of probabilities over an outcome list.
#[must_use]
pub fn total_probability<S>(outcomes: &[Outcome<S>]) -> f64 {
    outcomes.iter().map(|o| o.probability).sum()
}

/// Index of the most likely outcome. Ties keep the first.
#[must_use]
pub fn most_likely<S>(outcomes: &[Outcome<S>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, outcome) in outcomes.iter().enumerate() {
        match best {
            Some((_, p)) if outcome.probability <= p => {}
            _ => best = Some((i, outcome.probability)),
        }
    }
    best.map(|(i, _)| i)
}

/// Inverse-CDF sample: the first outcome whose cumulative mass exceeds a
/// uniform draw.
///
/// Returns `None` when the draw lands past the reported total mass.
pub fn sample_outcome<S>(outcomes: &[Outcome<S>], rng: &mut SearchRng) -> Option<usize> {
    let draw = rng.gen_f64();
    let mut cumulative = 0.0;

    for (i, outcome) in outcomes.iter().enumerate() {
        cumulative += outcome.probability;
        if cumulative > draw {
            return Some(i);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOracle(Vec<(u32, f64)>);

    impl TransitionOracle<u32> for FixedOracle {
        fn transitions(
            &self,
            _state: &u32,
            _self_move: &MoveId,
            _opp_move: &MoveId,
        ) -> Result<Vec<Outcome<u32>>, RulesError> {
            Ok(self.0.iter().map(|&(s, p)| Outcome::new(s, p)).collect())
        }
    }

    fn pair() -> MovePair {
        MovePair::new("a", "x")
    }

    #[test]
    fn test_checked_accepts_valid() {
        let oracle = FixedOracle(vec![(1, 0.25), (2, 0.75)]);
        let outcomes =
            checked_transitions(&oracle, &0, &pair(), &ProbabilityCheck::default()).unwrap();
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn test_checked_rejects_empty() {
        let oracle = FixedOracle(vec![]);
        let err = checked_transitions(&oracle, &0, &pair(), &ProbabilityCheck::lenient())
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::OracleInconsistency {
                total: 0.0,
                outcomes: 0
            }
        );
    }

    #[test]
    fn test_checked_rejects_missing_mass() {
        let oracle = FixedOracle(vec![(1, 0.5)]);

        let strict = checked_transitions(&oracle, &0, &pair(), &ProbabilityCheck::default());
        assert!(matches!(
            strict,
            Err(SearchError::OracleInconsistency { outcomes: 1, .. })
        ));

        let lenient = checked_transitions(&oracle, &0, &pair(), &ProbabilityCheck::lenient());
        assert!(lenient.is_ok());
    }

    #[test]
    fn test_most_likely_first_on_tie() {
        let outcomes = vec![
            Outcome::new('a', 0.2),
            Outcome::new('b', 0.4),
            Outcome::new('c', 0.4),
        ];
        assert_eq!(most_likely(&outcomes), Some(1));
        assert_eq!(most_likely::<char>(&[]), None);
    }

    #[test]
    fn test_sample_certain_outcome() {
        let mut rng = SearchRng::new(3);
        let outcomes = vec![Outcome::new('a', 0.0), Outcome::certain('b')];
        for _ in 0..50 {
            assert_eq!(sample_outcome(&outcomes, &mut rng), Some(1));
        }
    }

    #[test]
    fn test_sample_follows_weights() {
        let mut rng = SearchRng::new(11);
        let outcomes = vec![Outcome::new('a', 0.9), Outcome::new('b', 0.1)];
        let hits = (0..2000)
            .filter(|_| sample_outcome(&outcomes, &mut rng) == Some(0))
            .count();
        assert!((1700..1900).contains(&hits), "got {hits}");
    }

    #[test]
    fn test_sample_missing_mass() {
        let mut rng = SearchRng::new(5);
        let outcomes = vec![Outcome::new('a', 0.0)];
        assert_eq!(sample_outcome(&outcomes, &mut rng), None);
    }
}
