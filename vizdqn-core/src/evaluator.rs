//! Evaluate [`Learner`] on a frozen set of states.
use crate::{error::VizdqnError, metrics::AVERAGE_Q, record::Record, Learner, StackedObs};
use anyhow::Result;
use log::debug;

/// Evaluate [`Learner`].
pub trait Evaluator<L: Learner> {
    /// Evaluates the learner.
    ///
    /// Implementations must not change the state of `learner`.
    fn evaluate(&mut self, learner: &L) -> Result<Record>;
}

/// States collected once before training and never changed afterwards.
///
/// The same set is used for every evaluation of a run, so changes of the average
/// Q-value reflect changes of the learner only.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalStates(Vec<StackedObs>);

impl EvalStates {
    /// Number of states.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there is no state.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The states, in collection order.
    pub fn as_slice(&self) -> &[StackedObs] {
        &self.0
    }
}

impl From<Vec<StackedObs>> for EvalStates {
    fn from(states: Vec<StackedObs>) -> Self {
        Self(states)
    }
}

/// Mean over `states` of the maximal Q-value across actions.
///
/// All states are given to the learner in a single batched query.
pub fn average_max_q<L: Learner + ?Sized>(states: &[StackedObs], learner: &L) -> Result<f32> {
    if states.is_empty() {
        return Err(VizdqnError::EmptyEvalStates.into());
    }

    let q = learner.q_values(states)?;
    if q.len() != states.len() {
        return Err(VizdqnError::QValues(format!(
            "{} rows for {} states",
            q.len(),
            states.len()
        ))
        .into());
    }
    debug!("Q-values of the first evaluation states: {:?}", &q[..q.len().min(4)]);

    let mut sum = 0f64;
    for row in q.iter() {
        if row.is_empty() {
            return Err(VizdqnError::QValues("empty row".to_string()).into());
        }
        sum += row.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    }

    Ok((sum / q.len() as f64) as f32)
}

/// Computes the average max Q-value over [`EvalStates`].
///
/// This is a measure of training progress independent of episode rewards.
#[derive(Debug, Clone)]
pub struct AverageQEvaluator {
    states: EvalStates,
}

impl AverageQEvaluator {
    /// Constructs the evaluator.
    pub fn new(states: EvalStates) -> Self {
        Self { states }
    }

    /// The frozen states.
    pub fn states(&self) -> &EvalStates {
        &self.states
    }
}

impl<L: Learner> Evaluator<L> for AverageQEvaluator {
    fn evaluate(&mut self, learner: &L) -> Result<Record> {
        let avg_q = average_max_q(self.states.as_slice(), learner)?;
        Ok(Record::from_scalar(AVERAGE_Q, avg_q))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dummy::{FixedQLearner, FixedQLearnerConfig},
        Learner,
    };
    use ndarray::Array3;

    fn states(n: usize) -> Vec<StackedObs> {
        (0..n)
            .map(|i| Array3::from_elem((2, 2, 4), i as f32).into())
            .collect()
    }

    fn learner(q_values: Vec<f32>) -> FixedQLearner {
        let n = q_values.len();
        let config = FixedQLearnerConfig {
            q_values,
            loss: None,
        };
        FixedQLearner::build(&config, [2, 2, 4], n, false).unwrap()
    }

    #[test]
    fn test_average_max_q() {
        let learner = learner(vec![0.5, -1.0, 2.5]);
        let avg_q = average_max_q(&states(10), &learner).unwrap();
        assert!((avg_q - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let learner = learner(vec![1.0, 2.0]);
        let mut evaluator = AverageQEvaluator::new(states(5).into());
        let a = evaluator.evaluate(&learner).unwrap();
        let b = evaluator.evaluate(&learner).unwrap();
        assert_eq!(
            a.get_scalar(AVERAGE_Q).unwrap(),
            b.get_scalar(AVERAGE_Q).unwrap()
        );
        assert_eq!(evaluator.states().len(), 5);
    }

    #[test]
    fn test_empty_states() {
        let learner = learner(vec![1.0]);
        let err = average_max_q(&[], &learner).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VizdqnError>(),
            Some(VizdqnError::EmptyEvalStates)
        ));
    }
}
