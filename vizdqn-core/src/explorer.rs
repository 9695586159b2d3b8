//! Exploration: epsilon schedules and epsilon-greedy action selection.
use crate::{error::VizdqnError, Learner, StackedObs};
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Maps the number of decision steps taken so far to an exploration probability.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum EpsilonSchedule {
    /// The same probability at every step.
    Constant {
        /// Exploration probability.
        eps: f64,
    },

    /// Linear decay from `eps_start` to `eps_final` over `final_step` steps.
    Linear {
        /// Probability at step 0.
        eps_start: f64,
        /// Probability from `final_step` on.
        eps_final: f64,
        /// Step at which decay ends.
        final_step: usize,
    },

    /// `eps_final + (eps_start - eps_final) * decay^step`.
    Exponential {
        /// Probability at step 0.
        eps_start: f64,
        /// Asymptotic probability.
        eps_final: f64,
        /// Decay factor per step, in `(0, 1]`.
        decay: f64,
    },
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self::Linear {
            eps_start: 1.0,
            eps_final: 0.02,
            final_step: 100_000,
        }
    }
}

impl EpsilonSchedule {
    /// Exploration probability at `step`, clamped into `[0, 1]`.
    pub fn epsilon_at(&self, step: usize) -> f64 {
        let eps = match *self {
            Self::Constant { eps } => eps,
            Self::Linear {
                eps_start,
                eps_final,
                final_step,
            } => {
                if step >= final_step {
                    eps_final
                } else {
                    let d = (eps_start - eps_final) / (final_step as f64);
                    eps_start - d * step as f64
                }
            }
            Self::Exponential {
                eps_start,
                eps_final,
                decay,
            } => eps_final + (eps_start - eps_final) * decay.powf(step as f64),
        };
        eps.clamp(0.0, 1.0)
    }
}

/// Index of the maximal value; the first one wins ties.
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Epsilon-greedy action selection.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    schedule: EpsilonSchedule,
    n_actions: usize,
}

impl EpsilonGreedy {
    /// Constructs the selector over `n_actions` actions.
    pub fn new(schedule: EpsilonSchedule, n_actions: usize) -> Self {
        Self {
            schedule,
            n_actions,
        }
    }

    /// The schedule of exploration probabilities.
    pub fn schedule(&self) -> &EpsilonSchedule {
        &self.schedule
    }

    /// Chooses an action index for `state` at decision step `step`.
    ///
    /// With probability `epsilon_at(step)` the index is uniformly random; otherwise the
    /// learner is queried and the arg-max of its Q-values is taken. Fails with
    /// [`VizdqnError::EmptyActionSpace`] if there is no action.
    pub fn select<L, R>(
        &self,
        step: usize,
        state: &StackedObs,
        learner: &L,
        rng: &mut R,
    ) -> Result<usize>
    where
        L: Learner + ?Sized,
        R: Rng,
    {
        if self.n_actions == 0 {
            return Err(VizdqnError::EmptyActionSpace.into());
        }
        let eps = self.schedule.epsilon_at(step);
        if rng.gen::<f64>() < eps {
            return Ok(rng.gen_range(0..self.n_actions));
        }

        let q = learner.q_values(std::slice::from_ref(state))?;
        let q = q
            .first()
            .ok_or_else(|| VizdqnError::QValues("no row for the queried state".to_string()))?;
        if q.len() != self.n_actions {
            return Err(VizdqnError::QValues(format!(
                "expected {} actions, got {}",
                self.n_actions,
                q.len()
            ))
            .into());
        }
        // A non-empty row always has an arg-max
        Ok(argmax(q).unwrap_or(0))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dummy::{FixedQLearner, FixedQLearnerConfig};
    use ndarray::Array3;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_default_schedule_is_non_increasing() {
        let schedule = EpsilonSchedule::default();
        let mut prev = schedule.epsilon_at(0);
        assert_eq!(prev, 1.0);
        for step in (1..250_000).step_by(997) {
            let eps = schedule.epsilon_at(step);
            assert!(eps <= prev, "{} > {} at step {}", eps, prev, step);
            prev = eps;
        }
        assert!((schedule.epsilon_at(1_000_000) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_schedule() {
        let schedule = EpsilonSchedule::Exponential {
            eps_start: 1.0,
            eps_final: 0.1,
            decay: 0.5,
        };
        assert!((schedule.epsilon_at(0) - 1.0).abs() < 1e-12);
        assert!((schedule.epsilon_at(1) - 0.55).abs() < 1e-12);
        assert!(schedule.epsilon_at(100) >= 0.1);
    }

    #[test]
    fn test_constant_schedule_is_clamped() {
        assert_eq!(EpsilonSchedule::Constant { eps: 1.5 }.epsilon_at(3), 1.0);
        assert_eq!(EpsilonSchedule::Constant { eps: -0.5 }.epsilon_at(3), 0.0);
    }

    #[test]
    fn test_empty_action_space_is_an_error() {
        let config = FixedQLearnerConfig {
            q_values: vec![],
            loss: None,
        };
        let learner = FixedQLearner::build(&config, [2, 2, 1], 0, true).unwrap();
        let state: StackedObs = Array3::zeros((2, 2, 1)).into();
        let explorer = EpsilonGreedy::new(EpsilonSchedule::Constant { eps: 1.0 }, 0);
        let mut rng = SmallRng::seed_from_u64(0);

        let err = explorer.select(0, &state, &learner, &mut rng).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VizdqnError>(),
            Some(VizdqnError::EmptyActionSpace)
        ));
    }

    #[test]
    fn test_argmax_first_index_wins() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
