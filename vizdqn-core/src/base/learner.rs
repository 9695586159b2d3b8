//! Learner.
use crate::{ObsShape, StackedObs, Transition};
use anyhow::Result;
use std::path::Path;

/// A Q-function approximator trained from transitions.
///
/// The learner owns its replay storage and optimizer; the training loop only
/// hands transitions over and asks for optimization steps.
pub trait Learner {
    /// Configuration.
    type Config: Clone;

    /// Builds a learner for observations of `obs_shape` and `n_actions` actions.
    ///
    /// `train` is `false` for inference-only learners.
    fn build(config: &Self::Config, obs_shape: ObsShape, n_actions: usize, train: bool) -> Result<Self>
    where
        Self: Sized;

    /// Returns one row of Q-values, one value per action, for each state.
    ///
    /// This is an inference-only call.
    fn q_values(&self, states: &[StackedObs]) -> Result<Vec<Vec<f32>>>;

    /// Stores a transition.
    fn record(&mut self, transition: Transition);

    /// Performs an optimization step, returning the loss if one was taken.
    ///
    /// A learner may skip the step, e.g. while its replay memory warms up.
    fn train_step(&mut self) -> Result<Option<f32>>;

    /// Saves the parameters under `path`.
    fn persist(&self, path: &Path) -> Result<()>;
}
