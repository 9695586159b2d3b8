//! Reward shaping.
//!
//! Shaping subtracts penalties from the raw engine reward. It never touches the
//! terminal flag of a step.
use crate::GameVariable;
use log::warn;
use serde::{Deserialize, Serialize};

/// Configuration of [`RewardShaping`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RewardShapingConfig {
    /// Subtract `tic / timeout` at every decision step.
    pub time_penalty: bool,

    /// Subtract the current distance to the goal over the initial distance.
    pub distance_penalty: bool,

    /// Game variable holding the current distance to the goal.
    pub distance_variable: GameVariable,

    /// Game variable holding the distance to the goal at episode start.
    pub initial_distance_variable: GameVariable,

    /// Shaped rewards above this value are reported in the log.
    pub anomaly_threshold: f32,
}

impl Default for RewardShapingConfig {
    fn default() -> Self {
        Self {
            time_penalty: true,
            distance_penalty: false,
            distance_variable: GameVariable::User1,
            initial_distance_variable: GameVariable::User2,
            anomaly_threshold: 1.0,
        }
    }
}

impl RewardShapingConfig {
    /// Enables or disables the time penalty.
    pub fn time_penalty(mut self, v: bool) -> Self {
        self.time_penalty = v;
        self
    }

    /// Enables or disables the distance penalty.
    pub fn distance_penalty(mut self, v: bool) -> Self {
        self.distance_penalty = v;
        self
    }
}

/// Inputs of shaping available at a decision step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapingContext {
    /// Decision steps taken in the episode, including the current one.
    pub tic: usize,

    /// Episode timeout in decision steps.
    pub timeout: usize,

    /// Current and initial distance to the goal, when the distance penalty is on.
    pub distance: Option<(f64, f64)>,
}

/// Applies the configured penalties to raw rewards.
#[derive(Debug, Clone)]
pub struct RewardShaping {
    config: RewardShapingConfig,
}

impl RewardShaping {
    /// Constructs the shaping policy.
    pub fn new(config: RewardShapingConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &RewardShapingConfig {
        &self.config
    }

    /// Returns the shaped reward.
    pub fn shape(&self, raw: f32, ctx: &ShapingContext) -> f32 {
        let mut r = raw;
        if self.config.time_penalty {
            r -= ctx.tic as f32 / ctx.timeout as f32;
        }
        if self.config.distance_penalty {
            if let Some((current, initial)) = ctx.distance {
                r -= (current / initial) as f32;
            }
        }
        if r > self.config.anomaly_threshold {
            warn!("Agent found some positive reward: {}", r);
        }
        r
    }
}
