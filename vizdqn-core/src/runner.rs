//! Runs a training episode.
use crate::{
    error::VizdqnError, ActionSpace, EpsilonGreedy, Game, Learner, Observer, RewardShaping,
    ShapingContext, Transition,
};
use anyhow::Result;
use log::{debug, info};
use rand::Rng;
use std::time::{Duration, Instant};

/// Phase of the episode handled by an [`EpisodeRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// The engine has not started the episode yet.
    AwaitingReset,

    /// Decision steps are being taken.
    Running,

    /// The engine reported the end of the episode.
    Terminal,
}

/// Totals accumulated over an episode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeStats {
    /// Decision steps taken.
    pub steps: usize,

    /// Sum of shaped rewards.
    pub cumulative_reward: f32,

    /// Sum of the losses returned by training steps.
    pub total_loss: f32,

    /// Wall-clock duration.
    pub duration: Duration,
}

impl EpisodeStats {
    /// Total loss over the number of decision steps, `0` for an empty episode.
    pub fn average_loss(&self) -> f32 {
        if self.steps == 0 {
            0.0
        } else {
            self.total_loss / self.steps as f32
        }
    }
}

/// Plays episodes, feeding every transition to the learner and training it at every step.
///
/// A decision step:
///
/// 1. pushes the current screen into the frame stack and takes the observation `s_t`,
/// 2. chooses an action epsilon-greedily,
/// 3. holds the action for `frame_repeat` tics and shapes the returned reward,
/// 4. builds `s_t+1` by pushing the next screen onto a copy of the stack, or reuses
///    `s_t` if the episode has ended,
/// 5. records the transition and performs a training step.
pub struct EpisodeRunner {
    observer: Observer,
    explorer: EpsilonGreedy,
    shaping: RewardShaping,
    actions: ActionSpace,
    frame_repeat: usize,
    phase: EpisodePhase,
}

impl EpisodeRunner {
    /// Constructs a runner.
    pub fn new(
        observer: Observer,
        explorer: EpsilonGreedy,
        shaping: RewardShaping,
        actions: ActionSpace,
        frame_repeat: usize,
    ) -> Self {
        Self {
            observer,
            explorer,
            shaping,
            actions,
            frame_repeat,
            phase: EpisodePhase::AwaitingReset,
        }
    }

    /// The phase of the last episode.
    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Plays one episode from reset to its end.
    ///
    /// `frame_counter` counts decision steps over the whole run and drives the epsilon
    /// schedule.
    pub fn run<G, L, R>(
        &mut self,
        game: &mut G,
        learner: &mut L,
        frame_counter: &mut usize,
        rng: &mut R,
    ) -> Result<EpisodeStats>
    where
        G: Game + ?Sized,
        L: Learner + ?Sized,
        R: Rng,
    {
        self.phase = EpisodePhase::AwaitingReset;
        self.observer.reset();
        game.new_episode()?;
        self.phase = EpisodePhase::Running;

        let config = self.shaping.config().clone();
        let timeout = game.episode_timeout() / self.frame_repeat;
        if config.time_penalty && timeout == 0 {
            return Err(VizdqnError::InvalidTimeout {
                tics: game.episode_timeout(),
                frame_repeat: self.frame_repeat,
            }
            .into());
        }
        let initial_distance = if config.distance_penalty {
            let d = game.game_variable(config.initial_distance_variable)?;
            if !(d.is_finite() && d > 0.0) {
                return Err(VizdqnError::InvalidInitialDistance(d).into());
            }
            Some(d)
        } else {
            None
        };

        let start = Instant::now();
        let mut stats = EpisodeStats::default();
        while !game.is_episode_finished() {
            *frame_counter += 1;
            stats.steps += 1;
            let tic = stats.steps;

            let state = self.observer.observe(game)?;
            let ix = self.explorer.select(*frame_counter, &state, &*learner, rng)?;
            let action = self
                .actions
                .get(ix)
                .cloned()
                .ok_or_else(|| VizdqnError::QValues(format!("action index {} out of range", ix)))?;

            let raw = game.make_action(&action, self.frame_repeat)?;
            let distance = match initial_distance {
                Some(initial) => Some((game.game_variable(config.distance_variable)?, initial)),
                None => None,
            };
            let ctx = ShapingContext {
                tic,
                timeout,
                distance,
            };
            let reward = self.shaping.shape(raw, &ctx);
            stats.cumulative_reward += reward;

            let terminal = game.is_episode_finished();
            let next_state = if terminal {
                info!("Terminal state. Current tic: {}", tic);
                state.clone()
            } else {
                self.observer.peek(game)?
            };

            learner.record(Transition::new(state, action, reward, next_state, terminal));
            if let Some(loss) = learner.train_step()? {
                stats.total_loss += loss;
            }
        }
        self.phase = EpisodePhase::Terminal;
        stats.duration = start.elapsed();
        self.observer.reset();
        debug!("Episode finished after {} decision steps", stats.steps);

        Ok(stats)
    }
}
