//! Train [`Learner`].
mod config;
use crate::{
    collect_eval_states,
    error::VizdqnError,
    metrics::{EpisodeMetrics, AVERAGE_Q},
    record::Recorder,
    ActionSpace, AverageQEvaluator, EpisodeRunner, EpsilonGreedy, EvalStates, Evaluator,
    FramePreprocessor, Game, GameSession, Learner, Observer, RewardShaping, ScenarioPool,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;
use rand::{rngs::SmallRng, SeedableRng};
use std::path::Path;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// 0. Given a [`GameSession`], a [`Learner`] and a [`Recorder`].
/// 1. Play `n_eval_states` decision steps with random actions and keep the observations
///    as [`EvalStates`]. Then reinitialize the engine with a random scenario.
/// 2. For each of `n_episodes` episodes:
///     1. Play the episode with an [`EpisodeRunner`], which records every transition
///        in the learner and performs one training step per decision step.
///     2. Reinitialize the engine with a scenario drawn from the pool.
///     3. Compute the average max Q-value over the evaluation states.
///     4. Write [`EpisodeMetrics`] to the recorder.
///     5. Save the learner in `model_dir`.
///
/// The comparison of the average Q-value with the one of the previous episode is
/// reported in the log and has no other effect.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Game]-->|Frame|B[Observer]
///     B -->|StackedObs|C[EpsilonGreedy]
///     C -->|Action|A
///     A -->|reward|D[RewardShaping]
///     D -->|Transition|E[Learner]
///     E -->|Q-values|C
///     E -->|Q-values|F[AverageQEvaluator]
///     F -->|EpisodeMetrics|G[Recorder]
/// ```
pub struct Trainer {
    config: TrainerConfig,
    pool: ScenarioPool,
    rng: SmallRng,

    // Decision steps over the whole run.
    frame_counter: usize,
}

impl Trainer {
    /// Constructs a trainer, validating the configuration.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        if config.n_eval_states == 0 {
            return Err(VizdqnError::EmptyEvalStates.into());
        }
        if config.frame_stack == 0 {
            return Err(VizdqnError::InvalidConfig("frame_stack must be positive".into()).into());
        }
        if config.frame_repeat == 0 {
            return Err(VizdqnError::InvalidConfig("frame_repeat must be positive".into()).into());
        }
        let pool = ScenarioPool::new(config.scenarios.clone())?;
        let rng = SmallRng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            pool,
            rng,
            frame_counter: 0,
        })
    }

    /// The configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Decision steps taken so far.
    pub fn frame_counter(&self) -> usize {
        self.frame_counter
    }

    /// `[height, width, frames]` of the observations given to the learner.
    pub fn obs_shape(&self) -> [usize; 3] {
        self.observer().obs_shape()
    }

    fn observer(&self) -> Observer {
        Observer::new(
            FramePreprocessor::new(self.config.preprocess.clone()),
            self.config.frame_stack,
        )
    }

    /// Opens `game` with a scenario drawn from the pool.
    pub fn open_session<G: Game>(&mut self, game: G) -> Result<GameSession<G>> {
        let scenario = self.pool.choose(&mut self.rng);
        GameSession::open(game, scenario, &self.config.scenario_dir)
    }

    /// Collects the evaluation states with random actions.
    pub fn collect_eval_states<G: Game>(&mut self, session: &mut GameSession<G>) -> Result<EvalStates> {
        let actions = ActionSpace::new(session.game()?.available_buttons());
        let mut observer = self.observer();
        info!(
            "Collecting {} states for average Q",
            self.config.n_eval_states
        );
        collect_eval_states(
            session,
            self.config.n_eval_states,
            &actions,
            &self.pool,
            &mut observer,
            self.config.frame_repeat,
            &mut self.rng,
        )
    }

    /// Trains the learner.
    ///
    /// Any error ends the run. The engine is closed when `session` is dropped.
    pub fn train<G, L, R>(
        &mut self,
        session: &mut GameSession<G>,
        learner: &mut L,
        recorder: &mut R,
    ) -> Result<()>
    where
        G: Game,
        L: Learner,
        R: Recorder + ?Sized,
    {
        let eval_states = self.collect_eval_states(session)?;
        let mut evaluator = AverageQEvaluator::new(eval_states);
        session.switch(self.pool.choose(&mut self.rng))?;

        let n_actions = session.game()?.available_buttons();
        let mut runner = EpisodeRunner::new(
            self.observer(),
            EpsilonGreedy::new(self.config.explorer.clone(), n_actions),
            RewardShaping::new(self.config.reward.clone()),
            ActionSpace::new(n_actions),
            self.config.frame_repeat,
        );
        let model_dir = self.config.model_dir.clone();
        let mut last_avg_q: Option<f32> = None;

        for episode in 0..self.config.n_episodes {
            let stats = runner.run(
                session.game_mut()?,
                learner,
                &mut self.frame_counter,
                &mut self.rng,
            )?;
            session.switch(self.pool.choose(&mut self.rng))?;

            info!(
                "End of episode {}. Episode reward: {}. Episode loss: {}. Time to finish episode: {:?}",
                episode,
                stats.cumulative_reward,
                stats.average_loss(),
                stats.duration
            );
            info!("Collecting Average Q for weights of episode {}...", episode);
            let avg_q = evaluator.evaluate(&*learner)?.get_scalar(AVERAGE_Q)?;
            info!("Episode {}: Average Q: {}", episode, avg_q);

            let metrics = EpisodeMetrics {
                index: episode,
                cumulative_reward: stats.cumulative_reward,
                average_loss: stats.average_loss(),
                average_q: avg_q,
                duration: stats.duration,
            };
            recorder.write(metrics.into_record());
            recorder.flush();

            info!("{}", average_q_trend(last_avg_q, avg_q));
            last_avg_q = Some(avg_q);

            learner.persist(Path::new(&model_dir))?;
            info!("Saved the model in {:?}.", &model_dir);
        }

        Ok(())
    }
}

/// Describes how the average Q-value moved since the previous episode.
fn average_q_trend(last: Option<f32>, avg_q: f32) -> String {
    match last {
        Some(last) if avg_q > last => {
            format!("Average Q {} greater than last average Q {}.", avg_q, last)
        }
        Some(last) => format!("Average Q {} lower than last average Q {}.", avg_q, last),
        None => format!("Average Q {} is the baseline of the run.", avg_q),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_average_q_trend() {
        assert_eq!(
            average_q_trend(None, 0.5),
            "Average Q 0.5 is the baseline of the run."
        );
        assert!(average_q_trend(Some(0.25), 0.5).contains("greater"));
        assert!(average_q_trend(Some(0.5), 0.25).contains("lower"));
    }
}
