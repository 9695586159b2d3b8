#![warn(missing_docs)]
//! Experience collection and training loop of a deep Q-learning agent playing a
//! first-person shooter from raw frames.
//!
//! The engine and the Q-network are collaborators behind the [`Game`] and [`Learner`]
//! traits. This crate owns everything between them: frame preprocessing, frame
//! stacking, epsilon-greedy action selection, reward shaping, transitions, the
//! average-Q evaluation on a frozen state set, and the [`Trainer`] driving episodes.
//!
//! ```no_run
//! use anyhow::Result;
//! use vizdqn_core::{
//!     dummy::{FixedQLearner, FixedQLearnerConfig, ScriptedGame, ScriptedGameConfig},
//!     record::BufferedRecorder,
//!     Learner, PreprocessConfig, Trainer, TrainerConfig,
//! };
//!
//! fn main() -> Result<()> {
//!     let config = TrainerConfig::default()
//!         .n_episodes(3)
//!         .n_eval_states(20)
//!         .preprocess(PreprocessConfig {
//!             in_width: 32,
//!             in_height: 24,
//!             out_width: 8,
//!             out_height: 6,
//!         });
//!     let mut trainer = Trainer::build(config)?;
//!     let mut session = trainer.open_session(ScriptedGame::new(ScriptedGameConfig::default()))?;
//!     let learner_config = FixedQLearnerConfig {
//!         q_values: vec![1.0, 2.0],
//!         loss: Some(0.1),
//!     };
//!     let mut learner = FixedQLearner::build(&learner_config, trainer.obs_shape(), 2, true)?;
//!     let mut recorder = BufferedRecorder::new();
//!     trainer.train(&mut session, &mut learner, &mut recorder)
//! }
//! ```
pub mod dummy;
pub mod error;
pub mod metrics;
pub mod record;

mod action;
mod base;
mod dry_run;
mod evaluator;
mod explorer;
mod frame;
mod observer;
mod reward;
mod runner;
mod scenario;
mod session;
mod stack;
mod trainer;

pub use action::{all_actions, Action, ActionSpace};
pub use base::{Game, GameVariable, Learner, Transition};
pub use dry_run::collect_eval_states;
pub use evaluator::{average_max_q, AverageQEvaluator, EvalStates, Evaluator};
pub use explorer::{argmax, EpsilonGreedy, EpsilonSchedule};
pub use frame::{Frame, FramePreprocessor, PreprocessConfig, ProcessedFrame};
pub use observer::Observer;
pub use reward::{RewardShaping, RewardShapingConfig, ShapingContext};
pub use runner::{EpisodePhase, EpisodeRunner, EpisodeStats};
pub use scenario::{Scenario, ScenarioPool};
pub use session::GameSession;
pub use stack::{FrameStack, ObsShape, StackedObs};
pub use trainer::{Trainer, TrainerConfig};
