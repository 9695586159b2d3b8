//! Scripted collaborators used in tests.
use crate::{Action, Frame, Game, GameVariable, Learner, ObsShape, Scenario, StackedObs, Transition};
use anyhow::{anyhow, Result};
use image::{GrayImage, Luma};
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

/// Configuration of [`ScriptedGame`].
#[derive(Debug, Clone)]
pub struct ScriptedGameConfig {
    /// Frame width.
    pub width: u32,

    /// Frame height.
    pub height: u32,

    /// Number of buttons.
    pub n_buttons: usize,

    /// Decision steps until an episode finishes.
    pub episode_length: usize,

    /// Reward of every decision step.
    pub reward: f32,

    /// Episode timeout in tics.
    pub episode_timeout: usize,

    /// Distance to the goal removed by every decision step.
    pub distance_per_step: f64,

    /// Fail in [`Game::init`].
    pub fail_init: bool,

    /// Fail in [`Game::make_action`] at this decision step, counted over the whole run.
    pub fail_at_action: Option<usize>,
}

impl Default for ScriptedGameConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 24,
            n_buttons: 2,
            episode_length: 5,
            reward: 1.0,
            episode_timeout: 100,
            distance_per_step: 10.0,
            fail_init: false,
            fail_at_action: None,
        }
    }
}

/// Calls observed by a [`ScriptedGame`].
#[derive(Debug, Default, Clone)]
pub struct Counters {
    /// Calls of [`Game::init`].
    pub inits: usize,

    /// Calls of [`Game::close`].
    pub closes: usize,

    /// Calls of [`Game::new_episode`].
    pub episodes: usize,

    /// Successful calls of [`Game::screen`].
    pub screens: usize,

    /// Indices of the actions taken.
    pub actions: Vec<usize>,

    /// Scenarios passed to [`Game::init`], by name.
    pub scenarios: Vec<String>,
}

/// A deterministic game with fixed-length episodes and a constant reward.
///
/// The frame at decision step `t` of an episode is filled with intensity `16 * t`,
/// so consecutive frames are distinguishable.
pub struct ScriptedGame {
    config: ScriptedGameConfig,
    step: usize,
    counters: Rc<RefCell<Counters>>,
}

impl ScriptedGame {
    /// Constructs the game.
    pub fn new(config: ScriptedGameConfig) -> Self {
        Self {
            config,
            step: 0,
            counters: Rc::new(RefCell::new(Counters::default())),
        }
    }

    /// Shared handle on the call counters, valid after the game is moved.
    pub fn counters(&self) -> Rc<RefCell<Counters>> {
        self.counters.clone()
    }

    /// Intensity of the frame at decision step `step`.
    pub fn intensity(step: usize) -> u8 {
        ((step * 16) % 256) as u8
    }
}

impl Game for ScriptedGame {
    fn init(&mut self, scenario: &Scenario, _scenario_dir: &Path) -> Result<()> {
        let mut counters = self.counters.borrow_mut();
        counters.inits += 1;
        counters.scenarios.push(scenario.name.clone());
        if self.config.fail_init {
            return Err(anyhow!("failed to load {}", scenario.name));
        }
        Ok(())
    }

    fn new_episode(&mut self) -> Result<()> {
        self.counters.borrow_mut().episodes += 1;
        self.step = 0;
        Ok(())
    }

    fn is_episode_finished(&self) -> bool {
        self.step >= self.config.episode_length
    }

    fn screen(&mut self) -> Result<Frame> {
        if self.is_episode_finished() {
            return Err(anyhow!("no screen after the episode finished"));
        }
        self.counters.borrow_mut().screens += 1;
        let v = Self::intensity(self.step);
        Ok(Frame::Gray(GrayImage::from_pixel(
            self.config.width,
            self.config.height,
            Luma([v]),
        )))
    }

    fn make_action(&mut self, action: &Action, _repeat: usize) -> Result<f32> {
        if self.is_episode_finished() {
            return Err(anyhow!("action after the episode finished"));
        }
        let mut counters = self.counters.borrow_mut();
        if Some(counters.actions.len()) == self.config.fail_at_action {
            return Err(anyhow!("engine crashed"));
        }
        counters.actions.push(action.index());
        self.step += 1;
        Ok(self.config.reward)
    }

    fn episode_timeout(&self) -> usize {
        self.config.episode_timeout
    }

    fn game_variable(&self, var: GameVariable) -> Result<f64> {
        let total = self.config.episode_length as f64 * self.config.distance_per_step;
        match var {
            GameVariable::User1 => Ok(total - self.step as f64 * self.config.distance_per_step),
            GameVariable::User2 => Ok(total),
            GameVariable::User3 => Err(anyhow!("{:?} is not exported", var)),
        }
    }

    fn available_buttons(&self) -> usize {
        self.config.n_buttons
    }

    fn close(&mut self) {
        self.counters.borrow_mut().closes += 1;
    }
}

/// Configuration of [`FixedQLearner`].
#[derive(Debug, Clone)]
pub struct FixedQLearnerConfig {
    /// Q-values returned for every state.
    pub q_values: Vec<f32>,

    /// Loss returned by every training step.
    pub loss: Option<f32>,
}

/// A learner answering the same Q-values for any state and never learning.
pub struct FixedQLearner {
    config: FixedQLearnerConfig,
    transitions: Vec<Transition>,
    train_steps: usize,
    persisted: RefCell<Vec<PathBuf>>,
}

impl FixedQLearner {
    /// Transitions recorded so far.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Number of training steps requested.
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    /// Paths given to [`Learner::persist`].
    pub fn persisted(&self) -> Vec<PathBuf> {
        self.persisted.borrow().clone()
    }
}

impl Learner for FixedQLearner {
    type Config = FixedQLearnerConfig;

    fn build(config: &Self::Config, _obs_shape: ObsShape, n_actions: usize, _train: bool) -> Result<Self> {
        if config.q_values.len() != n_actions {
            return Err(anyhow!(
                "{} Q-values given for {} actions",
                config.q_values.len(),
                n_actions
            ));
        }
        Ok(Self {
            config: config.clone(),
            transitions: vec![],
            train_steps: 0,
            persisted: RefCell::new(vec![]),
        })
    }

    fn q_values(&self, states: &[StackedObs]) -> Result<Vec<Vec<f32>>> {
        Ok(vec![self.config.q_values.clone(); states.len()])
    }

    fn record(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    fn train_step(&mut self) -> Result<Option<f32>> {
        self.train_steps += 1;
        Ok(self.config.loss)
    }

    fn persist(&self, path: &Path) -> Result<()> {
        self.persisted.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}
