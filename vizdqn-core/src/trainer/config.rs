//! Configuration of [`Trainer`](super::Trainer).
use crate::{EpsilonSchedule, PreprocessConfig, RewardShapingConfig, Scenario};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of training episodes.
    pub n_episodes: usize,

    /// The number of states collected for average Q before training.
    pub n_eval_states: usize,

    /// The number of frames in an observation.
    pub frame_stack: usize,

    /// Engine tics an action is held for.
    pub frame_repeat: usize,

    /// Frame preprocessing.
    pub preprocess: PreprocessConfig,

    /// Exploration probability over decision steps.
    pub explorer: EpsilonSchedule,

    /// Reward shaping.
    pub reward: RewardShapingConfig,

    /// Directory scenario files are resolved against.
    pub scenario_dir: String,

    /// Scenarios drawn at every engine (re)initialization.
    pub scenarios: Vec<Scenario>,

    /// Where the learner is saved after every episode.
    pub model_dir: String,

    /// Seed of the random number generator.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_episodes: 10000,
            n_eval_states: 300,
            frame_stack: 4,
            frame_repeat: 4,
            preprocess: PreprocessConfig::default(),
            explorer: EpsilonSchedule::default(),
            reward: RewardShapingConfig::default(),
            scenario_dir: "scenarios".to_string(),
            scenarios: vec![Scenario::new("basic.wad", "map01", "basic.cfg")],
            model_dir: "weights/basic".to_string(),
            seed: 42,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.n_episodes = v;
        self
    }

    /// Sets the number of evaluation states.
    pub fn n_eval_states(mut self, v: usize) -> Self {
        self.n_eval_states = v;
        self
    }

    /// Sets the number of stacked frames.
    pub fn frame_stack(mut self, v: usize) -> Self {
        self.frame_stack = v;
        self
    }

    /// Sets the number of tics an action is held for.
    pub fn frame_repeat(mut self, v: usize) -> Self {
        self.frame_repeat = v;
        self
    }

    /// Sets the preprocessing configuration.
    pub fn preprocess(mut self, v: PreprocessConfig) -> Self {
        self.preprocess = v;
        self
    }

    /// Sets the epsilon schedule.
    pub fn explorer(mut self, v: EpsilonSchedule) -> Self {
        self.explorer = v;
        self
    }

    /// Sets reward shaping.
    pub fn reward(mut self, v: RewardShapingConfig) -> Self {
        self.reward = v;
        self
    }

    /// Sets the scenario directory.
    pub fn scenario_dir(mut self, v: impl Into<String>) -> Self {
        self.scenario_dir = v.into();
        self
    }

    /// Sets the scenario pool.
    pub fn scenarios(mut self, v: Vec<Scenario>) -> Self {
        self.scenarios = v;
        self
    }

    /// Sets the directory of saved models.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = v.into();
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
