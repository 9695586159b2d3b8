use crate::{args::Args, learner::LinearQConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};
use vizdqn_core::{EpsilonSchedule, PreprocessConfig, Scenario, TrainerConfig};

const SCENARIO_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios");

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CorridorConfig {
    pub trainer: TrainerConfig,
    pub learner: LinearQConfig,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        let trainer = TrainerConfig::default()
            .n_episodes(200)
            .n_eval_states(100)
            .preprocess(PreprocessConfig {
                in_width: 64,
                in_height: 48,
                out_width: 16,
                out_height: 12,
            })
            .explorer(EpsilonSchedule::Linear {
                eps_start: 1.0,
                eps_final: 0.05,
                final_step: 5000,
            })
            .scenario_dir(SCENARIO_DIR)
            .scenarios(vec![
                Scenario::new("corridor.pkg", "map01", "corridor.yaml"),
                Scenario::new("corridor.pkg", "map02", "corridor_long.yaml"),
            ])
            .model_dir("weights/corridor");

        Self {
            trainer,
            learner: LinearQConfig::default(),
        }
    }
}

impl CorridorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Loads the configuration given in `args`, then applies the overrides.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(n) = args.episodes {
            config.trainer.n_episodes = n;
        }
        if let Some(seed) = args.seed {
            config.trainer.seed = seed;
            config.learner.seed = seed;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;
    use tempdir::TempDir;

    fn args(config: Option<String>) -> Args {
        Args {
            mode: "train".to_string(),
            config,
            logdir: "logs".to_string(),
            episodes: Some(3),
            seed: Some(7),
            name: "corridor".to_string(),
        }
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let config = CorridorConfig::from_args(&args(None))?;
        assert_eq!(config.trainer.n_episodes, 3);
        assert_eq!(config.trainer.seed, 7);
        assert_eq!(config.learner.seed, 7);
        Ok(())
    }

    #[test]
    fn test_load_yaml() -> Result<()> {
        let dir = TempDir::new("corridor_config")?;
        let path = dir.path().join("config.yaml");
        let config = CorridorConfig::default();
        File::create(&path)?.write_all(serde_yaml::to_string(&config)?.as_bytes())?;

        let loaded = CorridorConfig::from_args(&args(Some(path.to_string_lossy().into())))?;
        assert_eq!(loaded.trainer.preprocess, config.trainer.preprocess);
        assert_eq!(loaded.trainer.n_episodes, 3);
        Ok(())
    }
}
