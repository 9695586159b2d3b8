//! Scenarios and random scenario selection.
use crate::error::VizdqnError;
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A map of the game together with its engine configuration.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Scenario {
    /// File name of the map package, e.g. `basic.wad`.
    pub name: String,

    /// Map inside the package, e.g. `map01`.
    pub map: String,

    /// File name of the engine configuration, e.g. `basic.cfg`.
    pub config: String,
}

impl Scenario {
    /// Constructs a scenario.
    pub fn new(name: impl Into<String>, map: impl Into<String>, config: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map: map.into(),
            config: config.into(),
        }
    }

    /// Path of the engine configuration, `<dir>/configs/<config>`.
    pub fn config_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join("configs").join(&self.config)
    }

    /// Path of the map package, `<dir>/<name>`.
    pub fn package_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(&self.name)
    }
}

/// A non-empty set of scenarios, one of which is drawn at every engine (re)initialization.
#[derive(Debug, Clone)]
pub struct ScenarioPool {
    scenarios: Vec<Scenario>,
}

impl ScenarioPool {
    /// Constructs a pool, failing if `scenarios` is empty.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self> {
        if scenarios.is_empty() {
            return Err(VizdqnError::EmptyScenarioPool.into());
        }
        Ok(Self { scenarios })
    }

    /// Draws a scenario uniformly at random.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> &Scenario {
        &self.scenarios[rng.gen_range(0..self.scenarios.len())]
    }

    /// All scenarios of the pool.
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }
}
