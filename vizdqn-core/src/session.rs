//! Scoped ownership of the engine.
use crate::{error::VizdqnError, Game, Scenario};
use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

/// An open engine session.
///
/// Opening initializes the engine with a scenario; dropping the session closes the
/// engine, whether the training loop finished or bailed out with an error.
/// Switching scenarios closes and reinitializes the engine.
pub struct GameSession<G: Game> {
    game: G,
    scenario_dir: PathBuf,

    // `None` while closed.
    scenario: Option<Scenario>,
}

impl<G: Game> GameSession<G> {
    /// Initializes `game` with `scenario`.
    pub fn open(game: G, scenario: &Scenario, scenario_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut session = Self {
            game,
            scenario_dir: scenario_dir.into(),
            scenario: None,
        };
        session.init(scenario)?;
        Ok(session)
    }

    fn init(&mut self, scenario: &Scenario) -> Result<()> {
        info!("Setting up map {}", scenario.name);
        if let Err(e) = self.game.init(scenario, &self.scenario_dir) {
            // The engine may be half-started
            self.game.close();
            return Err(e);
        }
        self.scenario = Some(scenario.clone());
        Ok(())
    }

    /// Closes the engine and reinitializes it with `scenario`.
    pub fn switch(&mut self, scenario: &Scenario) -> Result<()> {
        self.close();
        self.init(scenario)
    }

    /// Closes the engine. Does nothing if already closed.
    pub fn close(&mut self) {
        if self.scenario.take().is_some() {
            self.game.close();
        }
    }

    /// Returns `true` if the engine is initialized.
    pub fn is_open(&self) -> bool {
        self.scenario.is_some()
    }

    /// The scenario currently loaded.
    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    /// Directory scenario files are resolved against.
    pub fn scenario_dir(&self) -> &Path {
        &self.scenario_dir
    }

    /// The engine, if open.
    pub fn game(&self) -> Result<&G> {
        if self.is_open() {
            Ok(&self.game)
        } else {
            Err(VizdqnError::SessionClosed.into())
        }
    }

    /// The engine, if open.
    pub fn game_mut(&mut self) -> Result<&mut G> {
        if self.is_open() {
            Ok(&mut self.game)
        } else {
            Err(VizdqnError::SessionClosed.into())
        }
    }
}

impl<G: Game> Drop for GameSession<G> {
    fn drop(&mut self) {
        self.close();
    }
}
