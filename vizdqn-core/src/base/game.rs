//! Game engine.
use crate::{Action, Frame, Scenario};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named variables exported by the engine.
///
/// Scenarios with distance-based shaping export the distance to the goal in user
/// variables.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum GameVariable {
    /// First user variable.
    User1,

    /// Second user variable.
    User2,

    /// Third user variable.
    User3,
}

/// A first-person shooter engine, seen from the training loop.
///
/// An implementation holds a connection to a stateful engine process. It is wrapped
/// in a [`GameSession`](crate::GameSession), which owns the open/close lifecycle.
pub trait Game {
    /// Loads a scenario and starts the engine.
    ///
    /// Paths of the scenario files are resolved against `scenario_dir`.
    fn init(&mut self, scenario: &Scenario, scenario_dir: &Path) -> Result<()>;

    /// Starts a new episode.
    fn new_episode(&mut self) -> Result<()>;

    /// Returns `true` if the current episode has ended.
    ///
    /// Calls within the same tic are expected to return the same value.
    fn is_episode_finished(&self) -> bool;

    /// Returns the current screen buffer.
    ///
    /// No screen is available after the episode has finished.
    fn screen(&mut self) -> Result<Frame>;

    /// Holds `action` for `repeat` tics and returns the reward collected meanwhile.
    fn make_action(&mut self, action: &Action, repeat: usize) -> Result<f32>;

    /// Episode timeout in tics.
    fn episode_timeout(&self) -> usize;

    /// Returns the value of a game variable.
    fn game_variable(&self, var: GameVariable) -> Result<f64>;

    /// The number of buttons of the loaded scenario.
    fn available_buttons(&self) -> usize;

    /// Shuts the engine down.
    fn close(&mut self);
}
