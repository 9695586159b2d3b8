//! A one-dimensional corridor seen from above.
//!
//! The agent starts at a cell of the corridor and must walk to the goal at its
//! right end. Every tic costs `living_reward`; reaching the goal pays `goal_reward`.
use anyhow::{anyhow, Result};
use image::{Rgb, RgbImage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};
use vizdqn_core::{Action, Frame, Game, GameVariable, Scenario};

const BACKGROUND: Rgb<u8> = Rgb([16, 16, 16]);
const GOAL: Rgb<u8> = Rgb([0, 200, 0]);
const AGENT: Rgb<u8> = Rgb([255, 255, 255]);

/// Buttons: move left, move right, stay.
pub const N_BUTTONS: usize = 3;

/// Configuration of a map, read from the scenario's config file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Number of cells. The goal is the last one.
    pub length: usize,

    /// Starting cell.
    pub start: usize,

    /// Episode timeout in tics.
    pub episode_timeout: usize,

    /// Reward of every tic.
    pub living_reward: f32,

    /// Reward for reaching the goal.
    pub goal_reward: f32,

    /// Screen width.
    pub width: u32,

    /// Screen height.
    pub height: u32,
}

impl MapConfig {
    fn check(&self) -> Result<()> {
        if self.length < 2 {
            return Err(anyhow!("corridor needs at least 2 cells, got {}", self.length));
        }
        if self.start >= self.length - 1 {
            return Err(anyhow!("start {} is not before the goal", self.start));
        }
        if (self.width as usize) < self.length || self.height == 0 {
            return Err(anyhow!(
                "screen {}x{} too small for {} cells",
                self.width,
                self.height,
                self.length
            ));
        }
        Ok(())
    }

    fn goal(&self) -> usize {
        self.length - 1
    }
}

/// Maps of a package file.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Package {
    maps: Vec<String>,
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| anyhow!("cannot open {:?}: {}", path, e))?;
    let rdr = BufReader::new(file);
    Ok(serde_yaml::from_reader(rdr)?)
}

#[derive(Default)]
pub struct CorridorGame {
    map: Option<MapConfig>,
    position: usize,
    tic: usize,
}

impl CorridorGame {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> Result<&MapConfig> {
        self.map
            .as_ref()
            .ok_or_else(|| anyhow!("corridor game is not initialized"))
    }

    fn render(&self, map: &MapConfig) -> RgbImage {
        let cell_width = map.width as usize / map.length;
        let mut img = RgbImage::from_pixel(map.width, map.height, BACKGROUND);
        for (cell, color) in [(map.goal(), GOAL), (self.position, AGENT)] {
            let x0 = cell * cell_width;
            for x in x0..x0 + cell_width {
                for y in 0..map.height {
                    img.put_pixel(x as u32, y, color);
                }
            }
        }
        img
    }
}

impl Game for CorridorGame {
    fn init(&mut self, scenario: &Scenario, scenario_dir: &Path) -> Result<()> {
        let package: Package = load_yaml(&scenario.package_path(scenario_dir))?;
        if !package.maps.contains(&scenario.map) {
            return Err(anyhow!("{} has no map {}", scenario.name, scenario.map));
        }
        let map: MapConfig = load_yaml(&scenario.config_path(scenario_dir))?;
        map.check()?;

        debug!("Loaded {} {}: {:?}", scenario.name, scenario.map, map);
        self.position = map.start;
        self.tic = 0;
        self.map = Some(map);
        Ok(())
    }

    fn new_episode(&mut self) -> Result<()> {
        self.position = self.map()?.start;
        self.tic = 0;
        Ok(())
    }

    fn is_episode_finished(&self) -> bool {
        match &self.map {
            Some(map) => self.position == map.goal() || self.tic >= map.episode_timeout,
            None => true,
        }
    }

    fn screen(&mut self) -> Result<Frame> {
        if self.is_episode_finished() {
            return Err(anyhow!("no screen after the episode finished"));
        }
        let map = self.map()?;
        Ok(Frame::Rgb(self.render(map)))
    }

    fn make_action(&mut self, action: &Action, repeat: usize) -> Result<f32> {
        let map = self.map()?.clone();
        if action.len() != N_BUTTONS {
            return Err(anyhow!("{} buttons pressed, expected {}", action.len(), N_BUTTONS));
        }
        let buttons = action.buttons();
        let mut reward = 0.0;

        for _ in 0..repeat {
            if self.is_episode_finished() {
                break;
            }
            match (buttons[0], buttons[1]) {
                (true, false) => self.position = self.position.saturating_sub(1),
                (false, true) => self.position = (self.position + 1).min(map.goal()),
                _ => {}
            }
            self.tic += 1;
            reward += map.living_reward;
            if self.position == map.goal() {
                reward += map.goal_reward;
            }
        }
        Ok(reward)
    }

    fn episode_timeout(&self) -> usize {
        self.map.as_ref().map_or(0, |map| map.episode_timeout)
    }

    fn game_variable(&self, var: GameVariable) -> Result<f64> {
        let map = self.map()?;
        match var {
            GameVariable::User1 => Ok((map.goal() - self.position) as f64),
            GameVariable::User2 => Ok((map.goal() - map.start) as f64),
            GameVariable::User3 => Err(anyhow!("{:?} is not exported", var)),
        }
    }

    fn available_buttons(&self) -> usize {
        N_BUTTONS
    }

    fn close(&mut self) {
        self.map = None;
    }
}
