//! Configuration of [`CubeGymEnv`](crate::CubeGymEnv) and [`EpisodeController`](crate::EpisodeController).
use crate::{grid::MAX_SIZE, obstacle::MIN_SIZE_RANDOM_OBSTACLES, CubeGymError};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Reward values of the transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Reward for moving onto the target.
    pub goal: i32,

    /// Reward when the agent sits on an obstacle or pushes against the cube boundary.
    pub collision: i32,

    /// Added once per obstacle at L1 distance 1.
    pub proximity: i32,

    /// Added on every non-terminal step.
    pub step: i32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            goal: 100,
            collision: -20,
            proximity: -10,
            step: -1,
        }
    }
}

/// Rule set of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CubeVariant {
    /// Start at the origin, target at the far corner, obstacles and shaped
    /// rewards. Pushing against the boundary ends the episode.
    Obstacles,

    /// Random start on the `z = 0` plane and random target on the
    /// `z = size - 1` plane. No obstacles, moves are clipped into the cube and
    /// the reward is 1 on the target, 0 otherwise.
    Sparse,
}

impl Default for CubeVariant {
    fn default() -> Self {
        Self::Obstacles
    }
}

/// Configuration of the cube environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeGymConfig {
    /// Rule set.
    pub variant: CubeVariant,

    /// Edge length of the cube.
    pub size: usize,

    /// Use the fixed obstacle layout instead of random cells.
    pub deterministic_obstacles: bool,

    /// Number of random obstacles. Ignored when `deterministic_obstacles` is set.
    pub obstacle_count: i64,

    /// Draw a new obstacle field on every reset.
    pub regenerate_obstacles: bool,

    /// Truncate episodes after this many steps. Only applied by [`CubeGymEnv`](crate::CubeGymEnv).
    pub max_steps: Option<usize>,

    /// Reward values.
    pub rewards: RewardConfig,
}

impl Default for CubeGymConfig {
    fn default() -> Self {
        Self {
            variant: CubeVariant::default(),
            size: 5,
            deterministic_obstacles: true,
            obstacle_count: 3,
            regenerate_obstacles: false,
            max_steps: None,
            rewards: RewardConfig::default(),
        }
    }
}

impl CubeGymConfig {
    /// Selects the rule set.
    pub fn variant(mut self, v: CubeVariant) -> Self {
        self.variant = v;
        self
    }

    /// Sets the edge length of the cube.
    pub fn size(mut self, v: usize) -> Self {
        self.size = v;
        self
    }

    /// Selects the fixed obstacle layout.
    pub fn deterministic_obstacles(mut self, v: bool) -> Self {
        self.deterministic_obstacles = v;
        self
    }

    /// Sets the number of random obstacles.
    pub fn obstacle_count(mut self, v: i64) -> Self {
        self.obstacle_count = v;
        self
    }

    /// Redraws obstacles on every reset when `true`.
    pub fn regenerate_obstacles(mut self, v: bool) -> Self {
        self.regenerate_obstacles = v;
        self
    }

    /// Sets the truncation horizon.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the reward values.
    pub fn rewards(mut self, v: RewardConfig) -> Self {
        self.rewards = v;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// [`CubeGymError::InvalidConfiguration`] if `size` is outside `[2, MAX_SIZE]`,
    /// `obstacle_count < 0`, or random obstacles are requested on a cube without
    /// interior cells.
    pub fn validate(&self) -> Result<(), CubeGymError> {
        if !(2..=MAX_SIZE).contains(&self.size) {
            return Err(CubeGymError::InvalidConfiguration(format!(
                "size must be in [2, {}], got {}",
                MAX_SIZE, self.size
            )));
        }
        if self.obstacle_count < 0 {
            return Err(CubeGymError::InvalidConfiguration(format!(
                "obstacle_count must not be negative, got {}",
                self.obstacle_count
            )));
        }
        if self.variant == CubeVariant::Obstacles
            && !self.deterministic_obstacles
            && self.obstacle_count > 0
            && self.size < MIN_SIZE_RANDOM_OBSTACLES
        {
            return Err(CubeGymError::InvalidConfiguration(format!(
                "random obstacles need size >= {}, got {}",
                MIN_SIZE_RANDOM_OBSTACLES, self.size
            )));
        }
        Ok(())
    }

    /// Loads the configuration from a yaml file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves the configuration to a yaml file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
