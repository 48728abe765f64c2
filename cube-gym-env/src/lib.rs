#![warn(missing_docs)]
//! A deterministic 3D grid-world for reinforcement learning.
//!
//! The agent starts at `(0, 0, 0)` of an `N x N x N` cube and has to reach the far
//! corner `(N - 1, N - 1, N - 1)` while avoiding static obstacles. Five moves are
//! available ([`Action`]); none of them decreases `z`.
//!
//! ## Rewards
//!
//! [`transition::evaluate`] maps the current cell and a move to a [`Transition`]:
//!
//! * standing on an obstacle or pushing against the cube boundary ends the
//!   episode in place with `-20`,
//! * moving onto the target ends the episode with `+100`,
//! * any other move costs `1`, plus `10` for every obstacle next to the current cell.
//!
//! The values can be changed through [`RewardConfig`].
//!
//! ## Episodes
//!
//! [`EpisodeController`] owns the state of one episode and turns transitions into
//! [`StepOutcome`]s. [`CubeGymEnv`] wraps it as a [`cube_gym_core::Env`] so that
//! the generic evaluators and rollout utilities can drive it.
//!
//! ```rust
//! use cube_gym_env::{Action, CubeGymConfig, EpisodeController, ObstacleField};
//!
//! let config = CubeGymConfig::default().size(3);
//! let mut ctrl = EpisodeController::with_obstacles(config, ObstacleField::default()).unwrap();
//! ctrl.reset(None);
//! let outcome = ctrl.step(Action::Right);
//! assert_eq!(outcome.reward(), -1);
//! assert!(!outcome.is_terminated());
//! ```
mod action;
mod base;
mod config;
mod episode;
mod error;
mod grid;
pub mod obstacle;
mod policy;
pub mod transition;

pub use action::{Action, N_ACTIONS};
pub use base::CubeGymEnv;
pub use config::{CubeGymConfig, CubeVariant, RewardConfig};
pub use episode::{
    EpisodeController, EpisodePhase, EpisodeState, Observation, Snapshot, StepInfo, StepOutcome,
};
pub use error::CubeGymError;
pub use grid::{Coordinate, GridSpace, StateId, MAX_SIZE};
pub use obstacle::ObstacleField;
pub use policy::{RandomPolicy, RandomPolicyConfig};
pub use transition::{FailureCause, Transition, SPARSE_GOAL_REWARD};
