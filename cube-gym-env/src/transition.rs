//! Reward and termination rules of a single move.
//!
//! [`evaluate`] applies the rules below in order; the first one that fires
//! decides the result.
//!
//! 1. The agent currently sits on an obstacle: failure with the collision reward.
//!    The check looks at the position *before* the move.
//! 2. Every obstacle at L1 distance 1 from the current position adds the
//!    proximity penalty to a running reward.
//! 3. The move pushes against the cube boundary: failure with the collision
//!    reward. The proximity penalty is dropped.
//! 4. The move lands on the target: success with the goal reward.
//! 5. Otherwise the move continues with the running reward plus the step cost.
//!
//! [`evaluate_sparse`] is the rule set of [`CubeVariant::Sparse`](crate::CubeVariant::Sparse):
//! the move is clipped into the cube, never fails, and pays
//! [`SPARSE_GOAL_REWARD`] on the target and nothing elsewhere.
use crate::{Action, Coordinate, GridSpace, ObstacleField, RewardConfig};
use serde::{Deserialize, Serialize};

/// Reward of [`evaluate_sparse`] on reaching the target.
pub const SPARSE_GOAL_REWARD: i32 = 1;

/// Why an episode ended without reaching the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    /// The agent stands on an obstacle.
    Obstacle,
    /// The move leaves the cube.
    Boundary,
}

/// Result of evaluating a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The move is applied and the episode goes on.
    Continue {
        /// Step cost plus proximity penalties.
        reward: i32,
    },
    /// The episode ends in place.
    Failure {
        /// The rule that fired.
        cause: FailureCause,
        /// Collision reward.
        reward: i32,
    },
    /// The move lands on the target and ends the episode.
    Goal {
        /// Goal reward.
        reward: i32,
    },
}

impl Transition {
    /// Reward of the move.
    pub fn reward(&self) -> i32 {
        match *self {
            Transition::Continue { reward }
            | Transition::Failure { reward, .. }
            | Transition::Goal { reward } => reward,
        }
    }

    /// Returns `true` for [`Transition::Failure`] and [`Transition::Goal`].
    pub fn is_terminated(&self) -> bool {
        !matches!(self, Transition::Continue { .. })
    }

    /// Returns `true` for [`Transition::Goal`].
    pub fn reached_goal(&self) -> bool {
        matches!(self, Transition::Goal { .. })
    }
}

/// Evaluates `action` taken at `current`.
pub fn evaluate(
    current: &Coordinate,
    action: Action,
    obstacles: &ObstacleField,
    target: &Coordinate,
    grid: &GridSpace,
    rewards: &RewardConfig,
) -> Transition {
    if obstacles.contains(current) {
        return Transition::Failure {
            cause: FailureCause::Obstacle,
            reward: rewards.collision,
        };
    }
    let reward = rewards.proximity * obstacles.adjacent_count(current) as i32;

    if hits_boundary(current, action, grid) {
        return Transition::Failure {
            cause: FailureCause::Boundary,
            reward: rewards.collision,
        };
    }

    if *current + action.delta() == *target {
        return Transition::Goal {
            reward: rewards.goal,
        };
    }

    Transition::Continue {
        reward: reward + rewards.step,
    }
}

/// Evaluates `action` taken at `current` under the sparse rules.
pub fn evaluate_sparse(
    current: &Coordinate,
    action: Action,
    target: &Coordinate,
    grid: &GridSpace,
) -> Transition {
    if grid.clamp(*current + action.delta()) == *target {
        Transition::Goal {
            reward: SPARSE_GOAL_REWARD,
        }
    } else {
        Transition::Continue { reward: 0 }
    }
}

/// Returns `true` if `action` pushes `c` against the bound of its axis.
fn hits_boundary(c: &Coordinate, action: Action, grid: &GridSpace) -> bool {
    let hi = grid.size() as i64 - 1;
    match action {
        Action::Right => c.x == hi,
        Action::Left => c.x == 0,
        Action::Up => c.y == hi,
        Action::Down => c.y == 0,
        Action::Forward => c.z == hi,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn setup(size: usize, obstacles: Vec<Coordinate>) -> (GridSpace, ObstacleField, Coordinate) {
        let grid = GridSpace::new(size).unwrap();
        let target = grid.far_corner();
        (grid, ObstacleField::from_cells(obstacles), target)
    }

    #[test]
    fn test_step_cost_is_uniform() {
        let (grid, obstacles, target) = setup(5, vec![]);
        let rewards = RewardConfig::default();
        let c = Coordinate::new(2, 2, 2);
        for a in &Action::ALL {
            let t = evaluate(&c, *a, &obstacles, &target, &grid, &rewards);
            assert_eq!(t, Transition::Continue { reward: -1 });
        }
    }

    #[test]
    fn test_occupancy_checks_current_cell() {
        let c = Coordinate::new(1, 1, 1);
        let (grid, obstacles, target) = setup(5, vec![Coordinate::new(2, 1, 1), c]);
        let rewards = RewardConfig::default();
        for a in &Action::ALL {
            let t = evaluate(&c, *a, &obstacles, &target, &grid, &rewards);
            assert_eq!(
                t,
                Transition::Failure {
                    cause: FailureCause::Obstacle,
                    reward: -20
                }
            );
        }

        // Moving onto an obstacle is not a collision, only the proximity penalty applies.
        let t = evaluate(
            &Coordinate::new(1, 1, 0),
            Action::Forward,
            &obstacles,
            &target,
            &grid,
            &rewards,
        );
        assert_eq!(t, Transition::Continue { reward: -11 });
    }

    #[test]
    fn test_proximity_penalty_stacks() {
        let (grid, obstacles, target) = setup(
            5,
            vec![
                Coordinate::new(1, 2, 2),
                Coordinate::new(2, 2, 3),
                Coordinate::new(3, 3, 3),
            ],
        );
        let rewards = RewardConfig::default();
        let t = evaluate(
            &Coordinate::new(2, 2, 2),
            Action::Right,
            &obstacles,
            &target,
            &grid,
            &rewards,
        );
        assert_eq!(t, Transition::Continue { reward: -21 });
        assert!(!t.is_terminated());
    }

    #[test]
    fn test_boundary_discards_proximity() {
        let (grid, obstacles, target) = setup(5, vec![Coordinate::new(4, 1, 0)]);
        let rewards = RewardConfig::default();
        let t = evaluate(
            &Coordinate::new(4, 0, 0),
            Action::Right,
            &obstacles,
            &target,
            &grid,
            &rewards,
        );
        assert_eq!(
            t,
            Transition::Failure {
                cause: FailureCause::Boundary,
                reward: -20
            }
        );
        assert!(t.is_terminated());
        assert!(!t.reached_goal());
    }

    #[test]
    fn test_each_boundary() {
        let (grid, obstacles, target) = setup(3, vec![]);
        let rewards = RewardConfig::default();
        let cases = [
            (Coordinate::new(2, 0, 0), Action::Right),
            (Coordinate::new(0, 1, 0), Action::Left),
            (Coordinate::new(0, 2, 0), Action::Up),
            (Coordinate::new(1, 0, 1), Action::Down),
            (Coordinate::new(0, 0, 2), Action::Forward),
        ];
        for (c, a) in &cases {
            let t = evaluate(c, *a, &obstacles, &target, &grid, &rewards);
            assert_eq!(t.reward(), -20, "{} {}", c, a);
            assert!(t.is_terminated());
        }
    }

    #[test]
    fn test_goal() {
        let (grid, obstacles, target) = setup(3, vec![]);
        let rewards = RewardConfig::default();
        let t = evaluate(
            &Coordinate::new(2, 2, 1),
            Action::Forward,
            &obstacles,
            &target,
            &grid,
            &rewards,
        );
        assert_eq!(t, Transition::Goal { reward: 100 });
        assert!(t.is_terminated());
        assert!(t.reached_goal());
    }

    #[test]
    fn test_sparse_rules() {
        let grid = GridSpace::new(3).unwrap();
        let target = Coordinate::new(1, 0, 2);

        // Pushing against a wall is clipped, not a failure.
        let t = evaluate_sparse(&Coordinate::new(0, 0, 0), Action::Left, &target, &grid);
        assert_eq!(t, Transition::Continue { reward: 0 });
        let t = evaluate_sparse(&Coordinate::new(2, 2, 2), Action::Forward, &target, &grid);
        assert_eq!(t, Transition::Continue { reward: 0 });

        let t = evaluate_sparse(&Coordinate::new(1, 0, 1), Action::Forward, &target, &grid);
        assert_eq!(t, Transition::Goal { reward: 1 });
        assert!(t.reached_goal());

        // Clipped moves still count when they end on the target.
        let t = evaluate_sparse(&Coordinate::new(1, 0, 2), Action::Down, &target, &grid);
        assert_eq!(t, Transition::Goal { reward: 1 });
    }

    #[test]
    fn test_custom_rewards() {
        let (grid, obstacles, target) = setup(4, vec![Coordinate::new(1, 0, 0)]);
        let rewards = RewardConfig {
            goal: 1,
            collision: -5,
            proximity: -2,
            step: 0,
        };
        let t = evaluate(
            &Coordinate::new(0, 0, 0),
            Action::Forward,
            &obstacles,
            &target,
            &grid,
            &rewards,
        );
        assert_eq!(t.reward(), -2);
    }
}
