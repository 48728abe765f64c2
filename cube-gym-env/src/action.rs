//! The five directional moves.
use crate::{Coordinate, CubeGymError};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Number of actions.
pub const N_ACTIONS: usize = 5;

/// A move of the agent. There is no move decreasing `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// `(+1, 0, 0)`
    Right = 0,
    /// `(0, +1, 0)`
    Up = 1,
    /// `(-1, 0, 0)`
    Left = 2,
    /// `(0, -1, 0)`
    Down = 3,
    /// `(0, 0, +1)`
    Forward = 4,
}

// Indexed by `Action as usize`.
const DELTAS: [Coordinate; N_ACTIONS] = [
    Coordinate::new(1, 0, 0),
    Coordinate::new(0, 1, 0),
    Coordinate::new(-1, 0, 0),
    Coordinate::new(0, -1, 0),
    Coordinate::new(0, 0, 1),
];

impl Action {
    /// All actions in id order.
    pub const ALL: [Action; N_ACTIONS] = [
        Action::Right,
        Action::Up,
        Action::Left,
        Action::Down,
        Action::Forward,
    ];

    /// Displacement applied by the action.
    pub fn delta(self) -> Coordinate {
        DELTAS[self as usize]
    }

    /// Integer id in `[0, 4]`.
    pub fn id(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for Action {
    type Error = CubeGymError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        if (0..N_ACTIONS as i64).contains(&id) {
            Ok(Action::ALL[id as usize])
        } else {
            Err(CubeGymError::InvalidAction(id))
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Right => "right",
            Action::Up => "up",
            Action::Left => "left",
            Action::Down => "down",
            Action::Forward => "forward",
        };
        f.write_str(name)
    }
}
