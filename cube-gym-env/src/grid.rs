//! Cube extent, cell coordinates and the linear state indexing.
use crate::CubeGymError;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Add};

/// A cell of the cube, or a displacement between two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Position along the x axis.
    pub x: i64,
    /// Position along the y axis.
    pub y: i64,
    /// Position along the z axis.
    pub z: i64,
}

impl Coordinate {
    /// Constructs a coordinate.
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// L1 distance to `other`.
    pub fn manhattan(&self, other: &Coordinate) -> u64 {
        (self.x - other.x).unsigned_abs()
            + (self.y - other.y).unsigned_abs()
            + (self.z - other.z).unsigned_abs()
    }

    /// Components as `f32`, the layout used in records.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        vec![self.x as f32, self.y as f32, self.z as f32]
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<[i64; 3]> for Coordinate {
    fn from(v: [i64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Coordinate> for [i64; 3] {
    fn from(c: Coordinate) -> Self {
        [c.x, c.y, c.z]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// 1-based linear index of a cell, `x + y * size + z * size^2 + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u64);

impl StateId {
    /// Returns the raw id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Largest edge length whose `size^3` state ids fit into an `i64`.
pub const MAX_SIZE: usize = 2_097_151;

/// An `size x size x size` cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpace {
    size: i64,
}

impl GridSpace {
    /// Constructs the cube.
    ///
    /// # Errors
    ///
    /// [`CubeGymError::InvalidConfiguration`] if `size` is outside `[2, MAX_SIZE]`.
    pub fn new(size: usize) -> Result<Self, CubeGymError> {
        if !(2..=MAX_SIZE).contains(&size) {
            return Err(CubeGymError::InvalidConfiguration(format!(
                "size must be in [2, {}], got {}",
                MAX_SIZE, size
            )));
        }
        Ok(Self { size: size as i64 })
    }

    /// Edge length of the cube.
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Number of cells, `size^3`.
    pub fn n_states(&self) -> u64 {
        (self.size * self.size * self.size) as u64
    }

    /// Returns `true` if every component lies in `[0, size - 1]`.
    pub fn is_in_bounds(&self, c: &Coordinate) -> bool {
        let r = 0..self.size;
        r.contains(&c.x) && r.contains(&c.y) && r.contains(&c.z)
    }

    /// Linear state id of an in-bounds cell.
    pub fn to_state_id(&self, c: &Coordinate) -> StateId {
        debug_assert!(self.is_in_bounds(c), "{} is out of the cube", c);
        StateId((c.x + c.y * self.size + c.z * self.size * self.size + 1) as u64)
    }

    /// Inverse of [`GridSpace::to_state_id`].
    ///
    /// # Errors
    ///
    /// [`CubeGymError::InvalidStateId`] if `id` is outside `[1, size^3]`.
    pub fn from_state_id(&self, id: StateId) -> Result<Coordinate, CubeGymError> {
        if id.0 == 0 || id.0 > self.n_states() {
            return Err(CubeGymError::InvalidStateId(id.0));
        }
        let ix = (id.0 - 1) as i64;
        Ok(Coordinate::new(
            ix % self.size,
            (ix / self.size) % self.size,
            ix / (self.size * self.size),
        ))
    }

    /// State id from a raw integer, checked against the cube.
    pub fn state_id(&self, raw: u64) -> Result<StateId, CubeGymError> {
        let id = StateId(raw);
        self.from_state_id(id).map(|_| id)
    }

    /// Clamps each axis independently into `[0, size - 1]`.
    pub fn clamp(&self, c: Coordinate) -> Coordinate {
        let hi = self.size - 1;
        Coordinate::new(c.x.clamp(0, hi), c.y.clamp(0, hi), c.z.clamp(0, hi))
    }

    /// The start cell `(0, 0, 0)`.
    pub fn origin(&self) -> Coordinate {
        Coordinate::default()
    }

    /// The goal cell `(size - 1, size - 1, size - 1)`.
    pub fn far_corner(&self) -> Coordinate {
        let hi = self.size - 1;
        Coordinate::new(hi, hi, hi)
    }

    /// Iterates over all cells in state id order.
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> {
        let size = self.size;
        (0..size).flat_map(move |z| {
            (0..size).flat_map(move |y| (0..size).map(move |x| Coordinate::new(x, y, z)))
        })
    }
}
