//! Static obstacles of an episode.
use crate::{Coordinate, CubeGymError, GridSpace};
use log::{info, warn};
use rand::Rng;

/// Cells of the fixed layout. They are not scaled with the cube size.
pub const FIXED_OBSTACLES: [[i64; 3]; 6] = [
    [1, 1, 3],
    [2, 3, 3],
    [4, 4, 6],
    [3, 4, 5],
    [5, 5, 7],
    [7, 7, 7],
];

/// Smallest cube with a non-empty interior range `[2, size - 3]` for random obstacles.
pub const MIN_SIZE_RANDOM_OBSTACLES: usize = 5;

/// Forbidden cells.
///
/// The cells are kept in generation order. Random fields may contain duplicates,
/// and every entry counts separately towards the proximity penalty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObstacleField {
    cells: Vec<Coordinate>,
}

impl ObstacleField {
    /// Builds a field from explicit cells.
    pub fn from_cells(cells: Vec<Coordinate>) -> Self {
        Self { cells }
    }

    /// The fixed six-cell layout.
    pub fn fixed() -> Self {
        Self::from_cells(FIXED_OBSTACLES.iter().map(|&c| c.into()).collect())
    }

    /// `count` cells drawn uniformly from `[2, size - 3]` on each axis.
    ///
    /// # Errors
    ///
    /// [`CubeGymError::InvalidConfiguration`] if `count > 0` and the cube is
    /// smaller than [`MIN_SIZE_RANDOM_OBSTACLES`].
    pub fn random<R: Rng>(
        grid: &GridSpace,
        count: usize,
        rng: &mut R,
    ) -> Result<Self, CubeGymError> {
        if count == 0 {
            return Ok(Self::default());
        }
        if grid.size() < MIN_SIZE_RANDOM_OBSTACLES {
            return Err(CubeGymError::InvalidConfiguration(format!(
                "random obstacles need size >= {}, got {}",
                MIN_SIZE_RANDOM_OBSTACLES,
                grid.size()
            )));
        }
        let hi = grid.size() as i64 - 2;
        let cells = (0..count)
            .map(|_| {
                Coordinate::new(
                    rng.gen_range(2..hi),
                    rng.gen_range(2..hi),
                    rng.gen_range(2..hi),
                )
            })
            .collect();
        Ok(Self { cells })
    }

    /// Fixed layout if `deterministic`, otherwise `count` random cells.
    pub fn create<R: Rng>(
        grid: &GridSpace,
        count: usize,
        deterministic: bool,
        rng: &mut R,
    ) -> Result<Self, CubeGymError> {
        let field = if deterministic {
            let field = Self::fixed();
            let n_out = field.iter().filter(|c| !grid.is_in_bounds(c)).count();
            if n_out > 0 {
                warn!(
                    "{} of {} fixed obstacles lie outside the cube of size {}",
                    n_out,
                    field.len(),
                    grid.size()
                );
            }
            field
        } else {
            Self::random(grid, count, rng)?
        };
        info!("Obstacles: {:?}", field.cells);
        Ok(field)
    }

    /// Iterates over the cells.
    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.cells.iter()
    }

    /// The cells as a slice.
    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if there is no obstacle.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if `c` is an obstacle.
    pub fn contains(&self, c: &Coordinate) -> bool {
        self.cells.contains(c)
    }

    /// Number of entries at L1 distance exactly 1 from `c`.
    pub fn adjacent_count(&self, c: &Coordinate) -> usize {
        self.cells.iter().filter(|o| o.manhattan(c) == 1).count()
    }
}

impl<'a> IntoIterator for &'a ObstacleField {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
