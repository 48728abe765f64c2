//! Episode lifecycle on top of [`transition::evaluate`](crate::transition::evaluate).
use crate::{
    transition::{self, Transition},
    Action, Coordinate, CubeGymConfig, CubeGymError, CubeVariant, GridSpace, ObstacleField,
    StateId,
};
use log::{debug, error, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::convert::TryFrom;

/// What the agent sees after `reset` and every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Position of the agent.
    pub agent: Coordinate,
    /// Position of the target.
    pub target: Coordinate,
}

/// Bookkeeping returned alongside every observation.
///
/// `current_*` describe the cell the step started from and `next_*` the cell it
/// ended in. After a failure both pairs hold the same cell. After a reset the
/// `next_*` fields are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    /// State id of the cell the step started from.
    pub current_state: StateId,
    /// State id of the cell the step ended in.
    pub next_state: Option<StateId>,
    /// Cell the step started from.
    pub current_location: Coordinate,
    /// Cell the step ended in.
    pub next_location: Option<Coordinate>,
    /// L1 distance between agent and target.
    pub distance: u64,
}

/// Phase of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EpisodePhase {
    /// Not terminated. Covers the freshly reset episode.
    Active,
    /// Ended on an obstacle or the cube boundary.
    TerminatedFailure,
    /// Ended on the target.
    TerminatedSuccess,
}

impl EpisodePhase {
    /// Returns `true` for both terminal phases.
    pub fn is_terminal(self) -> bool {
        self != EpisodePhase::Active
    }
}

/// Mutable state of one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeState {
    location: Coordinate,
    state: StateId,
    next_location: Option<Coordinate>,
    next_state: Option<StateId>,
    path: Vec<Coordinate>,
    phase: EpisodePhase,
    final_outcome: Option<StepOutcome>,
}

impl EpisodeState {
    fn start(grid: &GridSpace, location: Coordinate) -> Self {
        Self {
            location,
            state: grid.to_state_id(&location),
            next_location: None,
            next_state: None,
            path: vec![location],
            phase: EpisodePhase::Active,
            final_outcome: None,
        }
    }

    /// Current cell of the agent.
    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// State id of the current cell.
    pub fn state(&self) -> StateId {
        self.state
    }

    /// Cell reached by the last step.
    pub fn next_location(&self) -> Option<Coordinate> {
        self.next_location
    }

    /// State id of the cell reached by the last step.
    pub fn next_state(&self) -> Option<StateId> {
        self.next_state
    }

    /// Visited cells including the start, one entry per step after it.
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    /// Number of steps taken since the last reset.
    pub fn steps(&self) -> usize {
        self.path.len() - 1
    }

    /// Phase of the episode.
    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// The step that ended the episode.
    pub fn final_outcome(&self) -> Option<&StepOutcome> {
        self.final_outcome.as_ref()
    }
}

/// Result of [`EpisodeController::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The agent moved and the episode goes on.
    Continue {
        /// Reward of the step.
        reward: i32,
        /// Observation after the move.
        observation: Observation,
        /// Bookkeeping of the move.
        info: StepInfo,
    },
    /// The episode ended.
    Terminate {
        /// Reward of the step.
        reward: i32,
        /// `true` if the agent moved onto the target, `false` on failure.
        reached_goal: bool,
        /// Final observation.
        observation: Observation,
        /// Bookkeeping of the final step.
        info: StepInfo,
    },
}

impl StepOutcome {
    /// Reward of the step.
    pub fn reward(&self) -> i32 {
        match self {
            StepOutcome::Continue { reward, .. } | StepOutcome::Terminate { reward, .. } => {
                *reward
            }
        }
    }

    /// Returns `true` if the episode ended.
    pub fn is_terminated(&self) -> bool {
        matches!(self, StepOutcome::Terminate { .. })
    }

    /// Returns `true` if the episode ended on the target.
    pub fn reached_goal(&self) -> bool {
        matches!(
            self,
            StepOutcome::Terminate {
                reached_goal: true,
                ..
            }
        )
    }

    /// Observation after the step.
    pub fn observation(&self) -> &Observation {
        match self {
            StepOutcome::Continue { observation, .. }
            | StepOutcome::Terminate { observation, .. } => observation,
        }
    }

    /// Bookkeeping of the step.
    pub fn info(&self) -> &StepInfo {
        match self {
            StepOutcome::Continue { info, .. } | StepOutcome::Terminate { info, .. } => info,
        }
    }
}

/// Read-only copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Edge length of the cube.
    pub size: usize,
    /// Position of the agent.
    pub agent: Coordinate,
    /// Position of the target.
    pub target: Coordinate,
    /// Obstacle cells.
    pub obstacles: Vec<Coordinate>,
    /// Visited cells.
    pub path: Vec<Coordinate>,
    /// Phase of the episode.
    pub phase: EpisodePhase,
}

/// Drives reset/step cycles of a single episode.
///
/// Each controller owns its [`EpisodeState`], so independent controllers can run
/// side by side.
#[derive(Debug, Clone)]
pub struct EpisodeController {
    grid: GridSpace,
    config: CubeGymConfig,
    obstacles: ObstacleField,
    target: Coordinate,
    state: EpisodeState,
    rng: StdRng,
}

impl EpisodeController {
    /// Builds a controller and its obstacle field from `seed`.
    ///
    /// The episode is ready to step right away; calling [`reset`](Self::reset)
    /// first is not required.
    ///
    /// # Errors
    ///
    /// [`CubeGymError::InvalidConfiguration`] if the configuration does not validate.
    pub fn new(config: CubeGymConfig, seed: u64) -> Result<Self, CubeGymError> {
        config.validate()?;
        let grid = GridSpace::new(config.size)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let obstacles = Self::create_obstacles(&grid, &config, &mut rng)?;
        Ok(Self::assemble(grid, config, obstacles, rng))
    }

    /// Builds a controller with an explicit obstacle field.
    ///
    /// The field is kept across resets unless `regenerate_obstacles` is set.
    /// It has no effect on [`CubeVariant::Sparse`].
    pub fn with_obstacles(
        config: CubeGymConfig,
        obstacles: ObstacleField,
    ) -> Result<Self, CubeGymError> {
        config.validate()?;
        let grid = GridSpace::new(config.size)?;
        Ok(Self::assemble(grid, config, obstacles, StdRng::seed_from_u64(0)))
    }

    fn assemble(
        grid: GridSpace,
        config: CubeGymConfig,
        obstacles: ObstacleField,
        rng: StdRng,
    ) -> Self {
        let mut ctrl = Self {
            target: grid.far_corner(),
            state: EpisodeState::start(&grid, grid.origin()),
            grid,
            config,
            obstacles,
            rng,
        };
        ctrl.place();
        ctrl
    }

    fn create_obstacles(
        grid: &GridSpace,
        config: &CubeGymConfig,
        rng: &mut StdRng,
    ) -> Result<ObstacleField, CubeGymError> {
        match config.variant {
            CubeVariant::Obstacles => ObstacleField::create(
                grid,
                config.obstacle_count as usize,
                config.deterministic_obstacles,
                rng,
            ),
            CubeVariant::Sparse => Ok(ObstacleField::default()),
        }
    }

    /// Puts agent and target on their start cells and clears the episode.
    fn place(&mut self) {
        let (start, target) = match self.config.variant {
            CubeVariant::Obstacles => (self.grid.origin(), self.grid.far_corner()),
            CubeVariant::Sparse => {
                let n = self.grid.size() as i64;
                let start = Coordinate::new(
                    self.rng.gen_range(0..n),
                    self.rng.gen_range(0..n),
                    0,
                );
                let target = Coordinate::new(
                    self.rng.gen_range(0..n),
                    self.rng.gen_range(0..n),
                    n - 1,
                );
                (start, target)
            }
        };
        self.target = target;
        self.state = EpisodeState::start(&self.grid, start);
    }

    /// Starts a new episode.
    ///
    /// [`CubeVariant::Obstacles`] starts at the origin with the target in the
    /// far corner. [`CubeVariant::Sparse`] draws both from the generator.
    /// `seed` reseeds the generator used for random obstacles and placement.
    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, StepInfo) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        if self.config.regenerate_obstacles {
            match Self::create_obstacles(&self.grid, &self.config, &mut self.rng) {
                Ok(obstacles) => self.obstacles = obstacles,
                Err(e) => error!("Failed to regenerate obstacles, keeping the old ones: {}", e),
            }
        }
        self.place();
        debug!(
            "Reset episode, agent = {}, target = {}",
            self.state.location, self.target
        );

        (self.observation(), self.info())
    }

    /// Applies `action` to the current episode.
    ///
    /// Once the episode has ended, every further call returns the step that
    /// ended it and leaves the state untouched until [`reset`](Self::reset).
    pub fn step(&mut self, action: Action) -> StepOutcome {
        if let Some(outcome) = self.state.final_outcome {
            trace!("step {} on a terminated episode", action);
            return outcome;
        }

        let transition = match self.config.variant {
            CubeVariant::Obstacles => transition::evaluate(
                &self.state.location,
                action,
                &self.obstacles,
                &self.target,
                &self.grid,
                &self.config.rewards,
            ),
            CubeVariant::Sparse => transition::evaluate_sparse(
                &self.state.location,
                action,
                &self.target,
                &self.grid,
            ),
        };
        trace!(
            "step {}: {} at {} -> {:?}",
            self.state.steps(),
            action,
            self.state.location,
            transition
        );

        let outcome = match transition {
            Transition::Continue { reward } => {
                let info = self.advance(action);
                StepOutcome::Continue {
                    reward,
                    observation: self.observation(),
                    info,
                }
            }
            Transition::Failure { cause, reward } => {
                let state = &mut self.state;
                state.next_location = Some(state.location);
                state.next_state = Some(state.state);
                state.path.push(state.location);
                state.phase = EpisodePhase::TerminatedFailure;
                debug!(
                    "Episode failed at {} after {} steps: {:?}",
                    state.location,
                    state.steps(),
                    cause
                );
                StepOutcome::Terminate {
                    reward,
                    reached_goal: false,
                    observation: self.observation(),
                    info: self.info(),
                }
            }
            Transition::Goal { reward } => {
                let info = self.advance(action);
                self.state.phase = EpisodePhase::TerminatedSuccess;
                debug!("Reached the target after {} steps", self.state.steps());
                StepOutcome::Terminate {
                    reward,
                    reached_goal: true,
                    observation: self.observation(),
                    info,
                }
            }
        };
        if outcome.is_terminated() {
            self.state.final_outcome = Some(outcome);
        }

        outcome
    }

    /// Like [`step`](Self::step) with a raw action id.
    ///
    /// # Errors
    ///
    /// [`CubeGymError::InvalidAction`] if `id` is outside `[0, 4]`, checked
    /// before anything else.
    pub fn step_id(&mut self, id: i64) -> Result<StepOutcome, CubeGymError> {
        let action = Action::try_from(id)?;
        Ok(self.step(action))
    }

    /// Moves the agent, records the cell and returns the info of the move.
    fn advance(&mut self, action: Action) -> StepInfo {
        let next = self.grid.clamp(self.state.location + action.delta());
        let next_state = self.grid.to_state_id(&next);
        let state = &mut self.state;

        state.next_location = Some(next);
        state.next_state = Some(next_state);
        state.path.push(next);
        let info = StepInfo {
            current_state: state.state,
            next_state: Some(next_state),
            current_location: state.location,
            next_location: Some(next),
            distance: next.manhattan(&self.target),
        };
        state.location = next;
        state.state = next_state;
        info
    }

    /// Observation of the current state.
    pub fn observation(&self) -> Observation {
        Observation {
            agent: self.state.location,
            target: self.target,
        }
    }

    /// Info of the current state, as returned by the last `reset` or failed `step`.
    pub fn info(&self) -> StepInfo {
        StepInfo {
            current_state: self.state.state,
            next_state: self.state.next_state,
            current_location: self.state.location,
            next_location: self.state.next_location,
            distance: self.state.location.manhattan(&self.target),
        }
    }

    /// Current cell of the agent.
    pub fn agent_location(&self) -> Coordinate {
        self.state.location
    }

    /// The target cell.
    pub fn target_location(&self) -> Coordinate {
        self.target
    }

    /// Obstacles of the current episode.
    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    /// The cube.
    pub fn grid(&self) -> &GridSpace {
        &self.grid
    }

    /// Edge length of the cube.
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Visited cells.
    pub fn path(&self) -> &[Coordinate] {
        &self.state.path
    }

    /// State of the current episode.
    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    /// Configuration the controller was built with.
    pub fn config(&self) -> &CubeGymConfig {
        &self.config
    }

    /// Copies the state needed for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.grid.size(),
            agent: self.state.location,
            target: self.target,
            obstacles: self.obstacles.cells().to_vec(),
            path: self.state.path.clone(),
            phase: self.state.phase,
        }
    }
}
