//! [`Env`] implementation of the cube grid-world.
use crate::{Action, CubeGymConfig, EpisodeController, Observation, StepInfo, StepOutcome};
use anyhow::Result;
use cube_gym_core::{
    record::{Record, RecordValue},
    Act, Env, Info, Obs, Step,
};
use log::{info, trace};

impl Obs for Observation {
    fn len(&self) -> usize {
        1
    }
}

impl Act for Action {}

impl Info for StepInfo {}

/// The cube grid-world as an [`Env`].
///
/// Rewards are reported as `f32` and termination as `i8` flags. If
/// [`CubeGymConfig::max_steps`] is set, episodes reaching that many steps are
/// flagged as truncated; the underlying [`EpisodeController`] keeps going until
/// the next reset.
#[derive(Debug)]
pub struct CubeGymEnv {
    controller: EpisodeController,

    max_steps: Option<usize>,

    count_steps: usize,
}

impl CubeGymEnv {
    /// The underlying controller.
    pub fn controller(&self) -> &EpisodeController {
        &self.controller
    }

    fn record(&self, outcome: &StepOutcome) -> Record {
        let state = self.controller.state();
        let kind = match outcome {
            StepOutcome::Continue { .. } => "continue",
            StepOutcome::Terminate {
                reached_goal: true, ..
            } => "goal",
            StepOutcome::Terminate { .. } => "failure",
        };
        Record::from_slice(&[
            ("episode_step", RecordValue::Scalar(state.steps() as f32)),
            ("reward", RecordValue::Scalar(outcome.reward() as f32)),
            // Kept as text, f32 loses ids above 2^24.
            ("state_id", RecordValue::String(state.state().get().to_string())),
            (
                "agent",
                RecordValue::Array1(outcome.observation().agent.to_f32_vec()),
            ),
            ("distance", RecordValue::Scalar(outcome.info().distance as f32)),
            ("outcome", RecordValue::String(kind.to_string())),
        ])
    }
}

impl Env for CubeGymEnv {
    type Config = CubeGymConfig;
    type Obs = Observation;
    type Act = Action;
    type Info = StepInfo;

    /// Builds the environment. `seed` seeds obstacle generation and sparse placement.
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let controller = EpisodeController::new(config.clone(), seed as u64)?;
        info!(
            "Initialize CubeGymEnv: {:?}, size = {}, {} obstacles",
            config.variant,
            controller.size(),
            controller.obstacles().len()
        );
        Ok(Self {
            controller,
            max_steps: config.max_steps,
            count_steps: 0,
        })
    }

    /// Resets the environment if `is_done` is `None` or `is_done[0] != 0`.
    ///
    /// Otherwise the current observation is returned unchanged.
    fn reset(&mut self, is_done: Option<&Vec<i8>>) -> Result<Observation> {
        let reset = match is_done {
            None => true,
            Some(v) => {
                debug_assert_eq!(v.len(), 1);
                v[0] != 0
            }
        };
        if reset {
            self.count_steps = 0;
            let (obs, _) = self.controller.reset(None);
            Ok(obs)
        } else {
            Ok(self.controller.observation())
        }
    }

    /// Resets the environment, reseeding the generator with `ix`.
    fn reset_with_index(&mut self, ix: usize) -> Result<Observation> {
        self.count_steps = 0;
        let (obs, _) = self.controller.reset(Some(ix as u64));
        Ok(obs)
    }

    /// Runs a step of the environment's dynamics.
    ///
    /// Stepping a terminated episode repeats its final step and leaves the
    /// episode untouched.
    fn step(&mut self, a: &Action) -> (Step<Self>, Record) {
        trace!("CubeGymEnv::step({})", a);

        let outcome = self.controller.step(*a);

        self.count_steps += 1;
        let is_terminated = outcome.is_terminated() as i8;
        let is_truncated = match self.max_steps {
            Some(max_steps) if is_terminated == 0 && self.count_steps >= max_steps => 1,
            _ => 0,
        };
        let record = self.record(&outcome);

        let step = Step::new(
            *outcome.observation(),
            *a,
            vec![outcome.reward() as f32],
            vec![is_terminated],
            vec![is_truncated],
            *outcome.info(),
            None,
        );
        (step, record)
    }
}
