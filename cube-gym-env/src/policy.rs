//! Baseline policies.
use crate::{Action, CubeGymEnv, Observation, N_ACTIONS};
use cube_gym_core::{Configurable, Policy};
use serde::{Deserialize, Serialize};

/// Configuration of [`RandomPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomPolicyConfig {
    /// Seed of the action sampler.
    pub seed: u64,
}

/// Samples the five actions uniformly, ignoring the observation.
pub struct RandomPolicy {
    rng: fastrand::Rng,
}

impl Policy<CubeGymEnv> for RandomPolicy {
    fn sample(&mut self, _obs: &Observation) -> Action {
        Action::ALL[self.rng.usize(..N_ACTIONS)]
    }
}

impl Configurable<CubeGymEnv> for RandomPolicy {
    type Config = RandomPolicyConfig;

    fn build(config: Self::Config) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }
}
