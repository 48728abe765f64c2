//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{
    record::{Record, RecordValue},
    Env, Policy,
};
use anyhow::Result;
use log::info;

/// Runs a fixed number of episodes and reports the mean return and length.
///
/// Episode `ix` is started with [`Env::reset_with_index`]`(ix)`, so two
/// evaluators built from the same configuration see the same episodes.
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::<CubeGymEnv>::new(&config, 42, 10)?;
/// let record = evaluator.evaluate(&mut policy)?;
/// println!("Average return: {}", record.get_scalar("Episode return")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    /// Returns a [`Record`] with `Episode return` and `Episode length`,
    /// both averaged over the episodes.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        let mut r_total = 0f32;
        let mut len_total = 0usize;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;

            loop {
                let act = policy.sample(&prev_obs);
                let (step, _) = self.env.step(&act);
                r_total += step.reward[0];
                len_total += 1;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }
        }

        let n = self.n_episodes.max(1) as f32;
        info!(
            "Evaluated {} episodes, mean return = {}",
            self.n_episodes,
            r_total / n
        );
        Ok(Record::from_slice(&[
            ("Episode return", RecordValue::Scalar(r_total / n)),
            ("Episode length", RecordValue::Scalar(len_total as f32 / n)),
        ]))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }

    /// Returns a reference to the environment used for evaluation.
    pub fn env(&self) -> &E {
        &self.env
    }
}
