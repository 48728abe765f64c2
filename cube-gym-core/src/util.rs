//! Utilities for interaction of policies and environments.
use crate::{
    record::{RecordValue, Recorder},
    Env, Policy,
};
use anyhow::Result;
use log::debug;

/// Runs episodes with a policy and returns the cumulative reward of each episode.
///
/// Every step record emitted by the environment is written to `recorder`
/// together with the keys `episode` and `step`, both counted from zero.
/// Policies that never reach a terminal state make this function loop forever,
/// so environments without a natural horizon should be configured to truncate.
pub fn eval_with_recorder<E, P, R>(
    env: &mut E,
    policy: &mut P,
    n_episodes: usize,
    recorder: &mut R,
) -> Result<Vec<f32>>
where
    E: Env,
    P: Policy<E>,
    R: Recorder,
{
    let mut rs = Vec::with_capacity(n_episodes);

    for episode in 0..n_episodes {
        let mut prev_obs = env.reset(None)?;
        let mut r_sum = 0.0;
        let mut count_step = 0;

        loop {
            let act = policy.sample(&prev_obs);
            let (step, mut record) = env.step(&act);
            r_sum += step.reward[0];

            record.insert("episode", RecordValue::Scalar(episode as _));
            record.insert("step", RecordValue::Scalar(count_step as _));
            recorder.write(record);
            count_step += 1;

            if step.is_done() {
                break;
            }
            prev_obs = step.obs;
        }

        debug!("Episode {}: return = {}, steps = {}", episode, r_sum, count_step);
        rs.push(r_sum);
    }

    Ok(rs)
}
