use anyhow::Result;
use clap::Parser;
use cube_gym_core::{
    record::{BufferedRecorder, Record, RecordValue, Recorder},
    Configurable, Env as _, Policy,
};
use cube_gym_env::{CubeGymConfig, CubeGymEnv, CubeVariant, RandomPolicy, RandomPolicyConfig};
use log::info;
use serde::Serialize;
use std::{convert::TryFrom, fs::File, path::PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Random walk in the cube grid-world")]
struct Args {
    /// Yaml file with the environment configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random start and target planes with sparse rewards, ignored with --config
    #[arg(long, default_value_t = false)]
    sparse: bool,

    /// Edge length of the cube, ignored with --config
    #[arg(long, default_value_t = 10)]
    size: usize,

    /// Draw obstacles at random instead of the fixed layout, ignored with --config
    #[arg(long, default_value_t = false)]
    random_obstacles: bool,

    /// Number of random obstacles, ignored with --config
    #[arg(long, default_value_t = 3)]
    obstacles: i64,

    /// Number of interaction steps
    #[arg(short, long, default_value_t = 10000)]
    steps: usize,

    /// Random seed of the environment and the policy
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write step records to this csv file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CubeRecord {
    episode: usize,
    step: usize,
    reward: f32,
    state_id: u64,
    x: i64,
    y: i64,
    z: i64,
    distance: f32,
    outcome: String,
}

impl TryFrom<&Record> for CubeRecord {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        let agent = record.get_array1("agent")?;
        Ok(Self {
            episode: record.get_scalar("episode")? as _,
            step: record.get_scalar("episode_step")? as _,
            reward: record.get_scalar("reward")?,
            state_id: record.get_string("state_id")?.parse()?,
            x: agent[0] as _,
            y: agent[1] as _,
            z: agent[2] as _,
            distance: record.get_scalar("distance")?,
            outcome: record.get_string("outcome")?,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let env_config = match &args.config {
        Some(path) => CubeGymConfig::load(path)?,
        None => CubeGymConfig::default()
            .variant(if args.sparse {
                CubeVariant::Sparse
            } else {
                CubeVariant::Obstacles
            })
            .size(args.size)
            .deterministic_obstacles(!args.random_obstacles)
            .obstacle_count(args.obstacles),
    };
    let mut env = CubeGymEnv::build(&env_config, args.seed as i64)?;
    let mut policy = RandomPolicy::build(RandomPolicyConfig { seed: args.seed });
    let mut recorder = BufferedRecorder::new();

    let mut obs = env.reset(None)?;
    let (mut episode, mut n_goals) = (0, 0);
    for _ in 0..args.steps {
        let act = policy.sample(&obs);
        let (step, mut record) = env.step_with_reset(&act);
        if let Ok("goal") = record.get_string("outcome").as_deref() {
            n_goals += 1;
        }
        record.insert("episode", RecordValue::Scalar(episode as f32));
        recorder.write(record);

        obs = match step.init_obs {
            Some(init_obs) => {
                episode += 1;
                init_obs
            }
            None => step.obs,
        };
    }

    info!(
        "{} steps, {} episodes finished, {} reached the target",
        args.steps, episode, n_goals
    );

    if let Some(path) = &args.csv {
        let mut wtr = csv::WriterBuilder::new().from_writer(File::create(path)?);
        for record in recorder.iter() {
            wtr.serialize(CubeRecord::try_from(record)?)?;
        }
        wtr.flush()?;
        info!("Wrote {} records to {}", recorder.len(), path.display());
    }

    Ok(())
}
