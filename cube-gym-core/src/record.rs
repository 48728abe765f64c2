//! Types and traits for recording values emitted during rollouts.
//!
//! A [`Record`] is a flexible key-value container. Environments return one from
//! every [`Env::step`](crate::Env::step) call and the rollout utilities hand it
//! to a [`Recorder`].
//!
//! ```rust
//! use cube_gym_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode_step", RecordValue::Scalar(1.0));
//! record.insert("reward", RecordValue::Scalar(-1.0));
//! record.insert("agent", RecordValue::Array1(vec![1.0, 0.0, 0.0]));
//! assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
//! ```
mod base;
mod buffered_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use recorder::Recorder;
