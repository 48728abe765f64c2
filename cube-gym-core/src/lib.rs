#![warn(missing_docs)]
//! Core abstractions shared by cube-gym environments.
//!
//! An environment ([`Env`]) consumes actions ([`Act`]) and emits [`Step`] objects
//! carrying the next observation ([`Obs`]), the reward and termination flags.
//! A [`Policy`] closes the loop by mapping observations back to actions.
//! [`DefaultEvaluator`] and [`util::eval_with_recorder`] drive that loop for
//! whole episodes.
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{Act, Configurable, Env, Info, Obs, Policy, Step};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};
