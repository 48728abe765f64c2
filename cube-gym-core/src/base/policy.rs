//! Action selection.
use super::Env;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

/// Chooses actions of an [`Env`].
///
/// Implementations may be stochastic, so sampling takes `&mut self`.
pub trait Policy<E: Env> {
    /// Returns the action to take on `obs`.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}

/// Objects constructed from a serde configuration.
pub trait Configurable<E: Env> {
    /// Configuration type, readable from yaml.
    type Config: Clone + DeserializeOwned;

    /// Builds the object from `config`.
    fn build(config: Self::Config) -> Self;

    /// Reads the configuration from the yaml file at `path` and builds the object.
    ///
    /// Errors name the offending file.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config {}", path.display()))?;
        let config = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(Self::build(config))
    }
}
