//! MergeService: orchestrates sources and deserializes to DriveConfig.

use crate::config::sources::{environment, global_file};
use crate::config::DriveConfig;
use crate::error::DriveError;
use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<DriveConfig, DriveError> {
        let builder = Self::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = match explicit {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, DriveError> {
        let defaults = DriveConfig::default();
        let builder = config::Config::builder()
            .set_default("drive.keep_empty_folders", defaults.drive.keep_empty_folders)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("logging.output", defaults.logging.output)?;
        Ok(builder)
    }
}
