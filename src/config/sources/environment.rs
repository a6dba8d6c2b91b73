//! Environment variable source: DRIVE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `DRIVE_DRIVE__KEEP_EMPTY_FOLDERS=false` sets `drive.keep_empty_folders`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("DRIVE")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("drive.fallback_servers")
            .try_parsing(true),
    );
    Ok(builder)
}
