pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use nfe_core::models::config::NfeConfig;

/// Load the config given on the command line, or the user config if present.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<NfeConfig> {
    if let Some(path) = config_path {
        return Ok(NfeConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(NfeConfig::from_file(&default_path)?)
    } else {
        Ok(NfeConfig::default())
    }
}
