mod config;

pub use config::{Config, LogConfig, SoundConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding `config.toml`.
///
/// `AMBIROOM_HOME` wins when set. Otherwise `~/.config/ambiroom[-dev]/`,
/// with the `-dev` suffix selected by `AMBIROOM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("AMBIROOM_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("AMBIROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("ambiroom-dev")
            } else {
                base_dir.join("ambiroom")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
