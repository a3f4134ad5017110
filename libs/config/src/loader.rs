//! TOML + environment-variable config loading: a file source with an
//! optional env overlay, `MANO_`-prefixed environment overrides.

use crate::types::Config;
use anyhow::{Context, Result};
use config_crate::{Config as RawConfig, Environment, File, FileFormat};
use std::path::Path;

impl Config {
    /// Load configuration from `path` (defaults to `config/mano.toml`),
    /// overlaid with `MANO_`-prefixed environment variables. Missing file
    /// is not an error: the all-`Default` record is used as the base.
    pub fn load(path: Option<&Path>, env_prefix: Option<&str>) -> Result<Self> {
        let default_path = Path::new("config/mano.toml");
        let path = path.unwrap_or(default_path);

        let mut builder = RawConfig::builder().add_source(
            RawConfig::try_from(&Config::default())
                .context("failed to seed config builder with defaults")?,
        );

        if path.exists() {
            tracing::info!(?path, "loading config file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        } else {
            tracing::warn!(?path, "config file not found, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix.unwrap_or("MANO"))
                .separator("_")
                .try_parsing(true),
        );

        let built = builder.build().context("failed to build configuration")?;
        built.try_deserialize().context("failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/mano.toml")), Some("MANO_TEST_UNUSED")).unwrap();
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[retry]\ninitial_delay = 100\nmax_delay = 1000\nbackoff_factor = 3.0\nmax_attempts = 5").unwrap();
        let config = Config::load(Some(file.path()), Some("MANO_TEST_UNUSED")).unwrap();
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff_factor, 3.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.tc.overhead_factor, 1.10);
    }
}
