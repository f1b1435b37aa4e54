// In crates/app-config/src/lib.rs

use std::path::Path;

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, BacktestSettings, Settings};

/// Loads the application settings from `config/` in the working directory.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(Path::new("config"), &environment)
}

/// Same layering as [`load_settings`], rooted at `dir`.
pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::with_name(&dir.join("base").to_string_lossy()))
        .add_source(File::with_name(&dir.join(environment).to_string_lossy()).required(false))
        // e.g. `APP_BACKTEST__TRAIN_FRACTION=0.8`. The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").prefix_separator("_").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    validate(&settings)?;
    Ok(settings)
}

/// Reads a standalone TOML file, such as an optimizer job description.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn validate(settings: &Settings) -> Result<()> {
    let fraction = settings.backtest.train_fraction;
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(Error::Invalid(format!(
            "backtest.train_fraction must lie strictly between 0 and 1, got {fraction}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use strategies::Rule;
    use tempfile::tempdir;

    #[test]
    fn environment_file_overrides_base() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            r#"
            [app]
            environment = "development"
            log_level = "info"

            [backtest]
            rule = "sma_cross"
            short_window = 10
            long_window = 30
            "#,
        )
        .unwrap();
        fs::write(
            dir.path().join("research.toml"),
            r#"
            [backtest]
            rule = "ema_momentum"
            momentum_window = 15
            "#,
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), "research").unwrap();
        assert_eq!(settings.app.optimizer_threads, 0);
        assert_eq!(settings.backtest.rule, Rule::EmaMomentum);
        assert_eq!(settings.backtest.short_window, 10);
        assert_eq!(settings.backtest.momentum_window, Some(15));
        assert_eq!(settings.backtest.train_fraction, 0.7);
    }

    #[test]
    fn missing_backtest_section_uses_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            "[app]\nenvironment = \"test\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), "missing").unwrap();
        let combo = settings.backtest.combo();
        assert_eq!((combo.short_window, combo.long_window), (20, 50));
        assert_eq!(settings.backtest.rule, Rule::SmaCross);
    }

    #[test]
    fn load_toml_reports_the_failing_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("job.toml");
        let err = load_toml::<Settings>(&missing).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.to_string().contains("job.toml"));

        fs::write(&missing, "[app\n").unwrap();
        assert!(matches!(load_toml::<Settings>(&missing), Err(Error::Parse { .. })));
    }

    #[test]
    fn rejects_out_of_range_train_fraction() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            "[app]\nenvironment = \"test\"\nlog_level = \"info\"\n\
             [backtest]\ntrain_fraction = 1.0\n",
        )
        .unwrap();

        assert!(matches!(
            load_settings_from(dir.path(), "none"),
            Err(Error::Invalid(_))
        ));
    }
}
