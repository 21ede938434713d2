use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::aggregate::DateRange;
use crate::categorize::CategoryRule;

const CONFIG_FILE: &str = "tally.toml";
const ENV_PREFIX: &str = "TALLY";

/// Settings read from `tally.toml` in the config directory, overridden by
/// `TALLY_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) database_path: Option<PathBuf>,
    pub(crate) log_filter: String,
    pub(crate) default_range: String,
    pub(crate) auto_categorize: bool,
    pub(crate) recent_limit: usize,
    pub(crate) category_rules: Vec<CategoryRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_filter: "warn".to_string(),
            default_range: "all".to_string(),
            auto_categorize: true,
            recent_limit: 10,
            category_rules: Vec::new(),
        }
    }
}

impl AppConfig {
    pub(crate) fn load(dirs: &Dirs) -> Result<Self> {
        Self::load_from(&dirs.config_dir.join(CONFIG_FILE))
    }

    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Falls back to `All` when the configured name is unknown.
    pub(crate) fn default_range(&self) -> DateRange {
        DateRange::parse(&self.default_range).unwrap_or_default()
    }
}

/// Where tally keeps its files.
pub(crate) struct Dirs {
    pub(crate) config_dir: PathBuf,
    pub(crate) data_dir: PathBuf,
}

impl Dirs {
    pub(crate) fn discover() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "tally", "Tally")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let dirs = Self {
            config_dir: proj_dirs.config_dir().to_path_buf(),
            data_dir: proj_dirs.data_dir().to_path_buf(),
        };
        std::fs::create_dir_all(&dirs.data_dir).with_context(|| {
            format!("Failed to create data directory: {}", dirs.data_dir.display())
        })?;
        Ok(dirs)
    }

    pub(crate) fn database_path(&self, config: &AppConfig) -> PathBuf {
        config
            .database_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("tally.db"))
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join("tally.log")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.log_filter, "warn");
        assert_eq!(cfg.default_range(), DateRange::All);
        assert!(cfg.auto_categorize);
        assert_eq!(cfg.recent_limit, 10);
        assert!(cfg.database_path.is_none());
    }

    #[test]
    fn test_file_values_override_defaults() {
        let file = write_config(
            r#"
default_range = "month"
auto_categorize = false
recent_limit = 3

[[category_rules]]
pattern = "bakery"
category = "Food"

[[category_rules]]
pattern = "^SQ \\*"
category = "Shopping"
is_regex = true
"#,
        );
        let cfg = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(cfg.default_range(), DateRange::Month);
        assert!(!cfg.auto_categorize);
        assert_eq!(cfg.recent_limit, 3);
        assert_eq!(
            cfg.category_rules,
            vec![
                CategoryRule::contains("bakery", "Food"),
                CategoryRule::regex("^SQ \\*", "Shopping"),
            ]
        );
    }

    #[test]
    fn test_unknown_range_falls_back_to_all() {
        let file = write_config("default_range = \"fortnight\"\n");
        let cfg = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(cfg.default_range(), DateRange::All);
    }

    #[test]
    fn test_database_path_override() {
        let dirs = Dirs {
            config_dir: PathBuf::from("/cfg"),
            data_dir: PathBuf::from("/data"),
        };
        let mut cfg = AppConfig::default();
        assert_eq!(dirs.database_path(&cfg), PathBuf::from("/data/tally.db"));
        cfg.database_path = Some(PathBuf::from("/elsewhere/ledger.db"));
        assert_eq!(dirs.database_path(&cfg), PathBuf::from("/elsewhere/ledger.db"));
    }
}
