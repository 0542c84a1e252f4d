use super::error::{Error, Result};
use std::path::PathBuf;

/// Environment variable that overrides the default base directory
pub const HOME_ENV_VAR: &str = "JOTTER_HOME";

/// Titles longer than this many characters are shortened for display
pub const DEFAULT_TITLE_LIMIT: usize = 30;

/// Configuration for jotter
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for jotter data
    pub base_dir: PathBuf,
    /// Path to the note database
    pub database_path: PathBuf,
    /// Log file used while the interactive UI owns the terminal
    pub log_path: PathBuf,
    /// Display limit for note titles
    pub title_limit: usize,
}

impl Config {
    /// Get the default configuration directory
    pub fn default_base_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
            .map(|home| home.join(".jotter"))
    }

    /// Create a new configuration
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = match base_dir {
            Some(dir) => dir,
            None => Self::default_base_dir()?,
        };

        Ok(Self {
            database_path: base_dir.join("notes.redb"),
            log_path: base_dir.join("jotter.log"),
            title_limit: DEFAULT_TITLE_LIMIT,
            base_dir,
        })
    }

    /// Initialize the configuration directories
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        if let Some(parent) = self.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Check if the configuration is already initialized
    pub fn is_initialized(&self) -> bool {
        self.base_dir.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_derive_from_base_dir() {
        let config = Config::new(Some(PathBuf::from("/tmp/jotter-test"))).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/jotter-test/notes.redb"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/jotter-test/jotter.log"));
        assert_eq!(config.title_limit, DEFAULT_TITLE_LIMIT);
    }

    #[test]
    fn test_init_creates_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(Some(temp_dir.path().join("nested").join("jotter"))).unwrap();
        assert!(!config.is_initialized());

        config.init().unwrap();
        assert!(config.is_initialized());
    }
}
