use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the content root.
///
/// Locates the two content stores relative to the site root: a directory of
/// markdown post files and a directory holding the book catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Directory of blog post files, relative to the site root.
    pub posts_dir: PathBuf,

    /// Directory holding the reading-list catalog, relative to the site
    /// root.
    pub reading_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            posts_dir: default_posts_dir(),
            reading_dir: default_reading_dir(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("content/blog")
}

fn default_reading_dir() -> PathBuf {
    PathBuf::from("content/reading")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_posts_dir")]
        posts_dir: PathBuf,

        #[serde(default = "default_reading_dir")]
        reading_dir: PathBuf,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                posts_dir,
                reading_dir,
            } => Self {
                posts_dir,
                reading_dir,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            posts_dir: config.posts_dir,
            reading_dir: config.reading_dir,
        }
    }
}
