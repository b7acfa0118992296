use crate::dict::corpus::EMBEDDED_KEYWORDS;
use crate::dict::natural::EMBEDDED_WORDLIST;
use crate::error::Error;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "scspell.toml";
pub const KEYWORDS_FILE: &str = "keywords.txt";
pub const WORDLIST_FILE: &str = "english-words.txt";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Locations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_dictionary: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_dictionary: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerSettings {
    /// Sub-words of this length or shorter are presumed abbreviations.
    #[serde(default = "default_len_threshold")]
    pub len_threshold: usize,

    /// Number of lines shown around a match on request.
    #[serde(default = "default_context_size")]
    pub context_size: usize,
}

fn default_len_threshold() -> usize {
    3
}

fn default_context_size() -> usize {
    4
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            len_threshold: default_len_threshold(),
            context_size: default_context_size(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub locations: Locations,

    #[serde(default)]
    pub checker: CheckerSettings,

    #[serde(skip)]
    data_dir: PathBuf,
}

impl Config {
    /// Load `scspell.toml` from `data_dir`, falling back to defaults when it
    /// does not exist. A malformed file or a relative override is fatal.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.data_dir = data_dir.to_path_buf();
        config.validate(&path)?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let overrides = [
            ("keyword_dictionary", &self.locations.keyword_dictionary),
            ("natural_dictionary", &self.locations.natural_dictionary),
        ];
        for (name, location) in overrides {
            if let Some(location) = location {
                if !location.is_absolute() {
                    return Err(Error::Config(format!(
                        "error while parsing \"{}\": {} must be an absolute path",
                        path.display(),
                        name
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn keyword_dictionary_path(&self) -> PathBuf {
        self.locations
            .keyword_dictionary
            .clone()
            .unwrap_or_else(|| self.data_dir.join(KEYWORDS_FILE))
    }

    pub fn natural_dictionary_path(&self) -> PathBuf {
        self.locations
            .natural_dictionary
            .clone()
            .unwrap_or_else(|| self.data_dir.join(WORDLIST_FILE))
    }

    /// Create the data directory and seed any missing dictionaries.
    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            eprintln!(
                "Creating new personal dictionaries in {} .",
                self.data_dir.display()
            );
            fs::create_dir_all(&self.data_dir).context("Failed to create data directory")?;
        }

        let keywords = self.keyword_dictionary_path();
        if !keywords.exists() {
            log::info!("seeding keyword dictionary at {}", keywords.display());
            fs::write(&keywords, EMBEDDED_KEYWORDS).with_context(|| {
                format!("Failed to create keyword dictionary: {}", keywords.display())
            })?;
        }

        let wordlist = self.natural_dictionary_path();
        if !wordlist.exists() {
            log::info!("seeding natural wordlist at {}", wordlist.display());
            fs::write(&wordlist, EMBEDDED_WORDLIST).with_context(|| {
                format!("Failed to create wordlist: {}", wordlist.display())
            })?;
        }

        Ok(())
    }

    /// Record a new keyword dictionary location in the config file.
    pub fn set_keyword_dictionary(&mut self, location: &Path) -> Result<()> {
        if !location.is_absolute() {
            return Err(Error::Config(
                "keyword dictionary location must be an absolute path".to_string(),
            )
            .into());
        }
        self.locations.keyword_dictionary = Some(location.to_path_buf());
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).context("Failed to create data directory")?;
        let path = self.config_path();
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "scspell").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.checker.len_threshold, 3);
        assert_eq!(config.checker.context_size, 4);
        assert_eq!(config.keyword_dictionary_path(), dir.path().join(KEYWORDS_FILE));
        assert_eq!(config.natural_dictionary_path(), dir.path().join(WORDLIST_FILE));
    }

    #[test]
    fn test_override_location() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("shared-keywords.txt");
        fs::write(
            dir.path().join(CONFIG_FILE),
            format!(
                "[locations]\nkeyword_dictionary = {:?}\n\n[checker]\nlen_threshold = 5\n",
                custom.display().to_string()
            ),
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.keyword_dictionary_path(), custom);
        assert_eq!(config.checker.len_threshold, 5);
        assert_eq!(config.checker.context_size, 4);
    }

    #[test]
    fn test_relative_override_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[locations]\nkeyword_dictionary = \"relative/keywords.txt\"\n",
        )
        .unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("must be an absolute path"));
    }

    #[test]
    fn test_malformed_config_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[locations\nnot toml").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Config(_))));
    }

    #[test]
    fn test_set_keyword_dictionary_round_trip() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("elsewhere.txt");

        let mut config = Config::load(dir.path()).unwrap();
        config.set_keyword_dictionary(&target).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.keyword_dictionary_path(), target);

        assert!(config
            .set_keyword_dictionary(Path::new("relative.txt"))
            .is_err());
    }

    #[test]
    fn test_ensure_data_dir_seeds_dictionaries() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("fresh");

        let config = Config::load(&data_dir).unwrap();
        config.ensure_data_dir().unwrap();

        assert!(config.keyword_dictionary_path().exists());
        assert!(config.natural_dictionary_path().exists());
    }
}
