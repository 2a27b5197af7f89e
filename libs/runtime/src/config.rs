use anyhow::{Context, Result};
use api_client::ApiClientConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::resolve_home_dir;

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application home directory; normalized to an absolute path on load.
    /// Empty means "use the platform default" (`~/.taskdeck`).
    #[serde(default)]
    pub home_dir: String,
    /// Remote API transport settings.
    #[serde(default)]
    pub api: ApiClientConfig,
    /// Session persistence settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Session file; relative paths resolve against `home_dir`.
    #[serde(default = "default_session_file")]
    pub file: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

fn default_session_file() -> String {
    "current_user.json".to_string()
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/taskdeck.log", empty = no file output
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>, // How many rotated files to keep
    #[serde(default)]
    pub max_size_mb: Option<u64>, // Max size of the file in MB
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/taskdeck.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            api: ApiClientConfig::default(),
            session: SessionConfig::default(),
            logging: Some(default_logging_config()),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // Start from a base where the optional logging section is None, so
        // it remains None unless explicitly provided by YAML/ENV.
        let base = AppConfig {
            home_dir: String::new(),
            api: ApiClientConfig::default(),
            session: SessionConfig::default(),
            logging: None,
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path.as_ref()))
            // Example: TASKDECK__API__BASE_URL=… maps to api.base_url
            .merge(Env::prefixed("TASKDECK__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())?;

        config.normalize_home_dir()?;
        Ok(config)
    }

    /// Load configuration from file or create with default values.
    /// Also normalizes `home_dir` into an absolute path and creates the directory.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                c.normalize_home_dir()
                    .context("Failed to resolve home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        // Set logging level based on verbose flags for the "default" section.
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(), // keep
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }

    /// The absolute path of the session file (relative paths resolve
    /// against the normalized `home_dir`).
    pub fn session_file_path(&self) -> PathBuf {
        let file = Path::new(&self.session.file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            Path::new(&self.home_dir).join(file)
        }
    }

    fn normalize_home_dir(&mut self) -> Result<()> {
        // Treat empty string as "not provided" => None.
        let opt = if self.home_dir.trim().is_empty() {
            None
        } else {
            Some(self.home_dir.clone())
        };

        let resolved: PathBuf = resolve_home_dir(opt, default_subdir(), /*create*/ true)
            .context("home_dir normalization failed")?;

        self.home_dir = resolved.to_string_lossy().to_string();
        Ok(())
    }
}

/// Command line arguments structure.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
}

const fn default_subdir() -> &'static str {
    ".taskdeck"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Helper: a normalized home_dir should be absolute and not start with '~'.
    fn is_normalized_path(p: &str) -> bool {
        let pb = PathBuf::from(p);
        pb.is_absolute() && !p.starts_with('~')
    }

    #[test]
    fn test_default_config_structure() {
        let config = AppConfig::default();

        // raw (not yet normalized)
        assert_eq!(config.home_dir, "");
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout_sec, 30);
        assert_eq!(config.session.file, "current_user.json");

        // Logging defaults
        let logging = config.logging.as_ref().unwrap();
        assert!(logging.contains_key("default"));
        let default_section = &logging["default"];
        assert_eq!(default_section.console_level, "info");
        assert_eq!(default_section.file, "logs/taskdeck.log");
    }

    #[test]
    fn test_load_layered_normalizes_home_dir() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = tmp.path().join("taskdeck_home");

        let yaml = format!(
            r#"
home_dir: "{}"

api:
  base_url: "http://api.internal:4000"
  timeout_sec: 10

session:
  file: "session/current_user.json"

logging:
  default:
    console_level: debug
    file: "logs/default.log"
"#,
            home.display()
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        // home_dir should be normalized (and created) immediately
        assert!(is_normalized_path(&config.home_dir));
        assert!(home.exists());
        assert_eq!(config.api.base_url, "http://api.internal:4000");
        assert_eq!(config.api.timeout_sec, 10);

        // session file resolves under home_dir
        let session_path = config.session_file_path();
        assert!(session_path.starts_with(&config.home_dir));
        assert!(session_path.ends_with("session/current_user.json"));

        // logging parsed
        let logging = config.logging.as_ref().unwrap();
        assert_eq!(logging["default"].console_level, "debug");
    }

    #[test]
    fn test_load_or_default_normalizes_home_dir_when_none() {
        let config = AppConfig::load_or_default(None::<&str>).unwrap();
        assert!(is_normalized_path(&config.home_dir));
        assert!(config.home_dir.ends_with(".taskdeck"));
    }

    #[test]
    fn test_minimal_yaml_config_gets_defaults() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = tmp.path().join("minimal_home");

        let yaml = format!("home_dir: \"{}\"\n", home.display());
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.session.file, "current_user.json");
        // logging stays None unless provided
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_verbose_flag_overrides_console_level() {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(&CliArgs {
            config: None,
            print_config: false,
            verbose: 1,
        });
        assert_eq!(
            config.logging.as_ref().unwrap()["default"].console_level,
            "debug"
        );

        config.apply_cli_overrides(&CliArgs {
            config: None,
            print_config: false,
            verbose: 3,
        });
        assert_eq!(
            config.logging.as_ref().unwrap()["default"].console_level,
            "trace"
        );
    }

    #[test]
    fn test_absolute_session_file_is_kept() {
        let tmp = tempdir().unwrap();
        let mut config = AppConfig::default();
        config.home_dir = tmp.path().to_string_lossy().to_string();
        config.session.file = "/var/lib/taskdeck/current_user.json".to_string();
        assert_eq!(
            config.session_file_path(),
            PathBuf::from("/var/lib/taskdeck/current_user.json")
        );
    }

    #[test]
    fn test_to_yaml_round_trip() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("base_url"));
        assert!(yaml.contains("current_user.json"));
    }
}
