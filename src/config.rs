use crate::error::ConfigError;
use crate::upload::FileFilter;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://trans-backend-w499.onrender.com/upload";
pub const DEFAULT_DOWNLOAD_NAME: &str = "translations.zip";
pub const CONFIG_FILE_NAME: &str = "translate-uploader.json";
pub const CONFIG_PATH_VAR: &str = "TRANSLATE_UPLOADER_CONFIG";
pub const ENDPOINT_VAR: &str = "TRANSLATE_UPLOADER_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    pub endpoint: String,
    /// Covers the whole exchange. The default backend can take a while to
    /// wake up, hence the generous value.
    pub timeout_secs: u64,
    pub accept: Vec<String>,
    pub download_name: String,
    pub error_display_secs: u64,
    /// Where responses are spooled before saving. Defaults to the system temp dir.
    pub spool_dir: Option<PathBuf>,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 120,
            accept: vec!["*.csv".to_string()],
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
            error_display_secs: 4,
            spool_dir: None,
        }
    }
}

impl UploaderConfig {
    /// Resolves the config the way the desktop app starts up: an explicit file
    /// from the environment, else one in the working directory, else defaults.
    /// The endpoint variable wins over whatever the file says.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.is_file() {
                    Self::from_file(local)?
                } else {
                    tracing::debug!("no config file found, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_endpoint_override(env::var(ENDPOINT_VAR).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn apply_endpoint_override(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            tracing::info!(%endpoint, "endpoint overridden from environment");
            self.endpoint = endpoint.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url()?;
        self.file_filter()?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        };
        let url = Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme {other:?}"))),
        }
    }

    pub fn file_filter(&self) -> Result<FileFilter, ConfigError> {
        FileFilter::new(&self.accept)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_secs(self.error_display_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: UploaderConfig =
            serde_json::from_str(r#"{ "endpoint": "http://localhost:8080/upload" }"#).unwrap();

        assert_eq!(config.endpoint, "http://localhost:8080/upload");
        assert_eq!(config.accept, vec!["*.csv".to_string()]);
        assert_eq!(config.download_name, "translations.zip");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_file_reads_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "timeout_secs": 5, "error_display_secs": 10 }}"#).unwrap();

        let config = UploaderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.error_display(), Duration::from_secs(10));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.spool_dir, None);
    }

    #[test]
    fn spool_dir_is_read_as_path() {
        let config: UploaderConfig =
            serde_json::from_str(r#"{ "spool_dir": "/var/tmp/uploads" }"#).unwrap();
        assert_eq!(config.spool_dir, Some(PathBuf::from("/var/tmp/uploads")));
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(
            UploaderConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn endpoint_override_ignores_blank_values() {
        let mut config = UploaderConfig::default();
        config.apply_endpoint_override(Some("   ".to_string()));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);

        config.apply_endpoint_override(Some(" http://127.0.0.1:9000/upload ".to_string()));
        assert_eq!(config.endpoint, "http://127.0.0.1:9000/upload");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = UploaderConfig {
            endpoint: "ftp://example.com/upload".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));

        let config = UploaderConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));

        let config = UploaderConfig {
            accept: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoPatterns)));

        let config = UploaderConfig {
            accept: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));

        let config = UploaderConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }
}
