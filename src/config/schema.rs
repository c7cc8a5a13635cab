//! Configuration schema types
//!
//! This module defines the configuration structure for PiiGuard. Every section
//! has defaults so that an empty file (or no file at all) yields a runnable
//! local-mode service.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Detection backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// In-process pattern recognizers
    #[default]
    Local,
    /// Remote analyzer/anonymizer services over HTTP
    Remote,
}

impl std::fmt::Display for EngineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineMode::Local => write!(f, "local"),
            EngineMode::Remote => write!(f, "remote"),
        }
    }
}

impl std::str::FromStr for EngineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(EngineMode::Local),
            "remote" | "external" => Ok(EngineMode::Remote),
            other => Err(format!(
                "Invalid engine mode '{other}'. Must be one of: local, remote"
            )),
        }
    }
}

/// Main PiiGuard configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PiiGuardConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Detection engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// OCR and rasterization settings
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PiiGuardConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.engine.validate()?;
        self.ocr.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Include error details in HTTP error bodies
    #[serde(default)]
    pub debug: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            debug: false,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by the CORS layer
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("server.host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("server.port must be between 1 and 65535".to_string());
        }

        if self.max_file_size == 0 {
            return Err("server.max_file_size must be greater than 0".to_string());
        }

        for origin in &self.allowed_origins {
            if origin != "*" {
                validate_http_url(origin, "server.allowed_origins")?;
            }
        }

        Ok(())
    }

    /// Socket address string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            max_file_size: default_max_file_size(),
        }
    }
}

/// Detection engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Backend selection (local or remote)
    #[serde(default)]
    pub mode: EngineMode,

    /// Languages the local recognizers accept
    #[serde(default = "default_supported_languages")]
    pub supported_languages: Vec<String>,

    /// Optional path to a custom pattern library (TOML)
    #[serde(default)]
    pub pattern_library: Option<String>,

    /// Key for the hash operator (random per process when unset)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub hash_key: Option<SecretString>,

    /// Remote service settings (used when mode = "remote")
    #[serde(default)]
    pub remote: RemoteEngineConfig,
}

impl EngineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.supported_languages.is_empty() {
            return Err("engine.supported_languages cannot be empty".to_string());
        }

        if let Some(ref path) = self.pattern_library {
            if path.is_empty() {
                return Err("engine.pattern_library cannot be an empty path".to_string());
            }
        }

        if self.mode == EngineMode::Remote {
            self.remote.validate()?;
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::default(),
            supported_languages: default_supported_languages(),
            pattern_library: None,
            hash_key: None,
            remote: RemoteEngineConfig::default(),
        }
    }
}

/// Remote analyzer/anonymizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEngineConfig {
    /// Base URL of the analyzer service
    #[serde(default = "default_analyzer_url")]
    pub analyzer_url: String,

    /// Bearer token for the analyzer service (optional)
    #[serde(default)]
    pub analyzer_api_key: Option<SecretString>,

    /// Base URL of the anonymizer service
    #[serde(default = "default_anonymizer_url")]
    pub anonymizer_url: String,

    /// Bearer token for the anonymizer service (optional)
    #[serde(default)]
    pub anonymizer_api_key: Option<SecretString>,
}

impl RemoteEngineConfig {
    fn validate(&self) -> Result<(), String> {
        validate_http_url(&self.analyzer_url, "engine.remote.analyzer_url")?;
        validate_http_url(&self.anonymizer_url, "engine.remote.anonymizer_url")?;
        Ok(())
    }
}

impl Default for RemoteEngineConfig {
    fn default() -> Self {
        Self {
            analyzer_url: default_analyzer_url(),
            analyzer_api_key: None,
            anonymizer_url: default_anonymizer_url(),
            anonymizer_api_key: None,
        }
    }
}

/// OCR and rasterization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Path to the tesseract binary
    #[serde(default = "default_tesseract_cmd")]
    pub tesseract_cmd: String,

    /// Path to the pdftoppm binary used to rasterize pages
    #[serde(default = "default_pdftoppm_cmd")]
    pub pdftoppm_cmd: String,

    /// Tesseract language code used for OCR
    #[serde(default = "default_ocr_language")]
    pub language: String,

    /// Languages advertised by the capabilities endpoint
    #[serde(default = "default_ocr_languages")]
    pub supported_languages: Vec<String>,
}

impl OcrConfig {
    fn validate(&self) -> Result<(), String> {
        if self.tesseract_cmd.is_empty() {
            return Err("ocr.tesseract_cmd cannot be empty".to_string());
        }

        if self.pdftoppm_cmd.is_empty() {
            return Err("ocr.pdftoppm_cmd cannot be empty".to_string());
        }

        if self.language.is_empty() {
            return Err("ocr.language cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: default_tesseract_cmd(),
            pdftoppm_cmd: default_pdftoppm_cmd(),
            language: default_ocr_language(),
            supported_languages: default_ocr_languages(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn validate_http_url(value: &str, field: &str) -> Result<(), String> {
    let parsed = Url::parse(value).map_err(|e| format!("{field} '{value}' is not a valid URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!(
            "{field} '{value}' must use http or https, got '{other}'"
        )),
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024
}

fn default_supported_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_analyzer_url() -> String {
    "http://localhost:5002".to_string()
}

fn default_anonymizer_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_tesseract_cmd() -> String {
    "/usr/bin/tesseract".to_string()
}

fn default_pdftoppm_cmd() -> String {
    "/usr/bin/pdftoppm".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_ocr_languages() -> Vec<String> {
    ["eng", "deu", "fra", "spa"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PiiGuardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.engine.mode, EngineMode::Local);
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: PiiGuardConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.engine.remote.analyzer_url, "http://localhost:5002");
        assert_eq!(config.engine.remote.anonymizer_url, "http://localhost:5001");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = PiiGuardConfig::default();
        config.application.log_level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_level"));
    }

    #[test]
    fn test_remote_urls_only_checked_in_remote_mode() {
        let mut config = PiiGuardConfig::default();
        config.engine.remote.analyzer_url = "not a url".to_string();
        assert!(config.validate().is_ok());

        config.engine.mode = EngineMode::Remote;
        let err = config.validate().unwrap_err();
        assert!(err.contains("engine.remote.analyzer_url"));
    }

    #[test]
    fn test_remote_url_scheme() {
        let mut config = PiiGuardConfig::default();
        config.engine.mode = EngineMode::Remote;
        config.engine.remote.anonymizer_url = "ftp://presidio:21".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("must use http or https"));
    }

    #[test]
    fn test_zero_max_file_size_rejected() {
        let mut config = PiiGuardConfig::default();
        config.server.max_file_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_engine_mode_parse() {
        assert_eq!("local".parse::<EngineMode>().unwrap(), EngineMode::Local);
        assert_eq!("REMOTE".parse::<EngineMode>().unwrap(), EngineMode::Remote);
        assert_eq!("external".parse::<EngineMode>().unwrap(), EngineMode::Remote);
        assert!("cloud".parse::<EngineMode>().is_err());
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = PiiGuardConfig::default();
        config.logging.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }
}
