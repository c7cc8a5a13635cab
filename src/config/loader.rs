//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PiiGuardConfig;
use super::secret::secret_string;
use crate::domain::errors::PiiGuardError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PiiGuardConfig
/// 4. Applies environment variable overrides (PIIGUARD_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use piiguard::config::loader::load_config;
///
/// let config = load_config("piiguard.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PiiGuardConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PiiGuardError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PiiGuardError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text
///
/// Runs the same substitution, override and validation steps as [`load_config`].
pub fn load_config_from_str(contents: &str) -> Result<PiiGuardConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: PiiGuardConfig = toml::from_str(&contents)
        .map_err(|e| PiiGuardError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;
    finish(config)
}

/// Loads configuration from `path`, or from built-in defaults if the file is missing
///
/// Environment overrides are applied in both cases. This is what `serve` uses so
/// that a container can be configured purely through `PIIGUARD_*` variables.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<PiiGuardConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::warn!(
        config_path = %path.display(),
        "Configuration file not found, using defaults and environment overrides"
    );

    let mut config = PiiGuardConfig::default();
    apply_env_overrides(&mut config)?;
    finish(config)
}

fn finish(config: PiiGuardConfig) -> Result<PiiGuardConfig> {
    config.validate().map_err(|e| {
        PiiGuardError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PiiGuardError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PiiGuardError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using PIIGUARD_* prefix
///
/// Environment variables follow the pattern: PIIGUARD_<SECTION>_<KEY>
/// For example: PIIGUARD_SERVER_PORT, PIIGUARD_ENGINE_MODE
fn apply_env_overrides(config: &mut PiiGuardConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("PIIGUARD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("PIIGUARD_APPLICATION_DEBUG") {
        config.application.debug = val.parse().unwrap_or(false);
    }

    // Server overrides
    if let Ok(val) = std::env::var("PIIGUARD_SERVER_HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("PIIGUARD_SERVER_PORT") {
        config.server.port = val.parse().map_err(|_| {
            PiiGuardError::Configuration(format!("PIIGUARD_SERVER_PORT is not a valid port: {val}"))
        })?;
    }
    if let Ok(val) = std::env::var("PIIGUARD_SERVER_ALLOWED_ORIGINS") {
        config.server.allowed_origins = split_list(&val);
    }
    if let Ok(val) = std::env::var("PIIGUARD_SERVER_MAX_FILE_SIZE") {
        if let Ok(size) = val.parse() {
            config.server.max_file_size = size;
        }
    }

    // Engine overrides
    if let Ok(val) = std::env::var("PIIGUARD_ENGINE_MODE") {
        config.engine.mode = val.parse().map_err(PiiGuardError::Configuration)?;
    }
    if let Ok(val) = std::env::var("PIIGUARD_ENGINE_SUPPORTED_LANGUAGES") {
        config.engine.supported_languages = split_list(&val);
    }
    if let Ok(val) = std::env::var("PIIGUARD_ENGINE_PATTERN_LIBRARY") {
        config.engine.pattern_library = Some(val);
    }
    if let Ok(val) = std::env::var("PIIGUARD_ENGINE_HASH_KEY") {
        config.engine.hash_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("PIIGUARD_ENGINE_REMOTE_ANALYZER_URL") {
        config.engine.remote.analyzer_url = val;
    }
    if let Ok(val) = std::env::var("PIIGUARD_ENGINE_REMOTE_ANALYZER_API_KEY") {
        config.engine.remote.analyzer_api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("PIIGUARD_ENGINE_REMOTE_ANONYMIZER_URL") {
        config.engine.remote.anonymizer_url = val;
    }
    if let Ok(val) = std::env::var("PIIGUARD_ENGINE_REMOTE_ANONYMIZER_API_KEY") {
        config.engine.remote.anonymizer_api_key = Some(secret_string(val));
    }

    // OCR overrides
    if let Ok(val) = std::env::var("PIIGUARD_OCR_TESSERACT_CMD") {
        config.ocr.tesseract_cmd = val;
    }
    if let Ok(val) = std::env::var("PIIGUARD_OCR_PDFTOPPM_CMD") {
        config.ocr.pdftoppm_cmd = val;
    }
    if let Ok(val) = std::env::var("PIIGUARD_OCR_LANGUAGE") {
        config.ocr.language = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PIIGUARD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PIIGUARD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("PIIGUARD_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
