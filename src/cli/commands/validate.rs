//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the PiiGuard configuration file.

use crate::adapters::engine::create_backend;
use crate::config::{load_config, EngineMode};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also runs schema validation
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Building the backend also compiles a custom pattern library
        let backend = match create_backend(&config) {
            Ok(b) => b,
            Err(e) => {
                println!("❌ Detection engine could not be created");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Debug: {}", config.application.debug);
        println!("  Bind Address: {}", config.server.bind_address());
        println!("  Allowed Origins: {:?}", config.server.allowed_origins);
        println!("  Max File Size: {} bytes", config.server.max_file_size);
        println!("  Engine Mode: {}", config.engine.mode);
        println!("  Engine: {}", backend.name());
        if config.engine.mode == EngineMode::Remote {
            println!("  Analyzer URL: {}", config.engine.remote.analyzer_url);
            println!("  Anonymizer URL: {}", config.engine.remote.anonymizer_url);
        } else if let Some(path) = &config.engine.pattern_library {
            println!("  Pattern Library: {path}");
        }
        println!("  Languages: {:?}", config.engine.supported_languages);
        println!("  OCR Language: {}", config.ocr.language);
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/piiguard.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_minimal_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9000").unwrap();
        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_bad_pattern_library() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\npattern_library = \"/nonexistent/patterns.toml\"").unwrap();
        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
