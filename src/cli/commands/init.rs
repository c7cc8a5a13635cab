//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "piiguard.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing PiiGuard configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set engine.mode to 'local' or 'remote'");
                println!("  3. For remote mode, put the API keys in a .env file:");
                println!("     - PIIGUARD_ENGINE_REMOTE_ANALYZER_API_KEY");
                println!("     - PIIGUARD_ENGINE_REMOTE_ANONYMIZER_API_KEY");
                println!("  4. Validate configuration: piiguard validate-config");
                println!("  5. Start the server: piiguard serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        r#"# PiiGuard Configuration File
# PII detection and anonymization service
#
# Values may reference environment variables as ${VAR_NAME}, and any key can be
# overridden with PIIGUARD_<SECTION>_<KEY> (for example PIIGUARD_SERVER_PORT).

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Include error details in HTTP 500 responses
debug = false

# ============================================================================
# HTTP Server
# ============================================================================
[server]
host = "0.0.0.0"
port = 8000

# Origins allowed by CORS
allowed_origins = ["http://localhost:8080", "http://localhost:3000"]

# Maximum upload size in bytes
max_file_size = 10485760

# ============================================================================
# Detection Engine
# ============================================================================
[engine]
# local: in-process pattern recognizers
# remote: Presidio analyzer/anonymizer services over HTTP
mode = "local"

supported_languages = ["en"]

# Optional custom pattern library (TOML)
# pattern_library = "/etc/piiguard/patterns.toml"

# Key for the hash operator; a random key is used per process when unset
# hash_key = "${PIIGUARD_HASH_KEY}"

[engine.remote]
analyzer_url = "http://localhost:5002"
anonymizer_url = "http://localhost:5001"
# analyzer_api_key = "${PRESIDIO_ANALYZER_KEY}"
# anonymizer_api_key = "${PRESIDIO_ANONYMIZER_KEY}"

# ============================================================================
# OCR
# ============================================================================
[ocr]
tesseract_cmd = "/usr/bin/tesseract"
pdftoppm_cmd = "/usr/bin/pdftoppm"
language = "eng"
supported_languages = ["eng", "deu", "fra", "spa"]

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false
local_path = "./logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
