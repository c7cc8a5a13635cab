//! Core business logic for PiiGuard.
//!
//! # Modules
//!
//! - [`service`] - Text analysis, anonymization, batches and deanonymization
//! - [`document`] - PDF pipelines and image redaction built on the service
//!
//! # Example
//!
//! ```rust,no_run
//! use piiguard::adapters::engine::create_backend;
//! use piiguard::anonymization::models::AnalyzeRequest;
//! use piiguard::config::load_config;
//! use piiguard::core::service::AnonymizationService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("piiguard.toml")?;
//! let service = AnonymizationService::new(create_backend(&config)?);
//!
//! let response = service
//!     .analyze(&AnalyzeRequest::new("Call 555-123-4567"))
//!     .await?;
//! println!("Found {} entities", response.entities.len());
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod service;
