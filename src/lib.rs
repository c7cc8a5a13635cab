// PiiGuard - PII detection and anonymization service
// Copyright (c) 2025 PiiGuard Contributors
// Licensed under the MIT License

//! # PiiGuard - PII detection and anonymization
//!
//! PiiGuard finds personally identifiable information in text, PDFs and images
//! and replaces, redacts, hashes, masks or encrypts it.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** PII spans with an in-process pattern engine or a remote
//!   Presidio analyzer
//! - **Anonymizing** text with per-entity strategies while keeping offsets
//!   consistent
//! - **Processing** PDFs page by page, from the text layer or through OCR
//! - **Redacting** images by painting over OCR word boxes
//! - **Serving** all of the above over HTTP
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`server`] - HTTP routes, upload handling and error responses
//! - [`core`] - Text anonymization service and document pipelines
//! - [`anonymization`] - Detection, operators and the replacement engine
//! - [`adapters`] - Backends and external tools (Presidio, pdftoppm, tesseract)
//! - [`domain`] - Error and result types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use piiguard::adapters::local::LocalBackend;
//! use piiguard::anonymization::config::AnonymizationStrategy;
//! use piiguard::anonymization::models::AnonymizeRequest;
//! use piiguard::config::EngineConfig;
//! use piiguard::core::service::AnonymizationService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = LocalBackend::from_config(&EngineConfig::default())?;
//!     let service = AnonymizationService::new(Arc::new(backend));
//!
//!     let request = AnonymizeRequest::new(
//!         "Contact John Doe at john@example.com",
//!         AnonymizationStrategy::Replace,
//!     );
//!     let response = service.anonymize(&request).await?;
//!
//!     assert_eq!(response.text, "Contact PERSON at EMAIL_ADDRESS");
//!     Ok(())
//! }
//! ```
//!
//! ## Offsets
//!
//! All offsets are codepoint offsets. In an anonymize response `entities`
//! index the submitted text and `items` index the anonymized text.
//!
//! ## Error Handling
//!
//! Library operations return [`domain::PiiGuardError`]. The HTTP layer maps
//! validation errors to 400, oversize uploads to 413 and everything else to a
//! generic 500.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
