//! External system integrations for PiiGuard.
//!
//! This module provides adapters for the systems PiiGuard talks to:
//!
//! - [`engine`] - Backend trait and factory
//! - [`local`] - In-process pattern backend
//! - [`presidio`] - Remote Presidio analyzer/anonymizer over HTTP
//! - [`pdf`] - PDF text extraction and page rasterization
//! - [`ocr`] - Tesseract OCR
//! - [`process`] - Running external binaries over stdin/stdout
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. The detection backend is chosen
//! once at startup:
//!
//! ```rust,no_run
//! use piiguard::adapters::engine::create_backend;
//! use piiguard::config::PiiGuardConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PiiGuardConfig::default();
//! let backend = create_backend(&config)?;
//! println!("Using {} engine", backend.name());
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod local;
pub mod ocr;
pub mod pdf;
pub mod presidio;
pub mod process;
