//! PII detection and anonymization
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Detection** ([`detector`]): pattern recognizers with context boosting,
//!   checksum validation and overlap resolution
//! - **Operators** ([`anonymizer`]): replace, redact, hash, mask and encrypt
//! - **Replacement** ([`engine`]): applies operators to spans and tracks the
//!   offsets of every replacement in the output
//!
//! # Usage
//!
//! ```rust,no_run
//! use piiguard::anonymization::config::AnonymizationStrategy;
//! use piiguard::anonymization::detector::{PiiDetector, RegexDetector};
//! use piiguard::anonymization::engine::ReplacementEngine;
//!
//! # fn example() -> piiguard::domain::Result<()> {
//! let detector = RegexDetector::new(vec!["en".to_string()])?;
//! let text = "Mail john@example.com";
//! let spans = detector.detect(text, None, "en", 0.35)?;
//!
//! let engine = ReplacementEngine::new(b"hash-key");
//! let outcome = engine.anonymize(text, &spans, AnonymizationStrategy::Redact, None, None)?;
//! assert_eq!(outcome.text, "Mail [REDACTED]");
//! # Ok(())
//! # }
//! ```

pub mod anonymizer;
pub mod config;
pub mod detector;
pub mod engine;
pub mod models;
