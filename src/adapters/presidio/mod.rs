//! Remote Presidio-compatible engine
//!
//! Detection is delegated to an analyzer service (`POST /analyze`) and
//! replacement to an anonymizer service (`POST /anonymize`, `POST /deanonymize`).

pub mod client;
pub mod models;

pub use client::{PresidioClient, REMOTE_ENGINE_NAME, REMOTE_ENGINE_VERSION};
