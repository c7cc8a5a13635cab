//! Detection/anonymization backend abstraction
//!
//! The service layer talks to one [`AnonymizationBackend`], chosen at startup
//! from `engine.mode`: the in-process pattern engine or a remote
//! Presidio-compatible analyzer/anonymizer pair.

pub mod factory;
pub mod traits;

pub use factory::create_backend;
pub use traits::AnonymizationBackend;
