//! Domain errors and result types for PiiGuard.
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, PiiGuardError>`]:
//!
//! ```rust,no_run
//! use piiguard::domain::{PiiGuardError, Result};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = piiguard::config::load_config("piiguard.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{PiiGuardError, RemoteError};
pub use result::Result;
