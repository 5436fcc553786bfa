//! Domain types shared across the crate.
//!
//! The domain layer provides:
//! - **Error types** ([`AnonymizerError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, AnonymizerError>`]:
//!
//! ```rust
//! use pii_anonymizer::domain::{AnonymizerError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(AnonymizerError::Validation("empty input".to_string()))
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::AnonymizerError;
pub use result::Result;
