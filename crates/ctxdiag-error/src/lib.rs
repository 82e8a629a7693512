//! # ctxdiag-error
//!
//! Unified error handling for ctxdiag.
//!
//! - **ErrorKind**: what went wrong (e.g., ConfigInvalid, ElementNotFound)
//! - **Context**: which operation failed, plus key/value details
//! - **Source**: the wrapped underlying error, never leaked as a raw type
//!
//! ## Usage
//!
//! ```rust
//! use ctxdiag_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ConfigInvalid, "attribute name is required")
//!         .with_operation("collect::compile")
//!         .with_context("path", "include[0]"))
//! }
//! ```
//!
//! Nothing in ctxdiag is retried: every error is reported once, and callers
//! further up only append context.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using the ctxdiag Error
pub type Result<T> = std::result::Result<T, Error>;
