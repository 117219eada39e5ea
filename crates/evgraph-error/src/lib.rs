//! # evgraph-error
//!
//! Unified error handling for evgraph.
//!
//! The graph builder itself never fails: unresolved references become
//! placeholder nodes. Errors only come from the layers around it, such as
//! reading a manifest, parsing a config file or writing the rendered output.
//!
//! - **ErrorKind**: what went wrong (e.g. `DeserializationFailed`, `FileNotFound`)
//! - **Operation**: where it went wrong (`manifest::load`, `cli::write_output`)
//! - **Context**: key/value pairs that help locate the cause
//! - **Source**: the wrapped underlying error, if any
//!
//! ## Usage
//!
//! ```rust
//! use evgraph_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::InvalidFormat, "expected a list of resources")
//!         .with_operation("manifest::parse")
//!         .with_context("path", "cluster.json"))
//! }
//! ```

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using evgraph Error
pub type Result<T> = std::result::Result<T, Error>;
