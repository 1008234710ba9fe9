//! [`Error`], [`ErrorKind`] and [`Result`] for HTTP handlers.

mod http_error;
mod pg_error;

pub use http_error::{Error, ErrorKind, Result};
