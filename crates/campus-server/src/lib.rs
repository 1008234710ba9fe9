#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};

/// Tracing target for authentication operations.
pub const TRACING_TARGET_AUTHENTICATION: &str = "campus_server::authentication";

/// Tracing target for authorization (admin gate) operations.
pub const TRACING_TARGET_AUTHORIZATION: &str = "campus_server::authorization";
