//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── service: ServiceConfig  # Database, SMTP, session keys, admin gate
//! └── server: ServerConfig    # Host, port, timeouts, CORS
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Configure database and server
//! campus-cli --postgres-url "postgresql://..." --port 8080
//!
//! # Or via environment variables
//! POSTGRES_URL="postgresql://..." PORT=8080 campus-cli
//! ```

mod server;

use campus_server::service::ServiceConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;

/// Complete CLI configuration.
///
/// Combines all configuration groups for the campus server:
/// - [`ServiceConfig`]: External service connections and secrets
/// - [`ServerConfig`]: Network binding and lifecycle
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "campus")]
#[command(about = "Campus student-registration portal server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// External service configuration (database, SMTP, secrets).
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads environment variables from .env (if enabled) and parses
    /// CLI arguments.
    ///
    /// This is the preferred way to initialize the CLI configuration as
    /// it ensures .env files are loaded before clap parses arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from a .env file if the dotenv
    /// feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}
}
