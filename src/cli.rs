//! Command line interface.

use clap::{Parser, Subcommand};

/// Identity service: users, roles, permissions and session-bound tokens.
#[derive(Debug, Parser)]
#[command(name = "identity-server", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to apply on top of `config/default.toml`
    #[arg(short, long, env = "IDENTITY_ENV", default_value = "development")]
    pub env: String,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run migrations, seed, and start the HTTP server
    Serve,
    /// Run migrations and seed data, then exit
    Migrate,
    /// Print the Argon2id hash of a password
    HashPassword {
        /// Plaintext password
        password: String,
    },
}
