//! CLI module for the Usuarios API
//!
//! Running without a subcommand is the same as `serve`.

pub mod serve;

use clap::{Parser, Subcommand};

/// Usuarios API - user registration with short-lived JWT sessions
#[derive(Parser)]
#[command(name = "usuarios-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
}

impl Cli {
    /// The requested command, defaulting to `serve`
    pub fn command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Serve(serve::ServeArgs::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["usuarios-api"]).unwrap();

        match cli.command() {
            Command::Serve(args) => assert_eq!(args.port, None),
        }
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::try_parse_from(["usuarios-api", "serve", "--port", "8080"]).unwrap();

        match cli.command() {
            Command::Serve(args) => assert_eq!(args.port, Some(8080)),
        }
    }
}
