// CLI module for server startup and administrative operations

pub mod bootstrap;
pub mod migrate;
pub mod seed;

use clap::{Parser, Subcommand};

/// CourseHub backend
#[derive(Parser, Debug)]
#[command(name = "coursehub-backend")]
#[command(about = "CourseHub course marketplace backend", long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run migrations, bootstrap, and start the HTTP server
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create the protected admin account if it does not exist
    BootstrapAdmin,

    /// Insert the demo courses when the catalog is empty
    Seed,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
