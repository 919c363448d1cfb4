//! [`Args`] definitions.

use clap::Parser;

/// Interactive console of the real estate management system.
///
/// Manages properties, owners, tenants, leases, maintenance requests,
/// payments and employees stored in a Postgres database.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Path to the TOML configuration file, which may be missing.
    #[arg(short, long, env = "REALTY_CONFIG", default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// If the arguments are malformed, or help or version was requested.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
