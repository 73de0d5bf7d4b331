use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "objd",
    about = "objd: minimal object storage over HTTP",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "objd_store=trace")
    #[arg(long, global = true, default_value = "info")]
    pub log: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Listen address (overrides config)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Storage root directory (overrides config)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML config file to read instead of the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
