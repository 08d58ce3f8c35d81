//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Duet server.
///
/// These override the corresponding configuration-file settings.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path. A default file is created when absent.
    #[arg(short, long, default_value = "duet.toml")]
    pub config: PathBuf,

    /// Listen address override ("IP:PORT", e.g. "0.0.0.0:3000").
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Story data file override (the authored game-data.json).
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Static asset directory override.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: PathBuf::from("duet.toml"),
            listen: None,
            data: None,
            assets: None,
            debug: false,
        }
    }
}
