use bloom::node::Mode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bloomboard", version, about = "A board of movable, expandable nodes")]
pub struct Args {
    /// Read this file instead of the platform config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start every node in this mode (movable, expandable, clicks_only)
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// Write the bundled default config and print its path
    #[arg(long)]
    pub write_default_config: bool,
}
