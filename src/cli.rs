use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "meeting-attendance-sheet", version, about)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "CONFIG_PATH", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Override the listen port from the configuration
    #[arg(short, long, env = "ATTENDANCE_PORT")]
    pub port: Option<u16>,
}
