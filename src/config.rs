/// Configuration management for the MealBridge server.
/// Handles command-line argument parsing and config structure.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "MealBridge")]
#[command(about = "Food donation platform connecting donors with NGOs", long_about = None)]
pub struct Config {
    /// Server port (default: 3000)
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// SQLite database file path (default: mealbridge.db)
    #[arg(long, default_value = "mealbridge.db")]
    pub database: PathBuf,

    /// Session signing secret. When omitted a random key is generated at
    /// startup, which invalidates existing sessions on restart.
    #[arg(long)]
    pub session_secret: Option<String>,

    /// PID file path (optional) - write server PID to this file on startup
    #[arg(long)]
    pub pidfile: Option<PathBuf>,
}

impl Config {
    /// Parse command-line arguments into Config
    pub fn from_args() -> Self {
        Config::parse()
    }
}
