use clap::Parser;
use std::path::PathBuf;

/// A terminal form for registering users
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Config {
    /// The server to submit registrations to
    #[clap(long, default_value = "http://localhost:3118")]
    pub server: String,

    /// Where should we write logs?
    #[clap(long)]
    log_dir: Option<PathBuf>,
}

impl Config {
    /// Get either the configured or a default log directory. If no directory
    /// can be found (e.g. because `$HOME` is unset) we will use the current
    /// directory.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("", "", "registro")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
