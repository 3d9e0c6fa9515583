// Command line pieces shared by both binaries.

use clap::{ArgAction, Args};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::default_config_path;

/// Appended to `--help` of both binaries.
pub const CONFIG_HELP: &str = "The config file is in TOML format and may contain any number of \
sections, each describing one SeedDMS installation:
  baseurl: url of the restapi service
  username: name of the user
  password: password of the user, asked for if not set
  targetfolder: folder id, or array of folder ids to choose from";

/// Flags common to the email and the file uploader.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Read this config file [default: ~/.seeddms-upload.conf]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Take this section from the config file
    #[arg(short, long)]
    pub section: Option<String>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }
}

/// Install the tracing subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("seeddms_upload={}", level)));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
