//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use simplelog::LevelFilter;

/// Browse a JSON dataset in a sortable, filterable grid
#[derive(Parser, Debug)]
#[command(name = "datagrid-tui", version, about = "Browse a JSON dataset in a grid")]
pub struct CliArgs {
    /// JSON array of rows, or an object with "rows" and "nested"
    #[arg(value_name = "DATA.json")]
    pub data: PathBuf,

    /// Config file (defaults to config.json in the config directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL", default_value = "debug", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Treat the data as hierarchical for striping
    #[arg(long)]
    pub nested: bool,

    /// Mark the upstream fetch as failed
    #[arg(long)]
    pub error: bool,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level '{}'", s))
}
