//! Command-line interface for Skywalker

use crate::core::types::ListRule;
use clap::Parser;
use std::path::PathBuf;

pub mod walk;

/// Skywalker - concurrent filtered directory walker
#[derive(Parser, Debug)]
#[command(
    name = "skywalker",
    version,
    about = "Walk a directory tree concurrently and print the paths that pass the filters",
    long_about = "Skywalker walks a directory tree, prunes excluded directories without visiting them, \
                  filters files by directory, extension and glob rules, and hands the remaining paths \
                  to a pool of workers. This binary's workers print each path."
)]
pub struct Cli {
    /// Directory to walk (default: root from --config, or the current directory)
    pub root: Option<PathBuf>,

    /// Load walk settings from a TOML file; flags override its values
    #[arg(short, long, env = "SKYWALKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of worker threads (0 = one per CPU)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// How many paths may wait for a worker
    #[arg(long)]
    pub queue_size: Option<usize>,

    /// Print admitted directories as well as files
    #[arg(long)]
    pub include_dirs: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub follow_links: bool,

    /// Maximum depth below the root
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Directory relative to the root (repeatable)
    #[arg(long = "dir", value_name = "DIR")]
    pub dirs: Vec<String>,

    /// How --dir entries are applied
    #[arg(long, value_name = "RULE", value_parser = parse_rule)]
    pub dir_rule: Option<ListRule>,

    /// File extension including the leading dot, e.g. .log (repeatable)
    #[arg(long = "ext", value_name = "EXT", allow_hyphen_values = true)]
    pub exts: Vec<String>,

    /// How --ext entries are applied
    #[arg(long, value_name = "RULE", value_parser = parse_rule)]
    pub ext_rule: Option<ListRule>,

    /// Glob pattern matched against the root-relative path, e.g. '*.rs' (repeatable)
    #[arg(long = "glob", value_name = "PATTERN")]
    pub globs: Vec<String>,

    /// How --glob patterns are applied
    #[arg(long, value_name = "RULE", value_parser = parse_rule)]
    pub glob_rule: Option<ListRule>,

    /// Terminate printed paths with NUL instead of newline
    #[arg(short = '0', long)]
    pub null: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_rule(s: &str) -> Result<ListRule, String> {
    s.parse()
}
