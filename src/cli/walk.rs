//! Walk command implementation

use crate::cli::Cli;
use crate::config::{ListConfig, WalkConfig};
use crate::core::types::ListRule;
use crate::walker::{Skywalker, Worker};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Prints each path it receives to a shared writer, one record at a time
pub struct PathPrinter<W: Write + Send> {
    out: Mutex<W>,
    terminator: u8,
}

impl<W: Write + Send> PathPrinter<W> {
    pub fn new(out: W, null_terminated: bool) -> Self {
        Self {
            out: Mutex::new(out),
            terminator: if null_terminated { b'\0' } else { b'\n' },
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Worker for PathPrinter<W> {
    fn work(&self, path: &Path) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        // A closed stdout (e.g. piped into `head`) is not the walk's concern
        let _ = out
            .write_all(path.to_string_lossy().as_bytes())
            .and_then(|_| out.write_all(&[self.terminator]));
    }
}

/// Merge the config file (if any) with the command-line flags
pub fn build_config(cli: &Cli) -> Result<WalkConfig> {
    let mut config = match &cli.config {
        Some(path) => WalkConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => WalkConfig::default(),
    };

    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(size) = cli.queue_size {
        config.queue_size = size;
    }
    if cli.include_dirs {
        config.files_only = false;
    }
    if cli.follow_links {
        config.follow_links = true;
    }
    if cli.max_depth.is_some() {
        config.max_depth = cli.max_depth;
    }

    merge_list(&mut config.directories, &cli.dirs, cli.dir_rule);
    merge_list(&mut config.extensions, &cli.exts, cli.ext_rule);
    merge_list(&mut config.globs, &cli.globs, cli.glob_rule);

    Ok(config)
}

/// Entries given on the command line replace the file's entries
fn merge_list(list: &mut ListConfig, entries: &[String], rule: Option<ListRule>) {
    if !entries.is_empty() {
        list.entries = entries.to_vec();
    }
    if let Some(rule) = rule {
        list.rule = rule;
    }
}

/// Execute the walk command, printing admitted paths to stdout
pub fn execute(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let root: PathBuf = config.root.clone();

    let printer = PathPrinter::new(io::stdout(), cli.null);
    Skywalker::from_config(config, printer)
        .walk()
        .with_context(|| format!("Walk of {} failed", root.display()))?;

    io::stdout().flush().context("Failed to flush output")?;
    Ok(())
}
