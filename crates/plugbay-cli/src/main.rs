//! Command-line interface for the plugbay plugin host.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use plugbay_core::config::env_vars;
use plugbay_core::{loader, scanner, Host, HostConfig};

/// Plugbay - discover, load and run dynamic plugins.
#[derive(Parser, Debug)]
#[command(name = "plugbay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Load every plugin in the plugin directory and run them concurrently.
    Run {
        /// Plugin directory (overrides config file and environment).
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Configuration file (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the run report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List candidate plugin libraries without loading them.
    List {
        /// Plugin directory to scan.
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Load one plugin library and show its metadata without running it.
    Info {
        /// Path to the plugin library.
        #[arg(required = true)]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    match args.command {
        Command::Run { dir, config, json } => run(dir, config, json).await,
        Command::List { dir } => list(dir),
        Command::Info { path } => info(&path),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "plugbay=debug"
    } else {
        "plugbay=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    // JSON format for production/container environments.
    let json_logging = std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn resolve_config(dir: Option<PathBuf>, config: Option<PathBuf>) -> Result<HostConfig> {
    let mut resolved = match config {
        Some(path) => HostConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HostConfig::default(),
    };
    resolved = resolved.apply_env();
    if let Some(dir) = dir {
        resolved.plugin_dir = dir;
    }
    Ok(resolved)
}

async fn run(dir: Option<PathBuf>, config: Option<PathBuf>, json: bool) -> Result<()> {
    let config = resolve_config(dir, config)?;
    let host = Host::new(config);

    // Fatal startup errors (missing directory) propagate and fail the
    // process; per-plugin load or run failures are part of the report and
    // leave the exit status at success.
    let report = host.run().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn list(dir: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(dir, None)?;
    let candidates = scanner::scan(&config.plugin_dir)?;

    println!(
        "{} candidate(s) in {}",
        candidates.len(),
        config.plugin_dir.display()
    );
    for path in candidates {
        println!("  {}", path.display());
    }
    Ok(())
}

fn info(path: &Path) -> Result<()> {
    let plugin = loader::load(path)
        .with_context(|| format!("loading plugin {}", path.display()))?;

    println!("name:      {}", plugin.name());
    println!("path:      {}", plugin.path().display());
    println!("loaded at: {}", plugin.loaded_at().to_rfc3339());
    Ok(())
}
