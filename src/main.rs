//! Ripple-Stack main entry point
//!
//! Walks an offline link map depth-first with a shared ancestor stack.

use anyhow::Context;
use clap::Parser;
use ripple_stack::config::{load_config_with_hash, Config};
use ripple_stack::crawler::{walk, WalkReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Stack: depth-first walks with bounded ancestor state
///
/// Reads a TOML configuration holding the crawl limits, the seed URLs and an
/// offline link map, then walks it with a pool of workers that share one
/// ancestor stack.
#[derive(Parser, Debug)]
#[command(name = "ripple-stack")]
#[command(version = "1.0.0")]
#[command(about = "Depth-first walks with bounded ancestor state", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be walked without walking
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let report = walk(&config).await.context("walk failed")?;
    if !cli.quiet {
        print_report(&report, &config_hash);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_stack=info,warn"),
            1 => EnvFilter::new("ripple_stack=debug,info"),
            2 => EnvFilter::new("ripple_stack=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(verbose >= 2)
        .with_file(false)
        .init();
}

fn print_dry_run(config: &Config) {
    println!("=== Ripple-Stack Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Ancestor stack slots: {}", config.crawler.max_depth + 1);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Max off-site hops: {}", config.crawler.max_offsite_hops);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed.url);
    }

    let link_count: usize = config.links.iter().map(|l| l.to.len()).sum();
    println!(
        "\nLink map: {} pages, {} links",
        config.links.len(),
        link_count
    );

    println!("\n✓ Configuration is valid");
}

fn print_report(report: &WalkReport, config_hash: &str) {
    println!("=== Walk Report ===\n");
    println!("Config hash: {}", config_hash);

    println!("\nVisited ({}):", report.visited.len());
    for visit in &report.visited {
        println!("  {}{}", "  ".repeat(visit.depth as usize), visit.url);
    }

    println!("\nSkipped by policy: {}", report.policy_skips);
    println!("Skipped beyond max depth: {}", report.depth_skips);
    println!("Duplicates: {}", report.duplicate_skips);
    println!("Untracked branches: {}", report.untracked_branches);
    println!("Retired stack entries: {}", report.retired_entries);
    println!("Entries left on stack: {}", report.stack_residue);
}
