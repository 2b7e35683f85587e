//! Command-line front end for the modpack installer
//!
//! Thin glue only: argument parsing, a console status reporter and exit
//! codes. All installation logic lives in the `unpacker` crate.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use unpacker::catalog::CatalogClient;
use unpacker::{
    ConsoleStatusReporter, InstallConfig, InstallMode, InstallOutcome, Installer,
    IntoStatusCallback,
};

#[derive(Parser)]
#[command(name = "unpacker", about = "Download and install modpacks", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print per-file progress details
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Install a modpack from its archive URL
    Install {
        /// URL of the pack archive
        url: String,
        /// Output folder (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Server mode: skip entries marked unsupported on servers
        #[arg(short, long)]
        server: bool,
        /// Maximum concurrent asset downloads
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Search the pack catalog
    Search {
        query: String,
    },
    /// Print the archive URL of a pack's latest version
    Resolve {
        project_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Install {
            url,
            output,
            server,
            concurrency,
        } => install(url, output, server, concurrency, cli.verbose).await,
        Command::Search { query } => search(&query).await,
        Command::Resolve { project_id } => resolve(&project_id).await,
    }
}

async fn install(
    url: String,
    output: Option<PathBuf>,
    server: bool,
    concurrency: Option<usize>,
    verbose: bool,
) -> anyhow::Result<ExitCode> {
    let mut config = InstallConfig::default()
        .with_output_root(output.unwrap_or_else(|| PathBuf::from(".")))
        .with_mode(if server {
            InstallMode::Server
        } else {
            InstallMode::Client
        });
    if let Some(max) = concurrency {
        config = config.with_max_concurrent_downloads(max);
    }

    let installer = Installer::new(config).context("failed to set up installer")?;
    let callback = ConsoleStatusReporter::new(verbose).into_callback();

    let outcome = installer
        .install(&url, Some(callback))
        .await
        .context("installation failed")?;

    match outcome {
        InstallOutcome::Installed(report) => {
            println!(
                "{} downloaded, {} already present, {} skipped for this mode",
                report.downloaded, report.skipped_existing, report.skipped_unsupported
            );
            if report.is_complete() {
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("{} file(s) failed:", report.failures.len());
                for failure in &report.failures {
                    eprintln!("  {}", failure);
                }
                Ok(ExitCode::FAILURE)
            }
        }
        InstallOutcome::NothingToInstall { install_dir } => {
            println!(
                "Pack contained no manifest or overrides; nothing installed under {}",
                install_dir.display()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn search(query: &str) -> anyhow::Result<ExitCode> {
    let client = CatalogClient::new(&InstallConfig::default())
        .context("failed to set up catalog client")?;
    let hits = client.search(query).await.context("catalog search failed")?;

    if hits.is_empty() {
        println!("No packs found for '{}'", query);
        return Ok(ExitCode::FAILURE);
    }
    for hit in hits {
        println!("{}  {}", hit.project_id, hit.title);
        if !hit.description.is_empty() {
            println!("    {}", hit.description);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn resolve(project_id: &str) -> anyhow::Result<ExitCode> {
    let client = CatalogClient::new(&InstallConfig::default())
        .context("failed to set up catalog client")?;
    let url = client
        .latest_pack_url(project_id)
        .await
        .context("version lookup failed")?;
    println!("{}", url);
    Ok(ExitCode::SUCCESS)
}
