use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use release_updater::config::{self, UpdaterConfig};
use release_updater::logging::init_logging;
use release_updater::update::verify::{self, Verification};
use release_updater::update::{ReleaseDescriptor, UpdateChecker};

#[derive(Parser)]
#[command(name = "release-updater")]
#[command(version, about = "Check GitHub releases for application updates")]
struct Cli {
    /// JSON file with updater settings (camelCase keys)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Version of the installed application
    #[arg(long, global = true, default_value = env!("CARGO_PKG_VERSION"))]
    current_version: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report whether a newer release is available
    Check,
    /// Download the newer release's installer, verifying it when possible
    Download {
        /// Directory the installer is written to
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Compare a file against a base64 SHA-512 digest
    Verify { file: PathBuf, sha512: String },
    /// Check periodically until interrupted
    Watch,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_dir = matches!(cli.command, Command::Watch).then(config::log_dir);
    let _guard = init_logging(log_dir.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Check => {
            let (_, checker) = load_checker(cli.config.as_deref())?;
            match checker.check_for_update(&cli.current_version).await? {
                Some(update) => print_update(&update),
                None => println!("{} is up to date", cli.current_version),
            }
        }
        Command::Download { dir } => {
            let (_, checker) = load_checker(cli.config.as_deref())?;
            let Some(update) = checker.check_for_update(&cli.current_version).await? else {
                println!("{} is up to date", cli.current_version);
                return Ok(ExitCode::SUCCESS);
            };
            print_update(&update);

            let dir = dir.unwrap_or_else(config::download_dir);
            let path = checker.download_update(&update, &dir).await?;
            println!("downloaded: {}", path.display());
        }
        Command::Verify { file, sha512 } => return Ok(verify_file(&file, &sha512).await),
        Command::Watch => {
            let (config, checker) = load_checker(cli.config.as_deref())?;
            watch(&checker, &config, &cli.current_version).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_checker(path: Option<&Path>) -> anyhow::Result<(UpdaterConfig, UpdateChecker)> {
    let config = load_config(path)?;
    let checker = UpdateChecker::new(&config).context("Failed to create update checker")?;
    Ok((config, checker))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<UpdaterConfig> {
    let Some(path) = path else {
        return Ok(UpdaterConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

async fn verify_file(file: &Path, sha512: &str) -> ExitCode {
    match verify::check(file, sha512).await {
        Verification::Match => {
            println!("match");
            ExitCode::SUCCESS
        }
        Verification::Mismatch { actual } => {
            println!("mismatch (actual {actual})");
            ExitCode::FAILURE
        }
        Verification::Unreadable(e) => {
            println!("unreadable ({e})");
            ExitCode::FAILURE
        }
    }
}

/// Sequential checks on a fixed interval; a failing check never stops the loop
async fn watch(checker: &UpdateChecker, config: &UpdaterConfig, current_version: &str) {
    let mut interval = tokio::time::interval(config.check_interval());
    let mut shutdown = std::pin::pin!(tokio::signal::ctrl_c());
    info!(
        "Checking {} every {:?}",
        config.repository,
        config.check_interval()
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Some(update) = checker.check_quietly(current_version).await {
                    info!("Update available: {} ({})", update.version, update.download_url);
                }
            }
            _ = &mut shutdown => {
                info!("Stopping update checks");
                return;
            }
        }
    }
}

fn print_update(update: &ReleaseDescriptor) {
    println!("update available: {}", update.version);
    println!("file: {}", update.file_name);
    println!("url: {}", update.download_url);
    if let Some(checksum) = &update.checksum {
        println!("sha512: {checksum}");
    }
    if let Some(notes) = &update.release_notes {
        println!();
        println!("{notes}");
    }
}
