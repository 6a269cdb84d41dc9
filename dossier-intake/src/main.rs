//! dossier-intake - attachment intake and review checks
//!
//! `classify` stages files from disk exactly like the upload form would and
//! reports whether the set can be submitted. `review` evaluates the
//! needs-review flag for rows of field observations read from JSON.
//!
//! Results go to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

use dossier_intake::config::{build_review_engine, build_validator, resolve_config, CliOverrides};
use dossier_intake::review::FunctionRow;
use dossier_intake::UploadCandidate;

#[derive(Debug, Parser)]
#[command(name = "dossier-intake", version, about = "Attachment intake and review checks")]
struct Cli {
    /// Config file (overrides DOSSIER_CONFIG and the platform default)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Upload size limit in bytes
    #[arg(long, global = true)]
    max_upload_bytes: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Stage files and check the submission gate
    Classify {
        /// Files to stage
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Slot used for files whose name carries no attachment number
        #[arg(long)]
        slot: Option<u8>,
    },
    /// Compute needs-review flags for rows of field observations
    Review {
        /// JSON file with an array of rows
        input: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise start at info and switch to logging.level once
    // the config is known
    let env_filter = EnvFilter::try_from_default_env().ok();
    let filter_from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "dossier-intake v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("DOSSIER_GIT_REVISION"),
        env!("DOSSIER_BUILD_TIMESTAMP"),
        env!("DOSSIER_BUILD_PROFILE")
    );

    let overrides = CliOverrides {
        config_path: cli.config.clone(),
        max_upload_bytes: cli.max_upload_bytes,
    };
    let config = resolve_config(&overrides).context("Failed to resolve configuration")?;

    if !filter_from_env {
        match EnvFilter::try_new(&config.logging.level) {
            Ok(level) => filter_handle
                .reload(level)
                .context("Failed to apply logging.level")?,
            Err(e) => warn!("Invalid logging.level {:?}: {} - keeping info", config.logging.level, e),
        }
    }

    match cli.command {
        Command::Classify { files, slot } => {
            let mut validator = build_validator(&config);
            let mut rejected = Vec::new();

            for path in &files {
                let candidate = match UploadCandidate::from_path(path) {
                    Ok(candidate) => candidate,
                    Err(e) => {
                        warn!("Failed to read {}: {}", path.display(), e);
                        rejected.push(serde_json::json!({
                            "file": path.display().to_string(),
                            "error": e.to_string(),
                        }));
                        continue;
                    }
                };
                let name = candidate.name.clone();
                if let Err(e) = validator.add_with_slot(candidate, slot) {
                    warn!("{}: {}", name, e);
                    rejected.push(serde_json::json!({ "file": name, "error": e.to_string() }));
                }
            }

            let state = validator.state();
            let submittable = state.can_submit && rejected.is_empty();
            let report = serde_json::json!({
                "state": state,
                "rejected": rejected,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);

            if submittable {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(2))
            }
        }
        Command::Review { input } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let rows: Vec<FunctionRow> =
                serde_json::from_str(&content).context("Invalid review input")?;

            let summary = build_review_engine(&config).review_rows(&rows);
            info!(
                "{} of {} row(s) need review",
                summary.rows_needing_review,
                summary.rows.len()
            );
            println!("{}", serde_json::to_string_pretty(&summary)?);

            Ok(ExitCode::SUCCESS)
        }
    }
}
