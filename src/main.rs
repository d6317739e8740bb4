// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let manifest = commands::load_manifest(cli.manifest.as_deref())?;

    match cli.command {
        Commands::Features => commands::cmd_features(&manifest),
        Commands::Components { selection } => commands::cmd_components(&manifest, &selection),
        Commands::Show {
            id,
            transitive,
            selection,
        } => commands::cmd_show(&manifest, &id, transitive, &selection),
        Commands::Check { platform } => commands::cmd_check(&manifest, &platform),
        Commands::LinkOrder { selection } => commands::cmd_link_order(&manifest, &selection),
        Commands::PackageInfo {
            package_folder,
            pretty,
            selection,
        } => commands::cmd_package_info(&manifest, &package_folder, pretty, &selection),
        Commands::BuildPlan {
            source_folder,
            selection,
        } => commands::cmd_build_plan(&manifest, &source_folder, &selection),
    }
}
