// src/cli.rs
//! CLI definitions for acetao
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "acetao")]
#[command(author = "acetao Contributors")]
#[command(version)]
#[command(about = "Inspect and validate the ACE+TAO component registry", long_about = None)]
pub struct Cli {
    /// Component manifest to use instead of the built-in ACE+TAO table
    #[arg(short, long, global = true, value_name = "PATH")]
    pub manifest: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Build settings shared by every registry-building command
#[derive(Args, Debug, Clone)]
pub struct Platform {
    /// Build type: Debug, Release, RelWithDebInfo or MinSizeRel
    #[arg(short, long, default_value = "Release")]
    pub build_type: String,

    /// Target operating system
    #[arg(long, default_value = "Linux")]
    pub os: String,

    /// Target architecture (default: host)
    #[arg(long)]
    pub arch: Option<String>,
}

/// Feature set and build settings selecting one registry
#[derive(Args, Debug, Clone)]
pub struct Selection {
    /// Optional features to enable, comma separated (e.g. zlib,bzip2)
    #[arg(short, long = "with", value_name = "FEATURES", default_value = "")]
    pub with: String,

    #[command(flatten)]
    pub platform: Platform,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the optional features the manifest declares
    Features,

    /// List components present for a feature set
    Components {
        #[command(flatten)]
        selection: Selection,
    },

    /// Show one component
    Show {
        /// Component id (e.g. TAO_PortableServer)
        id: String,

        /// Include transitive requirements and system libraries
        #[arg(short, long)]
        transitive: bool,

        #[command(flatten)]
        selection: Selection,
    },

    /// Build the registry for every feature combination and report problems
    Check {
        #[command(flatten)]
        platform: Platform,
    },

    /// Print components in link order, requirements first
    LinkOrder {
        #[command(flatten)]
        selection: Selection,
    },

    /// Emit package metadata as JSON
    PackageInfo {
        /// Folder the package is installed in
        #[arg(short, long)]
        package_folder: String,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        selection: Selection,
    },

    /// Print the make arguments, environment and feature file for the external build
    BuildPlan {
        /// Folder the upstream source tarball was unpacked into
        #[arg(short, long)]
        source_folder: String,

        #[command(flatten)]
        selection: Selection,
    },
}
