// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: enabled features
fn with_arg() -> Arg {
    Arg::new("with")
        .short('w')
        .long("with")
        .value_name("FEATURES")
        .default_value("")
        .help("Optional features to enable, comma separated (e.g. zlib,bzip2)")
}

/// Common argument: build type
fn build_type_arg() -> Arg {
    Arg::new("build_type")
        .short('b')
        .long("build-type")
        .default_value("Release")
        .help("Build type: Debug, Release, RelWithDebInfo or MinSizeRel")
}

/// Common argument: target operating system
fn os_arg() -> Arg {
    Arg::new("os")
        .long("os")
        .default_value("Linux")
        .help("Target operating system")
}

/// Common argument: target architecture
fn arch_arg() -> Arg {
    Arg::new("arch")
        .long("arch")
        .help("Target architecture (default: host)")
}

/// Build type, operating system and architecture
fn platform_args() -> [Arg; 3] {
    [build_type_arg(), os_arg(), arch_arg()]
}

fn build_cli() -> Command {
    Command::new("acetao")
        .version(env!("CARGO_PKG_VERSION"))
        .author("acetao Contributors")
        .about("Inspect and validate the ACE+TAO component registry")
        .subcommand_required(true)
        .arg(
            Arg::new("manifest")
                .short('m')
                .long("manifest")
                .value_name("PATH")
                .global(true)
                .help("Component manifest to use instead of the built-in ACE+TAO table"),
        )
        .subcommand(
            Command::new("features").about("List the optional features the manifest declares"),
        )
        .subcommand(
            Command::new("components")
                .about("List components present for a feature set")
                .arg(with_arg())
                .args(platform_args()),
        )
        .subcommand(
            Command::new("show")
                .about("Show one component")
                .arg(Arg::new("id").required(true).help("Component id"))
                .arg(
                    Arg::new("transitive")
                        .short('t')
                        .long("transitive")
                        .action(ArgAction::SetTrue)
                        .help("Include transitive requirements and system libraries"),
                )
                .arg(with_arg())
                .args(platform_args()),
        )
        .subcommand(
            Command::new("check")
                .about("Build the registry for every feature combination and report problems")
                .args(platform_args()),
        )
        .subcommand(
            Command::new("link-order")
                .about("Print components in link order, requirements first")
                .arg(with_arg())
                .args(platform_args()),
        )
        .subcommand(
            Command::new("package-info")
                .about("Emit package metadata as JSON")
                .arg(
                    Arg::new("package_folder")
                        .short('p')
                        .long("package-folder")
                        .required(true)
                        .help("Folder the package is installed in"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print the JSON"),
                )
                .arg(with_arg())
                .args(platform_args()),
        )
        .subcommand(
            Command::new("build-plan")
                .about(
                    "Print the make arguments, environment and feature file for the external build",
                )
                .arg(
                    Arg::new("source_folder")
                        .short('s')
                        .long("source-folder")
                        .required(true)
                        .help("Folder the upstream source tarball was unpacked into"),
                )
                .arg(with_arg())
                .args(platform_args()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=data/ace-tao.toml");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("acetao.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
