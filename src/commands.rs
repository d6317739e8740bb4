// src/commands.rs
//! Command handlers for the acetao CLI

use crate::cli::{Platform, Selection};
use acetao::{
    BuildPlan, BuildSettings, BuildType, FeatureSet, Manifest, PackageInfo, Registry,
    RegistryBuilder, builtin_manifest, parse_manifest_file,
};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Load the manifest named on the command line, or the built-in one
pub fn load_manifest(path: Option<&str>) -> Result<Manifest> {
    match path {
        Some(path) => parse_manifest_file(Path::new(path))
            .with_context(|| format!("Failed to load manifest {}", path)),
        None => Ok(builtin_manifest()?),
    }
}

fn parse_platform(platform: &Platform) -> Result<BuildSettings> {
    let mut settings =
        BuildSettings::new(BuildType::parse(&platform.build_type)?).with_os(&platform.os);
    if let Some(arch) = &platform.arch {
        settings = settings.with_arch(arch);
    }
    Ok(settings)
}

fn parse_selection(selection: &Selection) -> Result<(FeatureSet, BuildSettings)> {
    let features = FeatureSet::parse_list(&selection.with)?;
    let settings = parse_platform(&selection.platform)?;
    Ok((features, settings))
}

fn build(manifest: &Manifest, selection: &Selection) -> Result<Registry> {
    let (features, settings) = parse_selection(selection)?;
    let registry = RegistryBuilder::new(manifest).build(&features, &settings)?;
    Ok(registry)
}

pub fn cmd_features(manifest: &Manifest) -> Result<()> {
    println!(
        "{} {} optional features:",
        manifest.package.name, manifest.package.version
    );
    for feature in &manifest.features {
        println!(
            "  {:<10} {:<18} {}",
            feature.name,
            feature.package.as_deref().unwrap_or("-"),
            feature.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

pub fn cmd_components(manifest: &Manifest, selection: &Selection) -> Result<()> {
    let registry = build(manifest, selection)?;

    for component in &registry {
        let requires: Vec<&str> = component
            .component_dependencies
            .iter()
            .map(String::as_str)
            .collect();
        println!("{:<30} -> {}", component.id, requires.join(", "));
    }
    println!();
    println!(
        "{} components for features {}",
        registry.len(),
        registry.features()
    );
    Ok(())
}

pub fn cmd_show(
    manifest: &Manifest,
    id: &str,
    transitive: bool,
    selection: &Selection,
) -> Result<()> {
    let registry = build(manifest, selection)?;
    let component = registry.get(id)?;

    let join = |set: &std::collections::BTreeSet<String>| {
        set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    };

    println!("Component: {}", component.id);
    println!("  Target:    {}", manifest.target_name(&component.id));
    println!("  Artifacts: {}", component.artifact_names.join(", "));
    println!("  Requires:  {}", join(&component.component_dependencies));
    println!("  System:    {}", join(&component.system_dependencies));
    println!("  External:  {}", join(&component.external_requirements));
    if component.is_gated() {
        println!("  Gate:      {}", component.feature_gate);
    }
    println!("  Used by:   {}", join(&registry.dependents(id)?));

    if transitive {
        println!(
            "  All requirements: {}",
            join(&registry.transitive_dependencies(id)?)
        );
        println!(
            "  All system libraries: {}",
            join(&registry.transitive_system_dependencies(id)?)
        );
    }
    Ok(())
}

pub fn cmd_check(manifest: &Manifest, platform: &Platform) -> Result<()> {
    let settings = parse_platform(platform)?;
    let report = RegistryBuilder::new(manifest).check_all(&settings)?;

    for result in &report.results {
        let features = result.features.to_string();
        match &result.outcome {
            Ok(count) => println!("  [OK]   {:<28} {} components", features, count),
            Err(e) => {
                warn!("Registry for {} failed: {}", features, e);
                println!("  [FAIL] {:<28} {}", features, e);
            }
        }
    }

    let rejected = report.configuration_failures();
    let inconsistent = report.consistency_failures();
    if rejected > 0 {
        anyhow::bail!(
            "{} feature combination(s) cannot be built for {} {}",
            rejected,
            settings.os,
            settings.arch
        );
    }
    if inconsistent > 0 {
        anyhow::bail!(
            "{} feature combination(s) produced an inconsistent registry",
            inconsistent
        );
    }
    if !report.is_clean() {
        anyhow::bail!("Some feature combinations could not be built");
    }

    info!(
        "All {} feature combinations are consistent for {} {}",
        report.results.len(),
        settings.os,
        settings.arch
    );
    Ok(())
}

pub fn cmd_link_order(manifest: &Manifest, selection: &Selection) -> Result<()> {
    let registry = build(manifest, selection)?;
    for id in registry.link_order()? {
        println!("{}", id);
    }
    Ok(())
}

pub fn cmd_package_info(
    manifest: &Manifest,
    package_folder: &str,
    pretty: bool,
    selection: &Selection,
) -> Result<()> {
    let registry = build(manifest, selection)?;
    info!(
        "Setting {}: {}",
        manifest.package.root_env, package_folder
    );
    let info = PackageInfo::from_registry(manifest, &registry, Path::new(package_folder));
    println!("{}", info.to_json(pretty)?);
    Ok(())
}

pub fn cmd_build_plan(
    manifest: &Manifest,
    source_folder: &str,
    selection: &Selection,
) -> Result<()> {
    let (features, settings) = parse_selection(selection)?;
    let plan = BuildPlan::new(manifest, &features, &settings, Path::new(source_folder))?;

    println!("Working directory: {}", plan.workdir.display());
    println!("Environment:");
    for (key, value) in &plan.environment {
        println!("  {}={}", key, value);
    }
    println!("Make arguments: {}", plan.make_args.join(" "));
    if let Some(path) = plan.features_file_path(manifest) {
        println!("Feature file {}:", path.display());
        print!("{}", plan.features_file);
    }
    if !plan.external_requirements.is_empty() {
        println!("Requires: {}", plan.external_requirements.join(", "));
    }
    Ok(())
}
