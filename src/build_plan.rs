// src/build_plan.rs

//! Invocation data for the external ACE+TAO build
//!
//! The upstream tree is configured through MPC feature files and GNU make
//! variables. This module only computes those values; running `mwc.pl` and
//! `make` belongs to the caller.

use crate::error::Result;
use crate::feature::FeatureSet;
use crate::manifest::Manifest;
use crate::settings::BuildSettings;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Location of the MPC feature file, relative to `ACE_ROOT`
pub const FEATURES_FILE: &str = "MPC/config/default.features";

/// Everything the external orchestrator is invoked with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Extra `make` arguments (`zlib=1`, `debug=1`, `optimize=0`)
    pub make_args: Vec<String>,
    /// Body of `MPC/config/default.features`
    pub features_file: String,
    /// Environment for both MPC and make
    pub environment: BTreeMap<String, String>,
    /// External packages the enabled features pull in
    pub external_requirements: Vec<String>,
    /// Where MPC should be run from
    pub workdir: PathBuf,
}

impl BuildPlan {
    /// Compute the plan for a source tree unpacked at `source_folder`
    pub fn new(
        manifest: &Manifest,
        features: &FeatureSet,
        settings: &BuildSettings,
        source_folder: &Path,
    ) -> Result<Self> {
        manifest.check_request(features, settings)?;

        // Declaration order, not alphabetical, so the plan reads like the manifest
        let enabled: Vec<_> = manifest
            .features
            .iter()
            .filter(|f| features.contains(&f.name))
            .collect();

        let mut make_args: Vec<String> = enabled.iter().map(|f| format!("{}=1", f.name)).collect();
        if settings.build_type.with_symbols() {
            make_args.push("debug=1".to_string());
        }
        if !settings.build_type.is_optimized() {
            make_args.push("optimize=0".to_string());
        }

        let features_file: String = enabled.iter().map(|f| format!("{}=1\n", f.name)).collect();

        let external_requirements = enabled
            .iter()
            .filter_map(|f| f.package.clone())
            .collect();

        let ace_root = source_folder.join("ACE_wrappers");
        let tao_root = ace_root.join("TAO");

        let mut environment = BTreeMap::new();
        environment.insert(
            manifest.package.root_env.clone(),
            ace_root.display().to_string(),
        );
        environment.insert("TAO_ROOT".to_string(), tao_root.display().to_string());
        environment.insert("INSTALL_PREFIX".to_string(), "/".to_string());

        Ok(Self {
            make_args,
            features_file,
            environment,
            external_requirements,
            workdir: tao_root,
        })
    }

    /// Absolute path of the MPC feature file inside the source tree
    pub fn features_file_path(&self, manifest: &Manifest) -> Option<PathBuf> {
        self.environment
            .get(&manifest.package.root_env)
            .map(|root| Path::new(root).join(FEATURES_FILE))
    }
}
