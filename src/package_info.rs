// src/package_info.rs

//! Package metadata emitted for consumers of the built package
//!
//! Maps a registry onto the information a packaging tool publishes per
//! component: target name, libraries to link, system libraries and
//! requirements. The registry stays tool-neutral; this is the one place
//! that names targets.

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Metadata for the whole package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    /// Target of the package as a whole (e.g. `ace+tao`)
    pub target_name: String,
    /// Enabled features the package was built with
    pub features: Vec<String>,
    pub build_type: String,
    pub components: BTreeMap<String, ComponentInfo>,
    /// Runtime environment for consumers
    pub run_env: BTreeMap<String, String>,
}

/// Metadata for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    /// Fully qualified target, e.g. `ace+tao::TAO_PI`
    pub target_name: String,
    pub libs: Vec<String>,
    pub system_libs: Vec<String>,
    /// Sibling component ids, then external targets
    pub requires: Vec<String>,
}

impl PackageInfo {
    /// Describe `registry` as installed under `package_folder`
    pub fn from_registry(manifest: &Manifest, registry: &Registry, package_folder: &Path) -> Self {
        let components = registry
            .iter()
            .map(|c| {
                let requires = c
                    .component_dependencies
                    .iter()
                    .chain(c.external_requirements.iter())
                    .cloned()
                    .collect();
                let info = ComponentInfo {
                    target_name: manifest.target_name(&c.id),
                    libs: c.artifact_names.clone(),
                    system_libs: c.system_dependencies.iter().cloned().collect(),
                    requires,
                };
                (c.id.clone(), info)
            })
            .collect();

        let mut run_env = BTreeMap::new();
        run_env.insert(
            manifest.package.root_env.clone(),
            package_folder.display().to_string(),
        );

        Self {
            name: manifest.package.name.clone(),
            version: manifest.package.version.clone(),
            target_name: manifest.package.namespace().to_string(),
            features: registry.features().iter().map(str::to_string).collect(),
            build_type: registry.settings().build_type.to_string(),
            components,
            run_env,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| Error::SerializeError(format!("package info: {}", e)))
    }
}
