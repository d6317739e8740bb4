// src/manifest/format.rs

//! Component manifest format definitions
//!
//! A manifest is a TOML table describing every library an ACE+TAO build
//! produces: what it links against, which other libraries it needs, and
//! which optional features it depends on.

use crate::error::{Error, Result};
use crate::feature::{FeatureGate, FeatureSet};
use crate::settings::BuildSettings;
use serde::{Deserialize, Serialize};

/// A complete component manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package metadata
    pub package: PackageSection,

    /// The closed list of optional features, in declaration order
    #[serde(default, rename = "feature")]
    pub features: Vec<FeatureDecl>,

    /// Component table
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentDef>,
}

impl Manifest {
    /// Look up a declared feature by name
    pub fn feature(&self, name: &str) -> Option<&FeatureDecl> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Check if a feature belongs to the closed list
    pub fn declares_feature(&self, name: &str) -> bool {
        self.feature(name).is_some()
    }

    /// Names of all declared features, in declaration order
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Check whether the manifest supports the given operating system
    pub fn supports_os(&self, os: &str) -> bool {
        self.package.platforms.is_empty()
            || self
                .package
                .platforms
                .iter()
                .any(|p| p.eq_ignore_ascii_case(os))
    }

    /// Build a fully qualified target name like `ace+tao::TAO_PI`
    pub fn target_name(&self, id: &str) -> String {
        format!("{}::{}", self.package.namespace(), id)
    }

    /// Reject a request this manifest cannot serve
    ///
    /// Fails with `ConfigurationError` when a feature is outside the closed
    /// list or the target operating system is not supported. Registry
    /// construction and build plans both go through here.
    pub fn check_request(&self, features: &FeatureSet, settings: &BuildSettings) -> Result<()> {
        let unknown: Vec<&str> = features.iter().filter(|f| !self.declares_feature(f)).collect();
        if !unknown.is_empty() {
            return Err(Error::ConfigurationError(format!(
                "Unknown feature(s) {} for {} {}. Available: {}",
                unknown.join(", "),
                self.package.name,
                self.package.version,
                self.feature_names().join(", ")
            )));
        }

        if !self.supports_os(&settings.os) {
            return Err(Error::ConfigurationError(format!(
                "{} {} cannot be built for {}. Supported: {}",
                self.package.name,
                self.package.version,
                settings.os,
                self.package.platforms.join(", ")
            )));
        }

        Ok(())
    }
}

/// Package metadata section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Upstream version the table was authored against
    pub version: String,

    /// Target namespace (defaults to the package name)
    #[serde(default)]
    pub target_namespace: Option<String>,

    /// Environment variable pointing consumers at the installed tree
    #[serde(default = "default_root_env")]
    pub root_env: String,

    /// Supported operating systems; empty means any
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Short description
    #[serde(default)]
    pub summary: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,
}

impl PackageSection {
    pub fn namespace(&self) -> &str {
        self.target_namespace.as_deref().unwrap_or(&self.name)
    }
}

fn default_root_env() -> String {
    "ACE_ROOT".to_string()
}

/// One optional build feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDecl {
    /// Feature name as used in gates and make arguments
    pub name: String,

    /// External package the feature pulls in (e.g. `zlib/1.2.11`)
    #[serde(default)]
    pub package: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// A component row before feature gating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDef {
    /// Unique component id
    pub id: String,

    /// Artifact names; empty means a single artifact named after the id
    #[serde(default)]
    pub libs: Vec<String>,

    /// Operating system libraries needed at link time
    #[serde(default)]
    pub system_libs: Vec<String>,

    /// Other components of the same registry
    #[serde(default)]
    pub requires: Vec<String>,

    /// Targets provided by other packages
    #[serde(default)]
    pub external: Vec<String>,

    /// Whether the component exists at all
    #[serde(default)]
    pub gate: FeatureGate,

    /// Dependencies merged in when their gate holds
    #[serde(default, rename = "when")]
    pub conditional: Vec<ConditionalDeps>,
}

impl ComponentDef {
    /// Create an ungated component row
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            libs: Vec::new(),
            system_libs: Vec::new(),
            requires: Vec::new(),
            external: Vec::new(),
            gate: FeatureGate::always(),
            conditional: Vec::new(),
        }
    }

    /// Add component requirements
    pub fn requiring(mut self, ids: &[&str]) -> Self {
        self.requires.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    /// Gate the whole component
    pub fn gated(mut self, gate: FeatureGate) -> Self {
        self.gate = gate;
        self
    }

    /// Artifact names in link order
    pub fn artifact_names(&self) -> Vec<String> {
        if self.libs.is_empty() {
            vec![self.id.clone()]
        } else {
            self.libs.clone()
        }
    }

    /// Every feature mentioned by this row's gates
    pub fn gate_features(&self) -> impl Iterator<Item = &str> {
        self.gate
            .features()
            .chain(self.conditional.iter().flat_map(|c| c.gate.features()))
    }
}

/// Dependencies added to a component when a gate holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalDeps {
    pub gate: FeatureGate,

    #[serde(default)]
    pub system_libs: Vec<String>,

    #[serde(default)]
    pub requires: Vec<String>,

    #[serde(default)]
    pub external: Vec<String>,
}
