// src/lib.rs

//! ACE+TAO component registry
//!
//! Builds the set of libraries an ACE+TAO build produces, with their link
//! requirements, for a chosen set of optional features.
//!
//! # Architecture
//!
//! - Manifest: the component table as TOML data, embedded for ACE+TAO
//! - Feature gates: `[zlib]`-style conditions on components and on parts of them
//! - Registry: gated, merged and validated component set (no dangling
//!   requirements, no cycles), built by a pure function
//! - Package info / build plan: views of a registry for the packaging tool
//!   and for the external build

pub mod build_plan;
mod error;
pub mod feature;
pub mod manifest;
pub mod package_info;
pub mod registry;
pub mod settings;

pub use build_plan::BuildPlan;
pub use error::{ConsistencyError, Error, Result};
pub use feature::{FeatureGate, FeatureSet, GateItem, GateOp};
pub use manifest::{
    ComponentDef, ConditionalDeps, FeatureDecl, Manifest, builtin_manifest, parse_manifest,
    parse_manifest_file, validate_manifest,
};
pub use package_info::{ComponentInfo, PackageInfo};
pub use registry::{
    CheckReport, CheckResult, Component, ComponentGraph, Registry, RegistryBuilder, build_registry,
};
pub use settings::{BuildSettings, BuildType};
