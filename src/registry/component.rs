// src/registry/component.rs

//! Resolved component records

use crate::feature::FeatureGate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One linkable unit of the packaged library, after feature gating
///
/// Conditional entries have already been merged in, so the sets are the
/// final link requirements for the build the registry was computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier (library short name)
    pub id: String,

    /// Artifact names in link order
    pub artifact_names: Vec<String>,

    /// Operating system libraries needed at link time
    pub system_dependencies: BTreeSet<String>,

    /// Ids of other components in the same registry
    pub component_dependencies: BTreeSet<String>,

    /// Targets provided by other packages (e.g. `zlib::zlib`)
    pub external_requirements: BTreeSet<String>,

    /// The gate this component passed to be present
    pub feature_gate: FeatureGate,
}

impl Component {
    /// A component with no dependencies whose single artifact is its id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            artifact_names: vec![id.clone()],
            id,
            system_dependencies: BTreeSet::new(),
            component_dependencies: BTreeSet::new(),
            external_requirements: BTreeSet::new(),
            feature_gate: FeatureGate::always(),
        }
    }

    /// True when the component requires no other component
    pub fn is_root(&self) -> bool {
        self.component_dependencies.is_empty()
    }

    /// True when the component only exists for some feature sets
    pub fn is_gated(&self) -> bool {
        !self.feature_gate.is_always()
    }
}
