// src/feature/mod.rs
//! Feature sets and feature-gate expressions
//!
//! A feature is an optional capability of the build (compression support,
//! an XML parser). Gates decide whether a component, or part of one, exists
//! for a given feature set. Gate syntax: `[bzip2, !zlib]`

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Gate operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GateOp {
    /// Feature must be enabled (no prefix)
    Required,
    /// Feature must be disabled (! prefix)
    Not,
}

impl GateOp {
    /// Get the string prefix for this operator
    pub fn as_prefix(&self) -> &'static str {
        match self {
            Self::Required => "",
            Self::Not => "!",
        }
    }

    /// Parse an operator and name from a string
    /// Returns (operator, remaining name)
    pub fn parse_with_name(s: &str) -> Result<(Self, &str)> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::ConfigurationError("Empty gate item".to_string()));
        }

        if let Some(rest) = s.strip_prefix('!') {
            let name = rest.trim();
            if name.is_empty() {
                return Err(Error::ConfigurationError(
                    "Missing feature name after ! operator".to_string(),
                ));
            }
            validate_feature_name(name)?;
            Ok((Self::Not, name))
        } else {
            validate_feature_name(s)?;
            Ok((Self::Required, s))
        }
    }
}

fn validate_feature_name(name: &str) -> Result<()> {
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::ConfigurationError(format!(
            "Invalid feature name '{}'",
            name
        )))
    }
}

/// A single gate item with operator
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateItem {
    pub name: String,
    pub op: GateOp,
}

impl GateItem {
    /// Create a new gate item
    pub fn new(op: GateOp, name: impl Into<String>) -> Self {
        Self {
            op,
            name: name.into(),
        }
    }

    /// Parse a gate item from a string like "zlib" or "!xerces"
    pub fn parse(s: &str) -> Result<Self> {
        let (op, name) = GateOp::parse_with_name(s)?;
        Ok(Self::new(op, name))
    }

    /// Check this item against an enabled feature set
    pub fn holds(&self, features: &FeatureSet) -> bool {
        let enabled = features.contains(&self.name);
        match self.op {
            GateOp::Required => enabled,
            GateOp::Not => !enabled,
        }
    }
}

impl fmt::Display for GateItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.as_prefix(), self.name)
    }
}

/// Conjunction of gate items; the empty gate always holds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureGate {
    items: Vec<GateItem>,
}

impl FeatureGate {
    /// A gate that is satisfied by every feature set
    pub fn always() -> Self {
        Self::default()
    }

    /// A gate requiring a single feature
    pub fn requires(feature: impl Into<String>) -> Self {
        Self::new(vec![GateItem::new(GateOp::Required, feature)])
    }

    /// Create a gate from items
    pub fn new(items: Vec<GateItem>) -> Self {
        let mut gate = Self { items };
        gate.canonicalize();
        gate
    }

    /// Sort and dedupe items so equal gates compare and print equally
    fn canonicalize(&mut self) {
        self.items.sort();
        self.items.dedup();
    }

    /// Check whether this gate is unconditional
    pub fn is_always(&self) -> bool {
        self.items.is_empty()
    }

    /// The gate's items in canonical order
    pub fn items(&self) -> &[GateItem] {
        &self.items
    }

    /// Names of every feature this gate refers to
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }

    /// Evaluate the gate for an enabled feature set
    pub fn evaluate(&self, features: &FeatureSet) -> bool {
        self.items.iter().all(|item| item.holds(features))
    }

    /// Parse a gate expression
    ///
    /// Examples:
    /// - `[zlib]`
    /// - `xerces, !zlib` (without brackets)
    /// - `[]` or an empty string (always)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        let inner = match (s.strip_prefix('['), s.strip_suffix(']')) {
            (Some(_), Some(_)) if s.len() >= 2 => &s[1..s.len() - 1],
            (None, None) => s,
            _ => {
                return Err(Error::ConfigurationError(format!(
                    "Unbalanced brackets in gate '{}'",
                    s
                )));
            }
        };

        let items = inner
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(GateItem::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(items))
    }
}

impl fmt::Display for FeatureGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.items.iter().map(|item| item.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

impl FromStr for FeatureGate {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FeatureGate::parse(s)
    }
}

impl TryFrom<String> for FeatureGate {
    type Error = Error;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        FeatureGate::parse(&s)
    }
}

impl From<FeatureGate> for String {
    fn from(gate: FeatureGate) -> Self {
        gate.to_string()
    }
}

/// The set of optional features enabled for one build
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    features: BTreeSet<String>,
}

impl FeatureSet {
    /// Create an empty feature set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a feature
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    /// Add multiple features
    pub fn with_features(mut self, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for f in features {
            self.features.insert(f.into());
        }
        self
    }

    /// Parse a comma separated list like `bzip2,zlib`
    pub fn parse_list(s: &str) -> Result<Self> {
        let mut set = Self::empty();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            validate_feature_name(part)?;
            set.features.insert(part.to_string());
        }
        Ok(set)
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Enabled features in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(String::as_str)
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::empty().with_features(iter)
    }
}
