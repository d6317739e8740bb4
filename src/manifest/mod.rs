// src/manifest/mod.rs

//! Component manifests
//!
//! The component table is data, not code: it lives in a TOML manifest that
//! lists the closed set of optional features and one row per library.
//! The ACE+TAO table ships inside the binary; other revisions can be
//! loaded from disk.
//!
//! # Example Manifest
//!
//! ```toml
//! [package]
//! name = "ace+tao"
//! version = "7.0.9"
//! platforms = ["Linux"]
//!
//! [[feature]]
//! name = "zlib"
//! package = "zlib/1.2.11"
//!
//! [[component]]
//! id = "ACE"
//! system_libs = ["dl", "rt"]
//!
//! [[component.when]]
//! gate = "[zlib]"
//! system_libs = ["z"]
//! external = ["zlib::zlib"]
//!
//! [[component]]
//! id = "TAO_ZlibCompressor"
//! gate = "[zlib]"
//! requires = ["TAO_Compression"]
//! external = ["zlib::zlib"]
//! ```

mod format;
pub mod parser;

pub use format::{ComponentDef, ConditionalDeps, FeatureDecl, Manifest, PackageSection};
pub use parser::{builtin_manifest, parse_manifest, parse_manifest_file, validate_manifest};
