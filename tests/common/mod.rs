// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use acetao::{FeatureSet, Manifest, builtin_manifest};

/// Every subset of the manifest's closed feature list, empty set first.
pub fn all_feature_sets(manifest: &Manifest) -> Vec<FeatureSet> {
    let names = manifest.feature_names();
    (0..(1u32 << names.len()))
        .map(|mask| {
            names
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1u32 << *bit) != 0)
                .map(|(_, name)| *name)
                .collect()
        })
        .collect()
}

/// The embedded ACE+TAO manifest.
pub fn ace_tao() -> Manifest {
    builtin_manifest().expect("built-in manifest should parse")
}

/// A three-component manifest with one gated codec, written as TOML.
pub const SMALL_MANIFEST: &str = r#"
[package]
name = "small"
version = "2.0"
target_namespace = "small"
root_env = "SMALL_ROOT"
platforms = ["Linux", "FreeBSD"]
summary = "test fixture"

[[feature]]
name = "zlib"
package = "zlib/1.3"

[[component]]
id = "base"
system_libs = ["dl"]

[[component.when]]
gate = "[zlib]"
system_libs = ["z"]
external = ["zlib::zlib"]

[[component]]
id = "net"
libs = ["net", "net_ssl"]
requires = ["base"]

[[component]]
id = "codec"
requires = ["net"]
external = ["zlib::zlib"]
gate = "[zlib]"
"#;

/// A FreeBSD-only manifest with one feature.
pub const BSD_MANIFEST: &str = r#"
[package]
name = "bsdonly"
version = "1.0"
platforms = ["FreeBSD"]
summary = "FreeBSD-only fixture"

[[feature]]
name = "zlib"
package = "zlib/1.3"

[[component]]
id = "core"
system_libs = ["m"]

[[component]]
id = "codec"
requires = ["core"]
gate = "[zlib]"
"#;
