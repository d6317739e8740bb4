// tests/registry.rs

//! Registry properties over the built-in ACE+TAO table.

mod common;

use acetao::{
    BuildSettings, BuildType, ConsistencyError, Error, FeatureSet, RegistryBuilder,
    build_registry,
};
use common::{ace_tao, all_feature_sets};
use std::collections::BTreeSet;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_every_feature_combination_is_consistent() {
    let manifest = ace_tao();
    let builder = RegistryBuilder::new(&manifest);
    let combos = all_feature_sets(&manifest);
    assert_eq!(combos.len(), 8);

    for features in combos {
        let registry = builder
            .build(&features, &BuildSettings::default())
            .unwrap_or_else(|e| panic!("{} should build: {}", features, e));

        assert!(registry.graph().find_cycle().is_none());
        for component in &registry {
            for dep in &component.component_dependencies {
                assert!(
                    registry.contains(dep),
                    "{} requires missing {} with {}",
                    component.id,
                    dep,
                    features
                );
            }
        }
    }
}

#[test]
fn test_registry_is_deterministic() {
    let features = FeatureSet::empty().with_features(["zlib", "xerces"]);
    let settings = BuildSettings::new(BuildType::RelWithDebInfo);

    let first = build_registry(&features, &settings).unwrap();
    let second = build_registry(&features, &settings).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.link_order().unwrap(), second.link_order().unwrap());
    assert_eq!(first.into_map(), second.into_map());
}

#[test]
fn test_base_component_without_features() {
    let registry = build_registry(&FeatureSet::empty(), &BuildSettings::default()).unwrap();

    let roots: Vec<&str> = registry.roots().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(roots, vec!["ACE"], "ACE is the only component with no requirements");

    let ace = registry.get("ACE").unwrap();
    assert_eq!(ace.system_dependencies, set(&["dl", "rt"]));
    assert!(ace.external_requirements.is_empty());
    assert_eq!(ace.artifact_names, vec!["ACE"]);

    assert_eq!(registry.len(), 91);
    assert!(!registry.contains("TAO_ZlibCompressor"));
    assert!(!registry.contains("TAO_Bzip2Compressor"));
    assert!(!registry.contains("ACE_XML_Utils"));
}

#[test]
fn test_enabling_compression_feature() {
    let settings = BuildSettings::default();
    let without = build_registry(&FeatureSet::empty(), &settings).unwrap();
    let with = build_registry(&FeatureSet::empty().with_feature("zlib"), &settings).unwrap();

    // Exactly one extra system library on the base component
    let before = &without.get("ACE").unwrap().system_dependencies;
    let after = &with.get("ACE").unwrap().system_dependencies;
    let added: Vec<&String> = after.difference(before).collect();
    assert_eq!(added, vec!["z"]);
    assert!(before.is_subset(after));

    // Exactly one new component, with a single requirement
    let old_ids: BTreeSet<&str> = without.ids().collect();
    let new_ids: Vec<&str> = with.ids().filter(|id| !old_ids.contains(id)).collect();
    assert_eq!(new_ids, vec!["TAO_ZlibCompressor"]);

    let codec = with.get("TAO_ZlibCompressor").unwrap();
    assert_eq!(codec.component_dependencies, set(&["TAO_Compression"]));
    assert_eq!(codec.external_requirements, set(&["zlib::zlib"]));
    assert!(codec.is_gated());
}

#[test]
fn test_disabling_feature_removes_exactly_its_parts() {
    let settings = BuildSettings::default();
    let all = FeatureSet::empty().with_features(["bzip2", "xerces", "zlib"]);
    let no_xerces = FeatureSet::empty().with_features(["bzip2", "zlib"]);

    let full = build_registry(&all, &settings).unwrap();
    let reduced = build_registry(&no_xerces, &settings).unwrap();

    let full_ids: BTreeSet<&str> = full.ids().collect();
    let reduced_ids: BTreeSet<&str> = reduced.ids().collect();
    let removed: Vec<&&str> = full_ids.difference(&reduced_ids).collect();
    assert_eq!(removed, vec![&"ACE_XML_Utils"]);

    let ace_full = full.get("ACE").unwrap();
    let ace_reduced = reduced.get("ACE").unwrap();
    assert_eq!(ace_full.system_dependencies, set(&["bz2", "dl", "pthread", "rt", "z"]));
    assert_eq!(ace_reduced.system_dependencies, set(&["bz2", "dl", "rt", "z"]));
    assert_eq!(
        ace_full.external_requirements,
        set(&["bzip2::bzip2", "xerces-c::xerces-c", "zlib::zlib"])
    );
    assert_eq!(
        ace_reduced.external_requirements,
        set(&["bzip2::bzip2", "zlib::zlib"])
    );

    // Every other component is untouched
    for component in &reduced {
        if component.id != "ACE" {
            assert_eq!(component, full.get(&component.id).unwrap());
        }
    }
}

#[test]
fn test_unknown_feature_is_rejected() {
    let err = build_registry(
        &FeatureSet::empty().with_features(["zlib", "openssl"]),
        &BuildSettings::default(),
    )
    .unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("openssl"));
}

#[test]
fn test_unsupported_platform_is_rejected() {
    let err = build_registry(
        &FeatureSet::empty(),
        &BuildSettings::default().with_os("Windows"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::ConfigurationError(_)));
}

#[test]
fn test_link_order_respects_requirements() {
    let registry = build_registry(
        &FeatureSet::empty().with_features(["bzip2", "xerces", "zlib"]),
        &BuildSettings::default(),
    )
    .unwrap();
    let order = registry.link_order().unwrap();
    assert_eq!(order.len(), registry.len());
    assert_eq!(order.first().map(String::as_str), Some("ACE"));

    let position = |id: &str| order.iter().position(|o| o == id).unwrap();
    for component in &registry {
        for dep in &component.component_dependencies {
            assert!(
                position(dep) < position(&component.id),
                "{} must be linked before {}",
                dep,
                component.id
            );
        }
    }
}

#[test]
fn test_transitive_queries_on_ace_tao() {
    let registry = build_registry(&FeatureSet::empty(), &BuildSettings::default()).unwrap();

    let deps = registry.transitive_dependencies("TAO_PortableServer").unwrap();
    assert_eq!(deps, set(&["ACE", "TAO", "TAO_AnyTypeCode"]));

    let libs = registry.transitive_system_dependencies("TAO_CosNaming_Serv").unwrap();
    assert_eq!(libs, set(&["dl", "rt"]));

    assert!(registry.dependents("TAO_ETCL").unwrap().contains("TAO_CosNotification_Serv"));
    assert_eq!(
        registry.get("TAO_NoSuchThing").unwrap_err(),
        Error::NotFound("TAO_NoSuchThing".into())
    );
}

#[test]
fn test_consistency_errors_are_distinguished() {
    let mut manifest = ace_tao();
    // Make the base depend on a leaf service to close a loop
    manifest
        .components
        .iter_mut()
        .find(|c| c.id == "ACE")
        .unwrap()
        .requires
        .push("TAO_CosTime_Serv".to_string());

    let err = RegistryBuilder::new(&manifest)
        .build(&FeatureSet::empty(), &BuildSettings::default())
        .unwrap_err();
    match err {
        Error::ConsistencyError(ConsistencyError::Cycle { path }) => {
            assert_eq!(path.first(), path.last());
            assert!(path.contains(&"ACE".to_string()));
            assert!(path.contains(&"TAO_CosTime_Serv".to_string()));
        }
        other => panic!("expected a cycle, got {:?}", other),
    }
}
