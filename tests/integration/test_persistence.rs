//! Entity files and settings files on disk.

use crate::common::{TestProject, crm_entities};
use entity_atlas::config::Settings;
use entity_atlas::{
    AtlasError, EntityFilter, EntityStore, QueryFacade, StorageError, load_entities,
    save_entities,
};

#[test]
fn saved_store_answers_queries_after_reload() {
    let project = TestProject::new();
    let path = project.path().join(".atlas").join("entities.json");

    let store = EntityStore::from_entities(crm_entities()).unwrap();
    save_entities(&store.snapshot(), &path).unwrap();

    let original = QueryFacade::new(store);
    let reloaded = QueryFacade::new(load_entities(&path).unwrap());

    assert_eq!(
        original.cluster(&EntityFilter::all(), 3).unwrap(),
        reloaded.cluster(&EntityFilter::all(), 3).unwrap()
    );
    assert_eq!(
        original.find_similar("usr-1", 4).unwrap(),
        reloaded.find_similar("usr-1", 4).unwrap()
    );
    assert_eq!(original.stats(), reloaded.stats());
}

#[test]
fn mismatched_record_aborts_load() {
    let project = TestProject::new();
    let path = project.add_file(
        "entities.json",
        r#"[
            {"id": "a", "entity_type": "agent", "display_name": "A", "vector": [1.0, 0.0]},
            {"id": "b", "entity_type": "agent", "display_name": "B", "vector": [1.0, 0.0, 0.0]}
        ]"#,
    );

    match load_entities(&path) {
        Err(StorageError::InvalidRecord { id, .. }) => assert_eq!(id.as_str(), "b"),
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[test]
fn load_errors_carry_the_path() {
    let project = TestProject::new();
    let path = project.path().join("missing.json");

    let err = load_entities(&path)
        .map_err(|source| AtlasError::Load {
            path: path.clone(),
            source,
        })
        .unwrap_err();

    assert_eq!(err.status_code(), "LOAD_ERROR");
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn settings_drive_the_facade() {
    let project = TestProject::new();
    let config = project.add_file(
        ".atlas/settings.toml",
        r#"
[clustering]
default_k = 2
refine_iterations = 10
"#,
    );

    let settings = Settings::load_from(&config).unwrap();
    assert_eq!(settings.clustering.default_k, 2);

    let store = EntityStore::from_entities(crm_entities()).unwrap();
    let facade = QueryFacade::with_settings(store, &settings);
    let report = facade
        .cluster_with_report(&EntityFilter::all(), settings.clustering.default_k)
        .unwrap();

    assert_eq!(report.clusters.len(), 2);
    assert!(report.passes >= 1);
}

#[test]
fn init_writes_a_loadable_template() {
    let project = TestProject::new();
    let path = Settings::init_config_file(project.path(), false).unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings, Settings::default());

    assert!(matches!(
        Settings::init_config_file(project.path(), false),
        Err(AtlasError::Config { .. })
    ));
}
