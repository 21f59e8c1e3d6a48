//! End-to-end behavior of the query facade on small hand-built stores.

use crate::common::{crm_entities, entity, facade_with};
use entity_atlas::{
    AtlasError, ClusterId, EntityFilter, EntityType, QueryFacade, SharedEntityStore,
};
use std::collections::BTreeSet;

#[test]
fn find_similar_orders_by_cosine() {
    let facade = facade_with(vec![
        entity("A", EntityType::User, vec![1.0, 0.0]),
        entity("B", EntityType::User, vec![0.9, 0.1]),
        entity("C", EntityType::User, vec![-1.0, 0.0]),
    ]);

    let results = facade.find_similar("A", 2).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["B", "C"]);
    assert!(results[0].similarity_score > results[1].similarity_score);
    assert!((results[1].similarity_score + 1.0).abs() < 1e-6);
}

#[test]
fn cluster_seeds_with_first_entities_and_covers_everything() {
    let facade = facade_with(vec![
        entity("e1", EntityType::Product, vec![0.0, 0.0]),
        entity("e2", EntityType::Product, vec![10.0, 10.0]),
        entity("e3", EntityType::Product, vec![1.0, 0.5]),
        entity("e4", EntityType::Product, vec![9.0, 11.0]),
    ]);

    let clusters = facade.cluster(&EntityFilter::all(), 2).unwrap();
    assert_eq!(clusters.len(), 2);

    // Seeds become the centroids in the single-pass baseline
    assert_eq!(clusters[0].centroid, vec![0.0, 0.0]);
    assert_eq!(clusters[1].centroid, vec![10.0, 10.0]);

    let mut seen = BTreeSet::new();
    for cluster in &clusters {
        for member in &cluster.members {
            assert!(seen.insert(member.as_str()), "duplicate member {member}");
        }
    }
    assert_eq!(seen, BTreeSet::from(["e1", "e2", "e3", "e4"]));

    let first: Vec<&str> = clusters[0].members.iter().map(|m| m.as_str()).collect();
    assert_eq!(first, vec!["e1", "e3"]);
}

#[test]
fn cluster_with_no_matching_entities_returns_empty_clusters() {
    let facade = facade_with(vec![
        entity("u1", EntityType::User, vec![1.0, 0.0]),
        entity("c1", EntityType::Company, vec![0.0, 1.0]),
    ]);

    let clusters = facade
        .cluster(&EntityFilter::all().with_type(EntityType::Agent), 3)
        .unwrap();

    assert_eq!(clusters.len(), 3);
    for (index, cluster) in clusters.iter().enumerate() {
        assert_eq!(cluster.cluster_id, ClusterId::try_from(index).unwrap());
        assert!(cluster.is_empty());
    }
}

#[test]
fn upsert_with_wrong_dimension_leaves_store_unchanged() {
    let facade = facade_with(vec![
        entity("u1", EntityType::User, vec![1.0, 0.0, 0.0]),
        entity("u2", EntityType::User, vec![0.0, 1.0, 0.0]),
    ]);
    let before = facade.store().snapshot();

    let err = facade
        .upsert(entity("u3", EntityType::User, vec![1.0, 1.0]))
        .unwrap_err();
    assert!(matches!(
        err,
        AtlasError::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    ));

    // Replacing an existing id with a bad vector must not clobber it either
    assert!(
        facade
            .upsert(entity("u1", EntityType::User, vec![5.0]))
            .is_err()
    );

    let after = facade.store().snapshot();
    assert_eq!(after.all(), before.all());
    assert_eq!(after.dimension(), before.dimension());
}

#[test]
fn invalid_cluster_count_is_rejected() {
    let facade = facade_with(crm_entities());
    assert!(matches!(
        facade.cluster(&EntityFilter::all(), 0),
        Err(AtlasError::InvalidClusterCount { k: 0 })
    ));
}

#[test]
fn unknown_entity_is_reported() {
    let facade = facade_with(crm_entities());
    let err = facade.find_similar("usr-404", 3).unwrap_err();
    assert_eq!(err.status_code(), "ENTITY_NOT_FOUND");
    assert!(err.to_string().contains("usr-404"));
}

#[test]
fn empty_store_queries_succeed() {
    let facade = QueryFacade::new(SharedEntityStore::default());

    let clusters = facade.cluster(&EntityFilter::all(), 2).unwrap();
    assert_eq!(clusters.len(), 2);
    assert!(clusters.iter().all(|c| c.is_empty() && c.centroid.is_empty()));

    assert!(matches!(
        facade.find_similar("anything", 5),
        Err(AtlasError::EntityNotFound { .. })
    ));
}

#[test]
fn single_entity_store_has_no_similar_entities() {
    let facade = facade_with(vec![entity("solo", EntityType::Agent, vec![0.3, 0.4])]);
    assert!(facade.find_similar("solo", 10).unwrap().is_empty());

    let clusters = facade.cluster(&EntityFilter::all(), 2).unwrap();
    assert_eq!(clusters[0].members.len(), 1);
    assert!(clusters[1].is_empty());
    assert_eq!(clusters[1].centroid, vec![0.0, 0.0]);
}

#[test]
fn filters_narrow_clustering_but_not_similarity() {
    let facade = facade_with(crm_entities());

    let agents = facade
        .cluster(&EntityFilter::all().with_type(EntityType::Agent), 2)
        .unwrap();
    let members: Vec<&str> = agents
        .iter()
        .flat_map(|c| c.members.iter().map(|m| m.as_str()))
        .collect();
    assert_eq!(members, vec!["agt-1", "agt-2"]);

    // Similarity always searches every entity
    let similar = facade.find_similar("agt-1", 10).unwrap();
    assert_eq!(similar.len(), crm_entities().len() - 1);
    assert_eq!(similar[0].entity_id.as_str(), "agt-2");
}

#[test]
fn name_filter_matches_display_names() {
    let facade = facade_with(crm_entities());
    let clusters = facade
        .cluster(&EntityFilter::all().with_name("agent"), 1)
        .unwrap();
    assert_eq!(clusters[0].members.len(), 2);
}

#[test]
fn refinement_improves_on_poor_seeds() {
    use entity_atlas::ClusterEngine;

    let entities = vec![
        entity("a", EntityType::Product, vec![0.0]),
        entity("b", EntityType::Product, vec![1.0]),
        entity("c", EntityType::Product, vec![10.0]),
        entity("d", EntityType::Product, vec![11.0]),
    ];

    let baseline = facade_with(entities.clone())
        .cluster_with_report(&EntityFilter::all(), 2)
        .unwrap();
    assert_eq!(baseline.passes, 1);
    assert_eq!(baseline.clusters[1].members.len(), 3);

    let refined = facade_with(entities)
        .with_engine(ClusterEngine::new().with_refinement(5))
        .cluster_with_report(&EntityFilter::all(), 2)
        .unwrap();
    let sizes: Vec<usize> = refined.clusters.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![2, 2]);
    assert!(refined.passes > 1);
}
