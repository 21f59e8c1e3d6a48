//! Invariants checked over generated stores.

use crate::common::{facade_with, generated_entities};
use entity_atlas::vector::{cosine_similarity, magnitude};
use entity_atlas::{ClusterEngine, EntityFilter, SimilarityRanker};
use std::collections::HashMap;

#[test]
fn clustering_is_deterministic() {
    let facade = facade_with(generated_entities(200, 16));

    let first = facade.cluster(&EntityFilter::all(), 7).unwrap();
    for _ in 0..3 {
        assert_eq!(facade.cluster(&EntityFilter::all(), 7).unwrap(), first);
    }
}

#[test]
fn every_entity_lands_in_exactly_one_cluster() {
    let entities = generated_entities(150, 8);
    let facade = facade_with(entities.clone());

    for k in [1, 2, 5, 40, 150, 200] {
        let clusters = facade.cluster(&EntityFilter::all(), k).unwrap();
        assert_eq!(clusters.len(), k);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for cluster in &clusters {
            for member in &cluster.members {
                *counts.entry(member.as_str()).or_default() += 1;
            }
        }

        assert_eq!(counts.len(), entities.len(), "k={k}");
        assert!(counts.values().all(|&n| n == 1), "k={k}");
    }
}

#[test]
fn parallel_paths_match_sequential() {
    let entities = generated_entities(300, 12);

    let sequential = facade_with(entities.clone())
        .with_engine(ClusterEngine::new().with_parallel_threshold(usize::MAX))
        .with_ranker(SimilarityRanker::new().with_parallel_threshold(usize::MAX));
    let parallel = facade_with(entities)
        .with_engine(ClusterEngine::new().with_parallel_threshold(1))
        .with_ranker(SimilarityRanker::new().with_parallel_threshold(1));

    assert_eq!(
        sequential.cluster(&EntityFilter::all(), 9).unwrap(),
        parallel.cluster(&EntityFilter::all(), 9).unwrap()
    );
    assert_eq!(
        sequential.find_similar("gen-17", 25).unwrap(),
        parallel.find_similar("gen-17", 25).unwrap()
    );
}

#[test]
fn similarity_scores_stay_in_bounds() {
    let entities = generated_entities(60, 5);

    for a in &entities {
        for b in &entities {
            let score = cosine_similarity(&a.vector, &b.vector);
            assert!(!score.is_nan());
            assert!((-1.0..=1.0).contains(&score), "{score}");
        }
        if magnitude(&a.vector) > 0.0 {
            assert!((cosine_similarity(&a.vector, &a.vector) - 1.0).abs() < 1e-6);
        }
    }
}

#[test]
fn zero_vector_scores_zero() {
    let zero = [0.0f32; 4];
    for other in [[1.0, 2.0, 3.0, 4.0], [0.0; 4], [-1.0, 0.0, 0.0, 0.0]] {
        assert_eq!(cosine_similarity(&zero, &other), 0.0);
        assert_eq!(cosine_similarity(&other, &zero), 0.0);
    }
}

#[test]
fn find_similar_excludes_self_and_caps_results() {
    let entities = generated_entities(40, 6);
    let facade = facade_with(entities.clone());

    for top_n in [0, 1, 5, 39, 40, 100] {
        let results = facade.find_similar("gen-3", top_n).unwrap();
        assert_eq!(results.len(), top_n.min(entities.len() - 1));
        assert!(results.iter().all(|r| r.entity_id.as_str() != "gen-3"));
        assert!(
            results
                .windows(2)
                .all(|pair| pair[0].similarity_score >= pair[1].similarity_score)
        );
    }
}
