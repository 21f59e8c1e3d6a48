//! Readers and writers sharing one store.

use crate::common::{entity, facade_with, generated_entities};
use entity_atlas::{EntityFilter, EntityType};
use std::sync::Arc;
use std::thread;

#[test]
fn queries_see_whole_snapshots_during_writes() {
    let facade = Arc::new(facade_with(generated_entities(64, 4)));

    let writer = {
        let facade = Arc::clone(&facade);
        thread::spawn(move || {
            for i in 0..200 {
                facade
                    .upsert(entity(&format!("new-{i}"), EntityType::Agent, vec![0.5, 0.5, 0.5, 0.5]))
                    .unwrap();
                // Bad writes must never become visible
                assert!(
                    facade
                        .upsert(entity(&format!("bad-{i}"), EntityType::Agent, vec![1.0]))
                        .is_err()
                );
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let facade = Arc::clone(&facade);
            thread::spawn(move || {
                for _ in 0..50 {
                    let snapshot = facade.store().snapshot();
                    assert!(snapshot.iter().all(|e| e.vector.len() == 4));

                    let clusters = facade.cluster(&EntityFilter::all(), 4).unwrap();
                    let total: usize = clusters.iter().map(|c| c.len()).sum();
                    assert!(total >= 64);

                    let similar = facade.find_similar("gen-0", 5).unwrap();
                    assert_eq!(similar.len(), 5);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(facade.store().len(), 64 + 200);
}

#[test]
fn batch_upsert_is_all_or_nothing() {
    let facade = facade_with(generated_entities(3, 2));

    let err = facade.store().upsert_batch(vec![
        entity("ok-1", EntityType::User, vec![1.0, 0.0]),
        entity("ok-2", EntityType::User, vec![0.0, 1.0]),
        entity("broken", EntityType::User, vec![f32::NAN, 0.0]),
    ]);
    assert!(err.is_err());
    assert_eq!(facade.store().len(), 3);
    assert!(facade.get("ok-1").is_err());

    let count = facade
        .store()
        .upsert_batch(vec![
            entity("ok-1", EntityType::User, vec![1.0, 0.0]),
            entity("ok-2", EntityType::User, vec![0.0, 1.0]),
        ])
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(facade.store().len(), 5);
}
