//! Racing reservations for the same card.

use crate::postgres::helpers::{
    CleanupGuard, card_id, count_rows, ensure_template, setup_store, test_runtime,
};
use cardbridge::sync::{domain::Reservation, ports::IdentityStore};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
fn concurrent_reserves_yield_exactly_one_acquired(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_reserve_race_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = Arc::new(setup_store(shared_test_cluster, &db_name).expect("store setup"));
    let rt = test_runtime();

    let outcomes = rt.block_on(async {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let racer = Arc::clone(&store);
                tokio::spawn(async move { racer.reserve(&card_id("c1"), "Fix bug").await })
            })
            .collect();
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.expect("task joins").expect("reserve succeeds"));
        }
        outcomes
    });

    let acquired = outcomes
        .iter()
        .filter(|outcome| **outcome == Reservation::Acquired)
        .count();
    assert_eq!(acquired, 1);
    assert_eq!(outcomes.len(), 8);
    assert_eq!(count_rows(shared_test_cluster, &db_name).expect("count"), 1);
}
