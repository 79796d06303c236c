mod common;

use std::sync::Arc;

use common::FakeStore;
use media_core::{CollectionLoader, StoreError};

#[tokio::test]
async fn twenty_three_records_in_pages_of_ten() {
    let store = Arc::new(FakeStore::with_ids(1..=23));
    let loader = CollectionLoader::new(Arc::clone(&store), 10);

    let records = loader.load_all().await.unwrap();

    assert_eq!(records.len(), 23);
    assert_eq!(store.list_calls(), vec![(0, 10), (10, 10), (20, 10)]);
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, (1..=23).collect::<Vec<_>>());
}

#[tokio::test]
async fn exact_multiple_needs_a_trailing_empty_page() {
    let store = Arc::new(FakeStore::with_ids(1..=20));
    let loader = CollectionLoader::new(Arc::clone(&store), 10);

    let records = loader.load_all().await.unwrap();

    assert_eq!(records.len(), 20);
    assert_eq!(store.list_calls(), vec![(0, 10), (10, 10), (20, 10)]);
}

#[tokio::test]
async fn empty_collection_costs_one_request() {
    let store = Arc::new(FakeStore::with_ids(std::iter::empty()));
    let loader = CollectionLoader::new(Arc::clone(&store), 10);

    assert!(loader.load_all().await.unwrap().is_empty());
    assert_eq!(store.list_calls(), vec![(0, 10)]);
}

#[tokio::test]
async fn request_count_is_floor_n_over_p_plus_one() {
    for page_size in [1usize, 2, 3, 7] {
        for n in 0..=15i64 {
            let store = Arc::new(FakeStore::with_ids(1..=n));
            let loader = CollectionLoader::new(Arc::clone(&store), page_size);

            let records = loader.load_all().await.unwrap();

            assert_eq!(records.len(), n as usize, "n={} p={}", n, page_size);
            assert_eq!(
                store.list_calls().len(),
                n as usize / page_size + 1,
                "n={} p={}",
                n,
                page_size
            );
        }
    }
}

#[tokio::test]
async fn zero_page_size_is_clamped() {
    let store = Arc::new(FakeStore::with_ids(1..=2));
    let loader = CollectionLoader::new(Arc::clone(&store), 0);

    assert_eq!(loader.page_size(), 1);
    assert_eq!(loader.load_all().await.unwrap().len(), 2);
    assert_eq!(store.list_calls(), vec![(0, 1), (1, 1), (2, 1)]);
}

#[tokio::test]
async fn any_page_failure_aborts_the_load() {
    let store = Arc::new(FakeStore::with_ids(1..=25));
    store.fail_list_at(10);
    let loader = CollectionLoader::new(Arc::clone(&store), 10);

    let err = loader.load_all().await.unwrap_err();

    assert!(matches!(err, StoreError::NetworkFailure(_)));
    // No further pages after the failure.
    assert_eq!(store.list_calls(), vec![(0, 10), (10, 10)]);
}
