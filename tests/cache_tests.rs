//! 번역 캐시 테스트

mod common;

use common::*;
use schemako::domain::model::TranslationEntry;
use schemako::domain::traits::TranslationStore;
use schemako::infrastructure::storage::cache::TranslationCache;
use schemako::TranslationService;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_reads_within_ttl_hit_the_cache() {
    let store = Arc::new(MemoryStore::default());
    store
        .upsert(&TranslationEntry::new(CONN, "users", "사용자".to_string()))
        .await
        .unwrap();
    let svc = service(MockSchema::numbered(CONN, 0), Arc::clone(&store), None);

    let first = svc.get_translations(CONN, false).await.unwrap();
    let second = svc.get_translations(CONN, false).await.unwrap();

    assert_eq!(store.finds(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second["users"].korean_name, "사용자");
}

#[tokio::test]
async fn test_force_refresh_goes_to_the_store() {
    let store = Arc::new(MemoryStore::default());
    let svc = service(MockSchema::numbered(CONN, 0), Arc::clone(&store), None);

    svc.get_translations(CONN, false).await.unwrap();
    svc.get_translations(CONN, true).await.unwrap();

    assert_eq!(store.finds(), 2);
}

#[tokio::test]
async fn test_write_then_read_is_never_stale() {
    let store = Arc::new(MemoryStore::default());
    let svc = service(MockSchema::numbered(CONN, 0), Arc::clone(&store), None);

    svc.update_translation(CONN, "users", "사용자".to_string(), None, None)
        .await
        .unwrap();
    assert_eq!(
        svc.get_translations(CONN, false).await.unwrap()["users"].korean_name,
        "사용자"
    );

    svc.update_translation(CONN, "users", "회원".to_string(), None, None)
        .await
        .unwrap();
    assert_eq!(
        svc.get_translations(CONN, false).await.unwrap()["users"].korean_name,
        "회원"
    );

    svc.delete_translation(CONN, "users").await.unwrap();
    assert!(svc.get_translations(CONN, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_write_still_invalidates() {
    let store = Arc::new(MemoryStore::default());
    store.fail_on("users");
    let svc = service(MockSchema::numbered(CONN, 0), Arc::clone(&store), None);

    svc.get_translations(CONN, false).await.unwrap();
    assert_eq!(svc.cache().len(), 1);

    assert!(svc
        .update_translation(CONN, "users", "사용자".to_string(), None, None)
        .await
        .is_err());
    assert!(svc.cache().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_entries_expire_after_ttl() {
    let store = Arc::new(MemoryStore::default());
    let cache = Arc::new(TranslationCache::new(Duration::from_secs(300)));
    let svc = TranslationService::new(
        Arc::new(MockSchema::numbered(CONN, 0)),
        Arc::clone(&store) as Arc<dyn TranslationStore>,
        Arc::clone(&cache),
    );

    svc.get_translations(CONN, false).await.unwrap();
    tokio::time::advance(Duration::from_secs(299)).await;
    svc.get_translations(CONN, false).await.unwrap();
    assert_eq!(store.finds(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    svc.get_translations(CONN, false).await.unwrap();
    assert_eq!(store.finds(), 2);
}

#[tokio::test]
async fn test_invalidate_one_or_all() {
    let store = Arc::new(MemoryStore::default());
    let cache = TranslationCache::default();

    cache.get_cached(store.as_ref(), "a", false).await.unwrap();
    cache.get_cached(store.as_ref(), "b", false).await.unwrap();
    assert_eq!(cache.len(), 2);

    cache.invalidate(Some("a"));
    assert_eq!(cache.len(), 1);

    cache.invalidate(None);
    assert!(cache.is_empty());
}
