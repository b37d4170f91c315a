//! 수동 편집, 내보내기/가져오기 테스트 (SQLite 저장소 사용)

mod common;

use common::{MockSchema, CONN};
use schemako::application::manage::parse_import_payload;
use schemako::domain::model::{BatchOptions, TranslationEntry};
use schemako::domain::traits::TranslationStore;
use schemako::infrastructure::storage::cache::TranslationCache;
use schemako::infrastructure::storage::db::{init_in_memory, SqliteTranslationStore};
use schemako::{SchemaKoError, TranslationService};
use std::collections::BTreeMap;
use std::sync::Arc;

async fn sqlite_service() -> TranslationService {
    let conn = init_in_memory().await.unwrap();
    TranslationService::new(
        Arc::new(MockSchema::numbered(CONN, 3)),
        Arc::new(SqliteTranslationStore::new(conn)),
        Arc::new(TranslationCache::default()),
    )
}

fn columns(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_update_creates_and_clears_ai_flag() {
    let svc = sqlite_service().await;
    let options = BatchOptions {
        use_ai: false,
        ..Default::default()
    };
    svc.translate_and_save(CONN, &options, None).await.unwrap();

    let entry = svc
        .update_translation(
            CONN,
            "t0",
            "첫 테이블".to_string(),
            Some("설명".to_string()),
            Some(columns(&[("id", "번호")])),
        )
        .await
        .unwrap();

    assert_eq!(entry.korean_name, "첫 테이블");
    assert_eq!(entry.korean_description.as_deref(), Some("설명"));
    assert!(!entry.is_ai_generated);
    // 기존 컬럼 번역은 유지
    assert_eq!(entry.column_translations["id"], "번호");
    assert_eq!(entry.column_translations["created_at"], "생성일시");

    let created = svc
        .update_translation(CONN, "brand_new", "새 테이블".to_string(), None, None)
        .await
        .unwrap();
    assert!(created.id.is_some());
    assert!(created.column_translations.is_empty());
}

#[tokio::test]
async fn test_column_update_merges() {
    let svc = sqlite_service().await;
    svc.update_translation(
        CONN,
        "users",
        "사용자".to_string(),
        None,
        Some(columns(&[("id", "아이디"), ("email", "이메일")])),
    )
    .await
    .unwrap();

    let entry = svc
        .update_column_translation(CONN, "users", "email", "메일 주소".to_string())
        .await
        .unwrap();
    assert_eq!(entry.column_translations["email"], "메일 주소");
    assert_eq!(entry.column_translations["id"], "아이디");

    let entry = svc
        .update_multiple_column_translations(
            CONN,
            "users",
            columns(&[("id", "회원 번호"), ("phone", "전화번호")]),
        )
        .await
        .unwrap();
    assert_eq!(entry.column_translations.len(), 3);
    assert_eq!(entry.column_translations["id"], "회원 번호");
}

#[tokio::test]
async fn test_column_update_requires_entry() {
    let svc = sqlite_service().await;

    let err = svc
        .update_column_translation(CONN, "ghost", "id", "번호".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, SchemaKoError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_single_and_all() {
    let svc = sqlite_service().await;
    for name in ["a", "b", "c"] {
        svc.update_translation(CONN, name, name.to_uppercase(), None, None)
            .await
            .unwrap();
    }
    svc.update_translation("other", "a", "다른".to_string(), None, None)
        .await
        .unwrap();

    assert!(svc.delete_translation(CONN, "a").await.unwrap());
    assert!(!svc.delete_translation(CONN, "a").await.unwrap());
    assert_eq!(svc.delete_all_translations(CONN).await.unwrap(), 2);
    assert_eq!(svc.store().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_export_then_import_counts() {
    let source = sqlite_service().await;
    source
        .update_translation(CONN, "users", "사용자".to_string(), None, Some(columns(&[("id", "아이디")])))
        .await
        .unwrap();
    source
        .update_translation(CONN, "orders", "주문".to_string(), None, None)
        .await
        .unwrap();

    let snapshot = source.export_translations(CONN).await.unwrap();
    assert_eq!(snapshot.translations.len(), 2);
    let json = serde_json::to_string(&snapshot).unwrap();

    let target = sqlite_service().await;
    target
        .update_translation(CONN, "users", "옛 사용자".to_string(), None, Some(columns(&[("email", "이메일")])))
        .await
        .unwrap();

    let entries = parse_import_payload(&json).unwrap();
    let result = target.import_translations(CONN, entries).await.unwrap();
    assert_eq!((result.imported, result.updated), (1, 1));

    let translations = target.get_translations(CONN, false).await.unwrap();
    let users = &translations["users"];
    assert_eq!(users.korean_name, "사용자");
    assert_eq!(users.column_translations.len(), 2);
    assert!(!users.is_ai_generated);
}

#[tokio::test]
async fn test_import_clears_ai_flag_and_rebinds_connection() {
    let svc = sqlite_service().await;
    let mut incoming = TranslationEntry::new("somewhere_else", "payments", "결제".to_string());
    incoming.is_ai_generated = true;

    let result = svc.import_translations(CONN, vec![incoming]).await.unwrap();
    assert_eq!(result.imported, 1);

    let stored = svc.store().find_one(CONN, "payments").await.unwrap().unwrap();
    assert_eq!(stored.connection_id, CONN);
    assert!(!stored.is_ai_generated);
}
