// ==========================================
// Repository 集成测试
// ==========================================
// 测试目标: 用户可见性 / 编辑合并 / 删除 / 乐观锁 / 文件持久化
// ==========================================

mod test_helpers;

use flight_logbook::app::AppState;
use flight_logbook::domain::{DocumentType, FlightRecord, NewDocument, SortieType};
use flight_logbook::repository::flight_repo::FLIGHTS_KEY;
use flight_logbook::repository::{
    DocumentRepository, FlightRepository, JsonCollection, MemoryBlobStore, RepositoryError,
};
use std::sync::Arc;
use test_helpers::{create_test_db, create_test_stack, flight_draft};

fn owned_draft(user: &str, aircraft: &str) -> flight_logbook::domain::FlightDraft {
    let mut draft = flight_draft("2024-04-01", aircraft, "10:00", "11:00");
    draft.user_id = Some(user.to_string());
    draft
}

#[test]
fn test_user_visibility() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let stack = create_test_stack(&db_path);
    let repo = &stack.flight_repo;

    repo.upsert_flight(owned_draft("alice", "ALICE-1")).unwrap();
    let bob = repo.upsert_flight(owned_draft("bob", "BOB-1")).unwrap();
    // 无归属的历史记录
    repo.upsert_flight(flight_draft("2024-04-02", "LEGACY", "", ""))
        .unwrap();

    let alice_view: Vec<String> = repo
        .list_flights(Some("alice"))
        .unwrap()
        .into_iter()
        .map(|f| f.aircraft)
        .collect();
    assert_eq!(alice_view, vec!["ALICE-1", "LEGACY"]);

    let anonymous_view: Vec<String> = repo
        .list_flights(None)
        .unwrap()
        .into_iter()
        .map(|f| f.aircraft)
        .collect();
    assert_eq!(anonymous_view, vec!["LEGACY"]);

    assert!(repo.get_flight(&bob.id, Some("alice")).unwrap().is_none());
    assert!(repo.get_flight(&bob.id, Some("bob")).unwrap().is_some());
}

#[test]
fn test_edit_merges_and_rederives() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let stack = create_test_stack(&db_path);
    let repo = &stack.flight_repo;

    let created = repo.upsert_flight(owned_draft("alice", "C152")).unwrap();
    assert_eq!(created.duration, "1.00");
    assert!(!created.imported);

    let mut edit = owned_draft("alice", "C172");
    edit.id = Some(created.id.clone());
    edit.chocks_on = "12:30".to_string();
    edit.sortie_type = SortieType::Solo;

    let updated = repo.upsert_flight(edit).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.aircraft, "C172");
    assert_eq!(updated.duration, "2.50");
    assert!(updated.instructor.is_empty());

    let all = repo.list_flights(Some("alice")).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], updated);
}

#[test]
fn test_edit_unknown_or_foreign_id_is_not_found() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let stack = create_test_stack(&db_path);
    let repo = &stack.flight_repo;

    let bob = repo.upsert_flight(owned_draft("bob", "BOB-1")).unwrap();

    let mut missing = owned_draft("alice", "X");
    missing.id = Some("no-such-id".to_string());
    assert!(matches!(
        repo.upsert_flight(missing),
        Err(RepositoryError::NotFound { .. })
    ));

    let mut foreign = owned_draft("alice", "X");
    foreign.id = Some(bob.id.clone());
    assert!(matches!(
        repo.upsert_flight(foreign),
        Err(RepositoryError::NotFound { .. })
    ));

    let stored = repo.get_flight(&bob.id, Some("bob")).unwrap().unwrap();
    assert_eq!(stored.aircraft, "BOB-1");
}

#[test]
fn test_delete_flight() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let stack = create_test_stack(&db_path);
    let repo = &stack.flight_repo;

    let keep = repo.upsert_flight(owned_draft("alice", "KEEP")).unwrap();
    let drop = repo.upsert_flight(owned_draft("alice", "DROP")).unwrap();

    // 他人无法删除
    assert!(matches!(
        repo.delete_flight(&drop.id, Some("bob")),
        Err(RepositoryError::NotFound { .. })
    ));

    repo.delete_flight(&drop.id, Some("alice")).unwrap();
    let remaining = repo.list_flights(Some("alice")).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);

    assert!(matches!(
        repo.delete_flight(&drop.id, Some("alice")),
        Err(RepositoryError::NotFound { .. })
    ));
}

#[test]
fn test_stale_writer_is_rejected() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let stack = create_test_stack(&db_path);

    stack
        .flight_repo
        .upsert_flight(owned_draft("alice", "FIRST"))
        .unwrap();

    // 另一个写入者先读取
    let other_tab: JsonCollection<FlightRecord> =
        JsonCollection::new(FLIGHTS_KEY, stack.store.clone());
    let stale = other_tab.load().unwrap();

    // 本端写入使修订号前进
    stack
        .flight_repo
        .upsert_flight(owned_draft("alice", "SECOND"))
        .unwrap();

    let result = other_tab.save(&stale.items, stale.revision);
    match result {
        Err(RepositoryError::OptimisticLockFailure {
            collection,
            expected,
            actual,
        }) => {
            assert_eq!(collection, FLIGHTS_KEY);
            assert_eq!(expected, stale.revision);
            assert_eq!(actual, stale.revision + 1);
        }
        other => panic!("expected OptimisticLockFailure, got {:?}", other),
    }

    // 后写入的记录未被覆盖
    assert_eq!(stack.flight_repo.list_flights(Some("alice")).unwrap().len(), 2);
}

#[test]
fn test_documents_on_memory_store() {
    let store = Arc::new(MemoryBlobStore::new());
    let flights = FlightRepository::new(store.clone());
    let documents = DocumentRepository::new(store);

    let doc = documents
        .add_document(
            NewDocument {
                name: "Class 2 Medical".to_string(),
                doc_type: DocumentType::Medical,
                issue_date: "2024-01-10".to_string(),
                expiry_date: Some("  ".to_string()),
                number: String::new(),
                issuer: "CAA".to_string(),
                notes: String::new(),
            },
            Some("alice"),
        )
        .unwrap();
    assert_eq!(doc.expiry_date, None);

    // 两个集合互不影响
    assert!(flights.list_flights(Some("alice")).unwrap().is_empty());
    assert_eq!(documents.list_documents(Some("alice")).unwrap().len(), 1);
    assert!(documents.list_documents(Some("bob")).unwrap().is_empty());

    documents.delete_document(&doc.id, Some("alice")).unwrap();
    assert!(documents.list_documents(Some("alice")).unwrap().is_empty());
}

#[test]
fn test_records_survive_reopen() {
    let (_temp_file, db_path) = create_test_db().unwrap();

    let created = {
        let state = AppState::new(db_path.clone()).expect("Failed to open AppState");
        state
            .flight_api
            .upsert_flight(flight_draft("2024-05-01", "G-PERS", "08:00", "09:45"), Some("alice"))
            .unwrap()
    };

    let reopened = AppState::new(db_path).expect("Failed to reopen AppState");
    let flights = reopened.flight_api.list_flights(Some("alice")).unwrap();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0], created);
    assert_eq!(flights[0].duration, "1.75");
    assert_eq!(flights[0].user_id.as_deref(), Some("alice"));
}
