// ==========================================
// API 层端到端测试
// ==========================================
// 测试目标: AppState 组装后的驾驶舱统计 / 飞行日志 / 证照状态 / 导入
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use flight_logbook::api::ApiError;
use flight_logbook::app::AppState;
use flight_logbook::config::config_keys;
use flight_logbook::domain::{DocumentType, NewDocument, SortieType};
use flight_logbook::ExpiryStatus;
use test_helpers::{flight_draft, path_of, write_import_file};

const USER: Option<&str> = Some("alice");

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

fn document(name: &str, doc_type: DocumentType, issued: &str, expiry: Option<&str>) -> NewDocument {
    NewDocument {
        name: name.to_string(),
        doc_type,
        issue_date: issued.to_string(),
        expiry_date: expiry.map(str::to_string),
        number: String::new(),
        issuer: String::new(),
        notes: String::new(),
    }
}

fn seeded_state() -> AppState {
    let state = AppState::in_memory().expect("Failed to create AppState");
    let api = &state.flight_api;

    api.upsert_flight(flight_draft("2024-03-01", "G-ABCD", "10:00", "11:30"), USER)
        .unwrap();
    let mut solo = flight_draft("2024-03-05", "G-EFGH", "09:00", "10:00");
    solo.sortie_type = SortieType::Solo;
    api.upsert_flight(solo, USER).unwrap();
    api.upsert_flight(flight_draft("2024-02-20", "G-ABCD", "14:00", "14:45"), USER)
        .unwrap();
    // 其他用户的记录不计入
    api.upsert_flight(flight_draft("2024-03-10", "G-OTHER", "10:00", "15:00"), Some("bob"))
        .unwrap();

    state
        .document_api
        .add_document(
            document("Class 2 Medical", DocumentType::Medical, "2023-04-10", Some("2024-04-10")),
            USER,
        )
        .unwrap();

    state
}

#[tokio::test]
async fn test_dashboard_stats() {
    let state = seeded_state();

    let stats = state
        .dashboard_api
        .get_dashboard_stats(USER, today())
        .await
        .unwrap();

    assert_eq!(stats.total_flights, 3);
    assert_eq!(stats.hours.total, 3.25);
    assert_eq!(stats.hours.dual, 2.25);
    assert_eq!(stats.hours.solo, 1.0);

    let recent: Vec<&str> = stats.recent_flights.iter().map(|f| f.date.as_str()).collect();
    assert_eq!(recent, vec!["2024-03-05", "2024-03-01", "2024-02-20"]);

    let medical = stats.medical_validity.expect("medical should be present");
    assert_eq!(medical.expiry_date.as_deref(), Some("2024-04-10"));
    assert_eq!(medical.expiry, ExpiryStatus::Expiring { days: 21 });
}

#[tokio::test]
async fn test_dashboard_follows_config() {
    let state = seeded_state();
    state
        .config
        .set_config_value(config_keys::EXPIRY_WARNING_DAYS, "14")
        .unwrap();
    state
        .config
        .set_config_value(config_keys::RECENT_FLIGHTS_LIMIT, "2")
        .unwrap();

    let stats = state
        .dashboard_api
        .get_dashboard_stats(USER, today())
        .await
        .unwrap();

    assert_eq!(stats.recent_flights.len(), 2);
    assert_eq!(
        stats.medical_validity.unwrap().expiry,
        ExpiryStatus::Valid { days: 21 }
    );
}

#[tokio::test]
async fn test_dashboard_without_medical() {
    let state = AppState::in_memory().unwrap();
    let stats = state
        .dashboard_api
        .get_dashboard_stats(USER, today())
        .await
        .unwrap();

    assert_eq!(stats.total_flights, 0);
    assert_eq!(stats.hours.total, 0.0);
    assert!(stats.recent_flights.is_empty());
    assert!(stats.medical_validity.is_none());
}

#[test]
fn test_flight_log_and_search() {
    let state = seeded_state();

    let log = state.flight_api.flight_log(USER).unwrap();
    let dates: Vec<&str> = log.rows.iter().map(|f| f.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-02-20", "2024-03-01", "2024-03-05"]);
    assert_eq!(log.totals.total, 3.25);

    let listed: Vec<String> = state
        .flight_api
        .list_flights(USER)
        .unwrap()
        .into_iter()
        .map(|f| f.date)
        .collect();
    assert_eq!(listed, vec!["2024-03-05", "2024-03-01", "2024-02-20"]);

    let found = state.flight_api.search_flights(USER, "g-abcd").unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|f| f.aircraft == "G-ABCD"));
}

#[test]
fn test_flight_api_validation() {
    let state = AppState::in_memory().unwrap();

    let blank_aircraft = flight_draft("2024-03-01", "  ", "", "");
    assert!(matches!(
        state.flight_api.upsert_flight(blank_aircraft, USER),
        Err(ApiError::InvalidInput(_))
    ));

    let blank_date = flight_draft("", "C152", "", "");
    assert!(matches!(
        state.flight_api.upsert_flight(blank_date, USER),
        Err(ApiError::InvalidInput(_))
    ));

    assert!(matches!(
        state.flight_api.get_flight("missing", USER),
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_document_badges() {
    let state = seeded_state();
    let docs = &state.document_api;

    docs.add_document(
        document("SPL", DocumentType::Spl, "2019-01-01", Some("2020-01-01")),
        USER,
    )
    .unwrap();
    docs.add_document(document("Logbook scan", DocumentType::Others, "2024-01-15", None), USER)
        .unwrap();

    let listed = docs.list_documents(USER, today()).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|d| d.document.name.as_str()).collect();
    assert_eq!(names, vec!["Logbook scan", "Class 2 Medical", "SPL"]);

    assert_eq!(listed[0].expiry, ExpiryStatus::NotSet);
    assert_eq!(listed[1].expiry, ExpiryStatus::Expiring { days: 21 });

    let expired_days = (today() - NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).num_days();
    assert_eq!(listed[2].expiry, ExpiryStatus::Expired { days: expired_days });

    assert!(matches!(
        docs.add_document(document("No date", DocumentType::Others, " ", None), USER),
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_import_through_api() {
    let state = AppState::in_memory().unwrap();
    let file = write_import_file(
        "Date,Aircraft,Dep,Arr,Student,PIC\n\
         1/3/2024,G-IMPT,10:00,11:00,A. Lee,J. Smith\n",
        ".csv",
    );

    let summary = state
        .import_api
        .import_flights(&path_of(&file), USER)
        .await
        .unwrap();
    assert_eq!(summary.success_count, 1);

    let flights = state.flight_api.list_flights(USER).unwrap();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].date, "2024-03-01");
    assert!(flights[0].imported);

    let missing = state
        .import_api
        .import_flights("does/not/exist.csv", USER)
        .await;
    assert!(missing.is_err());
}

#[test]
fn test_edit_keeps_record_owner() {
    let state = AppState::in_memory().unwrap();
    let api = &state.flight_api;

    // 无归属的历史记录
    let legacy = api
        .upsert_flight(flight_draft("2024-01-05", "G-LEGC", "10:00", "11:00"), None)
        .unwrap();
    assert!(legacy.user_id.is_none());

    let mut edit = flight_draft("2024-01-05", "G-LEGC", "10:00", "11:30");
    edit.id = Some(legacy.id.clone());
    let edited = api.upsert_flight(edit, USER).unwrap();
    assert!(edited.user_id.is_none());
    assert_eq!(edited.duration, "1.50");

    let bob_view = api.list_flights(Some("bob")).unwrap();
    assert_eq!(bob_view.len(), 1);
    assert_eq!(bob_view[0].id, legacy.id);

    // 本人记录编辑后仍属于本人
    let own = api
        .upsert_flight(flight_draft("2024-01-06", "G-OWN", "", ""), USER)
        .unwrap();
    let mut edit = flight_draft("2024-01-06", "G-OWN2", "", "");
    edit.id = Some(own.id.clone());
    let edited = api.upsert_flight(edit, USER).unwrap();
    assert_eq!(edited.user_id.as_deref(), Some("alice"));
    assert!(api.get_flight(&own.id, Some("bob")).is_err());
}
