// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库 / 临时导入文件 / Mock 配置 / 测试数据构造
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use flight_logbook::config::{ConfigError, ConfigManager, LogbookConfigReader};
use flight_logbook::db::{init_schema, open_sqlite_connection};
use flight_logbook::domain::{FlightDraft, SortieType, TypeOfFlight};
use flight_logbook::repository::{BlobStore, FlightRepository, SqliteBlobStore};
use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接
pub fn open_shared(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = open_sqlite_connection(db_path).expect("Failed to open db");
    Arc::new(Mutex::new(conn))
}

/// 测试用仓储 + 配置（共享同一连接）
pub struct TestStack {
    pub store: Arc<dyn BlobStore>,
    pub flight_repo: Arc<FlightRepository>,
    pub config: Arc<ConfigManager>,
}

pub fn create_test_stack(db_path: &str) -> TestStack {
    let conn = open_shared(db_path);
    let store: Arc<dyn BlobStore> = Arc::new(SqliteBlobStore::from_connection(conn.clone()));
    let flight_repo = Arc::new(FlightRepository::new(store.clone()));
    let config =
        Arc::new(ConfigManager::from_connection(conn).expect("Failed to create ConfigManager"));

    TestStack {
        store,
        flight_repo,
        config,
    }
}

/// 写入临时导入文件（保留扩展名）
pub fn write_import_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("logbook-import-")
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// 临时文件路径
pub fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().to_string()
}

/// 航班草稿
pub fn flight_draft(date: &str, aircraft: &str, off: &str, on: &str) -> FlightDraft {
    FlightDraft {
        date: date.to_string(),
        aircraft: aircraft.to_string(),
        chocks_off: off.to_string(),
        chocks_on: on.to_string(),
        trainee: "A. Lee".to_string(),
        instructor: "J. Smith".to_string(),
        type_of_flight: TypeOfFlight::GeneralFlying,
        sortie_type: SortieType::Dual,
        ..Default::default()
    }
}

// ==========================================
// Mock 配置
// ==========================================
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub expiry_warning_days: i64,
    pub recent_flights_limit: usize,
    pub import_max_rows: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            expiry_warning_days: 30,
            recent_flights_limit: 5,
            import_max_rows: 10_000,
        }
    }
}

#[async_trait]
impl LogbookConfigReader for MockConfig {
    async fn get_expiry_warning_days(&self) -> Result<i64, ConfigError> {
        Ok(self.expiry_warning_days)
    }

    async fn get_recent_flights_limit(&self) -> Result<usize, ConfigError> {
        Ok(self.recent_flights_limit)
    }

    async fn get_import_max_rows(&self) -> Result<usize, ConfigError> {
        Ok(self.import_max_rows)
    }
}
