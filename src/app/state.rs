// ==========================================
// 飞行日志本 - 应用状态
// ==========================================
// 职责: 组装仓储 / 配置 / API 实例（显式传递，无全局状态）
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, DocumentApi, FlightApi, ImportApi};
use crate::config::{ConfigManager, LogbookConfigReader};
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::repository::{BlobStore, DocumentRepository, FlightRepository, SqliteBlobStore};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "FLIGHT_LOGBOOK_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 航班API
    pub flight_api: Arc<FlightApi>,

    /// 证照API
    pub document_api: Arc<DocumentApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 航班导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并建表（幂等）
    /// 2. 初始化仓储与配置
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        Self::from_connection(conn, db_path)
    }

    /// 内存数据库（临时会话 / 测试）
    pub fn in_memory() -> Result<Self, String> {
        let conn = crate::db::open_in_memory().map_err(|e| format!("无法创建内存数据库: {}", e))?;
        Self::from_connection(conn, ":memory:".to_string())
    }

    fn from_connection(conn: Connection, db_path: String) -> Result<Self, String> {
        init_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        match read_schema_version(&conn) {
            Ok(Some(v)) if v > CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    "数据库 schema_version={} 高于当前程序支持的版本 {}",
                    v,
                    CURRENT_SCHEMA_VERSION
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("读取 schema_version 失败: {}", e),
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let store: Arc<dyn BlobStore> = Arc::new(SqliteBlobStore::from_connection(conn.clone()));
        let flight_repo = Arc::new(FlightRepository::new(store.clone()));
        let document_repo = Arc::new(DocumentRepository::new(store));

        // ==========================================
        // 初始化配置
        // ==========================================
        let config = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法初始化配置管理器: {}", e))?,
        );
        let config_reader: Arc<dyn LogbookConfigReader> = config.clone();

        // ==========================================
        // 初始化API层
        // ==========================================
        let flight_api = Arc::new(FlightApi::new(flight_repo.clone()));
        let document_api = Arc::new(DocumentApi::new(
            document_repo.clone(),
            config_reader.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            flight_repo.clone(),
            document_repo,
            config_reader.clone(),
        ));
        let import_api = Arc::new(ImportApi::new(flight_repo, config_reader));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config,
            flight_api,
            document_api,
            dashboard_api,
            import_api,
        })
    }
}

/// 获取默认数据库路径
///
/// # 优先级
/// 1. 环境变量 FLIGHT_LOGBOOK_DB_PATH
/// 2. 用户数据目录/flight-logbook/flight_logbook.db
/// 3. ./flight_logbook.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./flight_logbook.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("flight-logbook");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("flight_logbook.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_state() {
        let state = AppState::in_memory().unwrap();
        assert_eq!(state.db_path, ":memory:");
        assert!(state.flight_api.list_flights(None).unwrap().is_empty());
    }
}
