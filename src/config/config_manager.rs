// ==========================================
// 飞行日志本 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::logbook_config_trait::{ConfigError, LogbookConfigReader};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// 全局作用域
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> Result<MutexGuard<'_, Connection>, ConfigError> {
        self.conn
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e).into())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取数值配置；格式错误时告警并回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr + ToString + Copy,
    {
        let value = self.get_config_or_default(key, &default.to_string())?;
        match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => {
                warn!(config_key = key, value = %value, "配置值格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（含默认值）
    pub fn get_config_snapshot(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut snapshot: BTreeMap<String, String> = config_keys::DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }

        Ok(snapshot)
    }
}

// ==========================================
// LogbookConfigReader 实现
// ==========================================
#[async_trait]
impl LogbookConfigReader for ConfigManager {
    async fn get_expiry_warning_days(&self) -> Result<i64, ConfigError> {
        self.get_parsed_or_default(
            config_keys::EXPIRY_WARNING_DAYS,
            config_keys::DEFAULT_EXPIRY_WARNING_DAYS,
        )
    }

    async fn get_recent_flights_limit(&self) -> Result<usize, ConfigError> {
        self.get_parsed_or_default(
            config_keys::RECENT_FLIGHTS_LIMIT,
            config_keys::DEFAULT_RECENT_FLIGHTS_LIMIT,
        )
    }

    async fn get_import_max_rows(&self) -> Result<usize, ConfigError> {
        self.get_parsed_or_default(
            config_keys::IMPORT_MAX_ROWS,
            config_keys::DEFAULT_IMPORT_MAX_ROWS,
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 证照
    pub const EXPIRY_WARNING_DAYS: &str = "expiry_warning_days";
    pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

    // 驾驶舱
    pub const RECENT_FLIGHTS_LIMIT: &str = "recent_flights_limit";
    pub const DEFAULT_RECENT_FLIGHTS_LIMIT: usize = 5;

    // 导入
    pub const IMPORT_MAX_ROWS: &str = "import_max_rows";
    pub const DEFAULT_IMPORT_MAX_ROWS: usize = 10_000;

    /// 已知配置键及默认值
    pub const DEFAULTS: &[(&str, &str)] = &[
        (EXPIRY_WARNING_DAYS, "30"),
        (RECENT_FLIGHTS_LIMIT, "5"),
        (IMPORT_MAX_ROWS, "10000"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = crate::db::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let config = manager();
        assert_eq!(config.get_expiry_warning_days().await.unwrap(), 30);
        assert_eq!(config.get_recent_flights_limit().await.unwrap(), 5);
        assert_eq!(config.get_import_max_rows().await.unwrap(), 10_000);
    }

    #[tokio::test]
    async fn test_override_and_invalid_value() {
        let config = manager();
        config.set_config_value(config_keys::EXPIRY_WARNING_DAYS, "14").unwrap();
        config.set_config_value(config_keys::RECENT_FLIGHTS_LIMIT, "many").unwrap();

        assert_eq!(config.get_expiry_warning_days().await.unwrap(), 14);
        assert_eq!(config.get_recent_flights_limit().await.unwrap(), 5);
    }

    #[test]
    fn test_snapshot_merges_defaults() {
        let config = manager();
        config.set_config_value(config_keys::IMPORT_MAX_ROWS, "50").unwrap();

        let snapshot = config.get_config_snapshot().unwrap();
        assert_eq!(snapshot.get("import_max_rows").map(String::as_str), Some("50"));
        assert_eq!(snapshot.get("expiry_warning_days").map(String::as_str), Some("30"));
    }
}
