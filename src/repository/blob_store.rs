// ==========================================
// 飞行日志本 - 集合存储 (Blob Store)
// ==========================================
// 职责: 以"键 → 整个 JSON 数组"的形式持久化集合
// 并发控制: 每个键带修订号，写入时校验（乐观锁）
// 红线: 不含业务逻辑，不解析集合内容
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// 集合快照：JSON 文本 + 修订号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobSnapshot {
    pub value: String,
    pub revision: i64,
}

/// 未写入过的键的修订号
pub const INITIAL_REVISION: i64 = 0;

// ==========================================
// BlobStore Trait
// ==========================================
// 实现者: SqliteBlobStore（blob_store 表）/ MemoryBlobStore（测试、临时会话）
pub trait BlobStore: Send + Sync {
    /// 读取集合（不存在返回 None）
    fn read(&self, key: &str) -> RepositoryResult<Option<BlobSnapshot>>;

    /// 写入集合
    ///
    /// # 参数
    /// - expected_revision: 读取时的修订号（从未写入过为 0）
    ///
    /// # 返回
    /// - Ok(i64): 新修订号
    /// - Err(OptimisticLockFailure): 期间已被其他写入者修改
    fn write(&self, key: &str, value: &str, expected_revision: i64) -> RepositoryResult<i64>;
}

fn lock_failure(key: &str, expected: i64, actual: i64) -> RepositoryError {
    RepositoryError::OptimisticLockFailure {
        collection: key.to_string(),
        expected,
        actual,
    }
}

// ==========================================
// SqliteBlobStore
// ==========================================
pub struct SqliteBlobStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBlobStore {
    /// 从已有连接创建（要求已执行 db::init_schema）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl BlobStore for SqliteBlobStore {
    fn read(&self, key: &str) -> RepositoryResult<Option<BlobSnapshot>> {
        let conn = self.get_conn()?;
        let snapshot = conn
            .query_row(
                "SELECT value, revision FROM blob_store WHERE key = ?1",
                params![key],
                |row| {
                    Ok(BlobSnapshot {
                        value: row.get(0)?,
                        revision: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(snapshot)
    }

    fn write(&self, key: &str, value: &str, expected_revision: i64) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let actual: i64 = tx
            .query_row(
                "SELECT revision FROM blob_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(INITIAL_REVISION);

        if actual != expected_revision {
            return Err(lock_failure(key, expected_revision, actual));
        }

        let next = actual + 1;
        tx.execute(
            r#"
            INSERT INTO blob_store (key, value, revision, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                revision = excluded.revision,
                updated_at = excluded.updated_at
            "#,
            params![key, value, next],
        )?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(key = key, revision = next, bytes = value.len(), "集合已写入");
        Ok(next)
    }
}

// ==========================================
// MemoryBlobStore
// ==========================================
#[derive(Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, BlobSnapshot>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_entries(&self) -> RepositoryResult<MutexGuard<'_, HashMap<String, BlobSnapshot>>> {
        self.entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> RepositoryResult<Option<BlobSnapshot>> {
        Ok(self.get_entries()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str, expected_revision: i64) -> RepositoryResult<i64> {
        let mut entries = self.get_entries()?;
        let actual = entries
            .get(key)
            .map(|s| s.revision)
            .unwrap_or(INITIAL_REVISION);

        if actual != expected_revision {
            return Err(lock_failure(key, expected_revision, actual));
        }

        let next = actual + 1;
        entries.insert(
            key.to_string(),
            BlobSnapshot {
                value: value.to_string(),
                revision: next,
            },
        );
        Ok(next)
    }
}
