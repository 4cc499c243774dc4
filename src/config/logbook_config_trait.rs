// ==========================================
// 飞行日志本 - 配置读取 Trait
// ==========================================
// 职责: 定义导入 / 统计所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// LogbookConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
// 测试中可用内存实现替换
#[async_trait]
pub trait LogbookConfigReader: Send + Sync {
    /// 证照到期预警窗口（天）
    ///
    /// # 默认值
    /// - 30
    async fn get_expiry_warning_days(&self) -> Result<i64, ConfigError>;

    /// 驾驶舱最近航班条数
    ///
    /// # 默认值
    /// - 5
    async fn get_recent_flights_limit(&self) -> Result<usize, ConfigError>;

    /// 单次导入最大行数（超出部分不处理）
    ///
    /// # 默认值
    /// - 10000
    async fn get_import_max_rows(&self) -> Result<usize, ConfigError>;
}

// 共享所有权下的转发实现（AppState 以 Arc<dyn LogbookConfigReader> 持有配置）
#[async_trait]
impl<T> LogbookConfigReader for std::sync::Arc<T>
where
    T: LogbookConfigReader + ?Sized,
{
    async fn get_expiry_warning_days(&self) -> Result<i64, ConfigError> {
        (**self).get_expiry_warning_days().await
    }

    async fn get_recent_flights_limit(&self) -> Result<usize, ConfigError> {
        (**self).get_recent_flights_limit().await
    }

    async fn get_import_max_rows(&self) -> Result<usize, ConfigError> {
        (**self).get_import_max_rows().await
    }
}
