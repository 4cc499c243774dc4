// ==========================================
// 飞行日志本 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 个人飞行记录本（导入 / 记录 / 统计 / 证照到期）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 集合存储
pub mod repository;

// 引擎层 - 规范化 / 计算 / 分类 / 统计
pub mod engine;

// 导入层 - 外部表格
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DocumentType, ExpiryStatus, SortieType, TypeOfFlight};

// 领域实体
pub use domain::{DocumentRecord, FlightDraft, FlightRecord, ImportSummary, NewDocument};

// 引擎
pub use engine::{DashboardStats, FlightLog, HourTotals, LogbookAggregator};

// API
pub use api::{DashboardApi, DocumentApi, FlightApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Flight Logbook";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
