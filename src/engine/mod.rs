// ==========================================
// 飞行日志本 - 引擎层
// ==========================================
// 职责: 规范化 / 时长计算 / 分类 / 统计聚合
// 红线: Engine 不拼 SQL, 不访问存储
// ==========================================

pub mod aggregator;
pub mod classifier;
pub mod duration;
pub mod flight_derivation;
pub mod temporal;

// 重导出核心引擎
pub use aggregator::{
    format_hours, DashboardStats, DocumentWithStatus, FlightLog, HourTotals, LogbookAggregator,
    MedicalValidity,
};
pub use classifier::{classify_crew, classify_exercise, CrewAssignment};
pub use duration::{calculate_duration, duration_string};
pub use flight_derivation::FlightDerivationService;
pub use temporal::{normalize_date, normalize_time};
