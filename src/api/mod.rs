// ==========================================
// 飞行日志本 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行调用
// ==========================================

pub mod dashboard_api;
pub mod document_api;
pub mod error;
pub mod flight_api;
pub mod import_api;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use document_api::DocumentApi;
pub use error::{ApiError, ApiResult};
pub use flight_api::FlightApi;
pub use import_api::ImportApi;
