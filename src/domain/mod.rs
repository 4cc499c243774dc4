// ==========================================
// 飞行日志本 - 领域模型层
// ==========================================
// 职责: 定义航班 / 证照 / 导入相关实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod document;
pub mod flight;
pub mod import;
pub mod types;

// 重导出核心类型
pub use document::{DocumentRecord, NewDocument};
pub use flight::{FlightDraft, FlightRecord};
pub use import::{FlightBatch, ImportSummary, RawCell, RawRow, RowRejection, SourceRow};
pub use types::{DocumentType, ExpiryStatus, SortieType, TypeOfFlight};
