// ==========================================
// 飞行日志本 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务规则
// ==========================================
// 职责: 提供集合读写接口,屏蔽存储细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod blob_store;
pub mod collection;
pub mod document_repo;
pub mod error;
pub mod flight_repo;

// 重导出核心仓储
pub use blob_store::{BlobSnapshot, BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use collection::{JsonCollection, Loaded};
pub use document_repo::DocumentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use flight_repo::FlightRepository;
