// ==========================================
// 飞行日志本 - 导入层
// ==========================================
// 职责: 外部表格 → 规范化航班记录
// 支持: CSV, Excel / ODS
// ==========================================

pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod flight_importer_impl;
pub mod flight_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper as FieldMapperImpl, LogicalField, MappedRow, FIELD_ALIASES};
pub use file_parser::{CsvParser, ExcelParser, FileKind, UniversalFileParser};
pub use flight_importer_impl::FlightImporterImpl;

// 重导出 Trait 接口
pub use flight_importer_trait::{DataCleaner, FieldMapper, FileParser, FlightImporter};
