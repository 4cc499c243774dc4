// ==========================================
// 飞行日志本 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分级:
// - 行级错误: 记入 RowRejection，不中断批次
// - 批次错误: 整批失败，不写入
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.xlsx/.xls/.xlsm/.ods）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 行级错误 =====
    #[error("必填字段缺失 (行 {row}): {field}")]
    MissingRequiredField { row: usize, field: String },

    #[error("字段映射失败 (行 {row}): {message}")]
    FieldMappingError { row: usize, message: String },

    #[error("超出单次导入行数上限 (行 {row}, 上限 {limit})")]
    RowLimitExceeded { row: usize, limit: usize },

    // ===== 批次错误 =====
    #[error("没有可导入的航班: 共 {total} 行, 全部失败 ({errors} 行)")]
    NoRowsImported { total: usize, errors: usize },

    #[error("航班写入失败: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为行级错误（计入失败数，不中断批次）
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            ImportError::MissingRequiredField { .. }
                | ImportError::FieldMappingError { .. }
                | ImportError::RowLimitExceeded { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
