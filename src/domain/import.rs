// ==========================================
// 飞行日志本 - 导入领域模型
// ==========================================
// 职责: 原始单元格 / 原始行 / 批次汇总
// ==========================================

use crate::domain::flight::FlightRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// RawCell - 规范化前的单元格
// ==========================================
// 电子表格的日期/时间可能是文本，也可能是序列号/日内小数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
}

impl RawCell {
    /// 构造文本单元格（空白文本视为 Empty）
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value)
        }
    }

    /// 是否为空（空白文本同样视为空）
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(n) => !n.is_finite(),
        }
    }

    /// 转为文本（整数不带小数部分）
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Number(n) => format_number(*n),
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// 数值转文本：有限整数不带 ".0"
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 原始行：表头 → 单元格
pub type RawRow = HashMap<String, RawCell>;

/// 带源文件行号的原始行
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub row_number: usize, // 数据行号（从 1 开始，不含表头，空白行同样计数）
    pub cells: RawRow,
}

// ==========================================
// 行拒绝记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRejection {
    pub row_number: usize, // 源文件数据行号（从 1 开始，不含表头，空白行同样计数）
    pub reason: String,
}

// ==========================================
// FlightBatch - 行处理结果（尚未落库）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct FlightBatch {
    pub records: Vec<FlightRecord>, // 按输入行顺序
    pub success_count: usize,
    pub error_count: usize,
    pub rejections: Vec<RowRejection>,
}

impl FlightBatch {
    /// 输入行总数
    pub fn total_rows(&self) -> usize {
        self.success_count + self.error_count
    }
}

// ==========================================
// ImportSummary - 导入批次汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub rejections: Vec<RowRejection>,
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_cell_text() {
        assert_eq!(RawCell::text("   "), RawCell::Empty);
        assert_eq!(RawCell::text(" C152 ").as_text(), "C152");
        assert!(RawCell::Empty.is_blank());
        assert!(RawCell::Text("\t".to_string()).is_blank());
        assert!(!RawCell::Number(0.0).is_blank());
    }

    #[test]
    fn test_number_as_text() {
        assert_eq!(RawCell::Number(172.0).as_text(), "172");
        assert_eq!(RawCell::Number(1.5).as_text(), "1.5");
    }
}
