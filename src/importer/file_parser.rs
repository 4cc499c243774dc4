// ==========================================
// 飞行日志本 - 文件解析器实现
// ==========================================
// 阶段 0: 文件内容 → 原始行（表头 → 单元格）
// 支持: CSV (.csv) / 电子表格 (.xlsx/.xls/.xlsm/.ods，取第一个工作表)
// ==========================================

use crate::domain::import::{RawCell, RawRow, SourceRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::flight_importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;

/// 文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    /// 按扩展名识别（不区分大小写）
    pub fn from_path(path: &Path) -> ImportResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileKind::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Ok(FileKind::Spreadsheet),
            _ => Err(ImportError::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                ext
            })),
        }
    }
}

/// 表头清洗（去空白与 UTF-8 BOM）
fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// 组装一行；全空行返回 None
fn build_row(
    headers: &[String],
    row_number: usize,
    cells: impl Iterator<Item = RawCell>,
) -> Option<SourceRow> {
    let mut row_map = RawRow::new();
    for (header, cell) in headers.iter().zip(cells) {
        if header.is_empty() {
            continue;
        }
        // 重复表头保留第一列
        row_map.entry(header.clone()).or_insert(cell);
    }

    if row_map.values().all(RawCell::is_blank) {
        None
    } else {
        Some(SourceRow {
            row_number,
            cells: row_map,
        })
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// CSV 文本单元格：有限数值按数值处理（与电子表格一致）
    fn cell_from_text(value: &str) -> RawCell {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return RawCell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => RawCell::Number(n),
            _ => RawCell::Text(trimmed.to_string()),
        }
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<SourceRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let cells = record.iter().map(Self::cell_from_text);
            if let Some(row) = build_row(&headers, idx + 1, cells) {
                records.push(row);
            }
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 电子表格单元格 → RawCell（日期时间保留序列号）
    fn cell_from_data(cell: &Data) -> RawCell {
        match cell {
            Data::Empty | Data::Error(_) => RawCell::Empty,
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::Number(*f),
            Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                RawCell::text(s.trim())
            }
            Data::Bool(b) => RawCell::Text(b.to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<SourceRow>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("工作簿无工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| clean_header(&cell.to_string()))
                .collect(),
            // 空工作表：0 行
            None => return Ok(Vec::new()),
        };

        let records = rows
            .enumerate()
            .filter_map(|(idx, data_row)| {
                build_row(&headers, idx + 1, data_row.iter().map(Self::cell_from_data))
            })
            .collect();

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse(&self, kind: FileKind, bytes: &[u8]) -> ImportResult<Vec<SourceRow>> {
        match kind {
            FileKind::Csv => CsvParser.parse_bytes(bytes),
            FileKind::Spreadsheet => ExcelParser.parse_bytes(bytes),
        }
    }
}
