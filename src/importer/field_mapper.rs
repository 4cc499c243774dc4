// ==========================================
// 飞行日志本 - 字段映射器实现
// ==========================================
// 职责: 源表头 → 逻辑字段
// 规则: 别名按表顺序查找，第一个存在且非空的单元格生效
// ==========================================

use crate::domain::import::{RawCell, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::flight_importer_trait::FieldMapper as FieldMapperTrait;
use std::fmt;

/// 逻辑字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Date,
    Departure,
    Arrival,
    Aircraft,
    From,
    To,
    CoPilotOrStudent,
    PilotInCommand,
    Exercise,
    FlightNumber,
}

impl LogicalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalField::Date => "date",
            LogicalField::Departure => "departure",
            LogicalField::Arrival => "arrival",
            LogicalField::Aircraft => "aircraft",
            LogicalField::From => "from",
            LogicalField::To => "to",
            LogicalField::CoPilotOrStudent => "co-pilot/student",
            LogicalField::PilotInCommand => "pilot in command",
            LogicalField::Exercise => "exercise",
            LogicalField::FlightNumber => "flight number",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 别名表（字段顺序无关，别名顺序即优先级）
pub const FIELD_ALIASES: &[(LogicalField, &[&str])] = &[
    (LogicalField::Date, &["Date of Flight", "Date", "date", "DATE"]),
    (
        LogicalField::Departure,
        &["Departure Time", "Chocks Off", "Time Off", "Dep", "chocks_off"],
    ),
    (
        LogicalField::Arrival,
        &["Arrival Time", "Chocks On", "Time On", "Arr", "chocks_on"],
    ),
    (
        LogicalField::Aircraft,
        &["Aircraft Registration", "Aircraft", "aircraft", "AIRCRAFT", "A/C"],
    ),
    (LogicalField::From, &["From", "FROM", "from", "Departure"]),
    (LogicalField::To, &["To", "TO", "to", "Destination"]),
    (
        LogicalField::CoPilotOrStudent,
        &["Co-Pilot/Student", "Co-Pilot", "Student", "Trainee"],
    ),
    (
        LogicalField::PilotInCommand,
        &["Pilot in Command", "PIC", "Captain", "Instructor"],
    ),
    (
        LogicalField::Exercise,
        &["Exercise", "Exercise Details", "Remarks", "exercise"],
    ),
    (
        LogicalField::FlightNumber,
        &["Flight Number", "Flight No", "flightNumber"],
    ),
];

/// 逻辑字段的别名列表
pub fn aliases_for(field: LogicalField) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// 解析逻辑字段：返回第一个存在且非空的别名对应单元格
pub fn resolve(row: &RawRow, field: LogicalField) -> Option<&RawCell> {
    aliases_for(field)
        .iter()
        .find_map(|alias| row.get(*alias).filter(|cell| !cell.is_blank()))
}

/// 行中是否存在该逻辑字段的任一列（不论是否为空）
pub fn has_column(row: &RawRow, field: LogicalField) -> bool {
    aliases_for(field).iter().any(|alias| row.contains_key(*alias))
}

/// 映射后的行（缺失列为 Empty）
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub row_number: usize,
    pub date: RawCell,
    pub departure: RawCell,
    pub arrival: RawCell,
    pub aircraft: RawCell,
    pub from: RawCell,
    pub to: RawCell,
    pub co_pilot_or_student: RawCell,
    pub pilot_in_command: RawCell,
    pub exercise: RawCell,
    pub flight_number: RawCell,
}

pub struct FieldMapper;

impl FieldMapper {
    fn get_cell(&self, row: &RawRow, field: LogicalField) -> RawCell {
        resolve(row, field).cloned().unwrap_or(RawCell::Empty)
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<MappedRow> {
        let recognized = FIELD_ALIASES
            .iter()
            .any(|(field, _)| has_column(row, *field));
        if !recognized {
            return Err(ImportError::FieldMappingError {
                row: row_number,
                message: "无可识别的列".to_string(),
            });
        }

        Ok(MappedRow {
            row_number,
            date: self.get_cell(row, LogicalField::Date),
            departure: self.get_cell(row, LogicalField::Departure),
            arrival: self.get_cell(row, LogicalField::Arrival),
            aircraft: self.get_cell(row, LogicalField::Aircraft),
            from: self.get_cell(row, LogicalField::From),
            to: self.get_cell(row, LogicalField::To),
            co_pilot_or_student: self.get_cell(row, LogicalField::CoPilotOrStudent),
            pilot_in_command: self.get_cell(row, LogicalField::PilotInCommand),
            exercise: self.get_cell(row, LogicalField::Exercise),
            flight_number: self.get_cell(row, LogicalField::FlightNumber),
        })
    }
}
