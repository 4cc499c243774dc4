// ==========================================
// 飞行日志本 - 数据清洗器实现
// ==========================================
// 职责: TRIM / 数值单元格转文本
// ==========================================

use crate::domain::import::RawCell;
use crate::importer::flight_importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, cell: &RawCell) -> String {
        cell.as_text().trim().to_string()
    }
}
