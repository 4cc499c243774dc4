// ==========================================
// 飞行日志本 - 导入接口定义
// ==========================================
// 职责: 定义导入流水线各阶段接口（不包含实现）
// 流程: 文件解析 → 字段映射 → 清洗 → 规范化/计算/分类 → 追加写入
// ==========================================

use crate::domain::import::{FlightBatch, ImportSummary, RawCell, RawRow, SourceRow};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::MappedRow;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// FlightImporter Trait
// ==========================================
// 实现者: FlightImporterImpl
#[async_trait]
pub trait FlightImporter: Send + Sync {
    /// 从文件导入航班（按扩展名选择解析器）
    ///
    /// # 参数
    /// - file_path: .csv / .xlsx / .xls / .xlsm / .ods
    /// - user_id: 导入用户（写入记录的 userId）
    ///
    /// # 返回
    /// - Ok(ImportSummary): 导入汇总（0 行输入时全为 0）
    /// - Err: 文件不可读 / 格式不支持 / 全部行失败 / 写入失败（均不写入）
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user_id: Option<&str>,
    ) -> ImportResult<ImportSummary>;

    /// 逐个导入多个文件（顺序执行，各自独立成败）
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
        user_id: Option<&str>,
    ) -> Vec<ImportResult<ImportSummary>>;

    /// 行处理（不落库）
    ///
    /// 行级错误计入 rejections，不中断；输出保持输入顺序，行号按输入位置从 1 计
    fn import_rows(&self, rows: Vec<RawRow>, user_id: Option<&str>) -> FlightBatch;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件内容 → 原始行（表头 → 单元格）
pub trait FileParser: Send + Sync {
    /// 解析文件内容
    ///
    /// # 返回
    /// - Ok(Vec<SourceRow>): 原始记录列表（已跳过全空行，行号按源文件计）
    /// - Err: 内容损坏
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<SourceRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 源表头 → 逻辑字段（别名表）
pub trait FieldMapper: Send + Sync {
    /// 映射一行
    fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<MappedRow>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格 → 清洗后的文本
pub trait DataCleaner: Send + Sync {
    /// 单元格转文本（TRIM；数值整数不带小数部分）
    fn clean_text(&self, cell: &RawCell) -> String;
}
