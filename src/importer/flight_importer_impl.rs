// ==========================================
// 飞行日志本 - 航班导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到航班集合
// 流程: 解析 → 映射 → 清洗 → 规范化 → 时长 → 分类 → 追加写入
// 红线:
// - 行级错误只计数，不中断批次
// - 批次失败不写入；全部处理完后只写一次
// ==========================================

use crate::config::config_manager::config_keys;
use crate::config::LogbookConfigReader;
use crate::domain::flight::FlightRecord;
use crate::domain::import::{FlightBatch, ImportSummary, RawRow, RowRejection, SourceRow};
use crate::engine::classifier::{classify_crew, classify_exercise};
use crate::engine::duration::duration_string;
use crate::engine::temporal::{normalize_date, normalize_time};
use crate::importer::data_cleaner::DataCleaner as DefaultDataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{FieldMapper as DefaultFieldMapper, MappedRow};
use crate::importer::file_parser::{FileKind, UniversalFileParser};
use crate::importer::flight_importer_trait::{DataCleaner, FieldMapper, FlightImporter};
use crate::repository::FlightRepository;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// FlightImporterImpl - 航班导入器实现
// ==========================================
pub struct FlightImporterImpl<C>
where
    C: LogbookConfigReader,
{
    // 数据访问层
    flight_repo: Arc<FlightRepository>,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: UniversalFileParser,
    field_mapper: Box<dyn FieldMapper>,
    data_cleaner: Box<dyn DataCleaner>,
}

impl<C> FlightImporterImpl<C>
where
    C: LogbookConfigReader,
{
    /// 使用默认组件创建导入器
    pub fn new(flight_repo: Arc<FlightRepository>, config: C) -> Self {
        Self::with_components(
            flight_repo,
            config,
            Box::new(DefaultFieldMapper),
            Box::new(DefaultDataCleaner),
        )
    }

    /// 指定映射器 / 清洗器创建导入器
    pub fn with_components(
        flight_repo: Arc<FlightRepository>,
        config: C,
        field_mapper: Box<dyn FieldMapper>,
        data_cleaner: Box<dyn DataCleaner>,
    ) -> Self {
        Self {
            flight_repo,
            config,
            file_parser: UniversalFileParser,
            field_mapper,
            data_cleaner,
        }
    }

    /// 单行 → 航班记录
    ///
    /// # 规则
    /// - 日期 / 机型为空 ⇒ MissingRequiredField
    /// - 无法解析的日期原样保留
    fn build_record(
        &self,
        mapped: MappedRow,
        user_id: Option<&str>,
        imported_at: DateTime<Utc>,
    ) -> ImportResult<FlightRecord> {
        let row = mapped.row_number;

        if mapped.date.is_blank() {
            return Err(ImportError::MissingRequiredField {
                row,
                field: "date".to_string(),
            });
        }
        let aircraft = self.data_cleaner.clean_text(&mapped.aircraft);
        if aircraft.is_empty() {
            return Err(ImportError::MissingRequiredField {
                row,
                field: "aircraft".to_string(),
            });
        }

        let date = normalize_date(&mapped.date);
        let chocks_off = normalize_time(&mapped.departure).trim().to_string();
        let chocks_on = normalize_time(&mapped.arrival).trim().to_string();
        let duration = duration_string(&chocks_off, &chocks_on);

        let exercise = self.data_cleaner.clean_text(&mapped.exercise);
        let crew = classify_crew(
            &self.data_cleaner.clean_text(&mapped.co_pilot_or_student),
            &self.data_cleaner.clean_text(&mapped.pilot_in_command),
        );

        Ok(FlightRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.map(str::to_string),
            date,
            aircraft,
            flight_number: self.data_cleaner.clean_text(&mapped.flight_number),
            chocks_off,
            chocks_on,
            from: self.data_cleaner.clean_text(&mapped.from),
            to: self.data_cleaner.clean_text(&mapped.to),
            trainee: crew.trainee,
            instructor: crew.instructor,
            type_of_flight: classify_exercise(&exercise),
            sortie_type: crew.sortie_type,
            duration,
            created_at: imported_at,
            updated_at: None,
            imported: true,
        })
    }

    /// 逐行处理（按输入顺序，行级错误计入 rejections）
    fn process_rows(
        &self,
        rows: Vec<SourceRow>,
        user_id: Option<&str>,
        max_rows: usize,
    ) -> FlightBatch {
        let imported_at = Utc::now();
        let mut batch = FlightBatch::default();

        for (idx, source) in rows.into_iter().enumerate() {
            let row_number = source.row_number;

            let outcome = if idx >= max_rows {
                Err(ImportError::RowLimitExceeded {
                    row: row_number,
                    limit: max_rows,
                })
            } else {
                self.field_mapper
                    .map_row(&source.cells, row_number)
                    .and_then(|mapped| self.build_record(mapped, user_id, imported_at))
            };

            match outcome {
                Ok(record) => {
                    batch.records.push(record);
                    batch.success_count += 1;
                }
                Err(e) => {
                    if e.is_row_level() {
                        debug!(row = row_number, error = %e, "行被拒绝");
                    } else {
                        warn!(row = row_number, error = %e, "行处理异常");
                    }
                    batch.error_count += 1;
                    batch.rejections.push(RowRejection {
                        row_number,
                        reason: e.to_string(),
                    });
                }
            }
        }

        batch
    }

    /// 读取单次导入行数上限
    async fn max_rows(&self) -> ImportResult<usize> {
        self.config
            .get_import_max_rows()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: config_keys::IMPORT_MAX_ROWS.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl<C> FlightImporter for FlightImporterImpl<C>
where
    C: LogbookConfigReader + Send + Sync,
{
    #[instrument(skip(self, file_path, user_id), fields(batch_id))]
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user_id: Option<&str>,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let path = file_path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());
        info!(file_path = %path.display(), "开始导入航班");

        // === 步骤 1: 识别格式 ===
        let kind = FileKind::from_path(path).map_err(|e| {
            error!(error = %e, "文件格式不支持");
            e
        })?;

        // === 步骤 2: 读取并解析文件 ===
        debug!("步骤 2: 读取并解析文件");
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            error!(error = %e, "文件读取失败");
            ImportError::from(e)
        })?;
        let rows = self.file_parser.parse(kind, &bytes).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        info!(total_rows = rows.len(), "文件解析完成");

        // === 步骤 3: 逐行处理 ===
        debug!("步骤 3: 逐行处理");
        let max_rows = self.max_rows().await?;
        let batch = self.process_rows(rows, user_id, max_rows);
        let total_rows = batch.total_rows();

        if total_rows > 0 && batch.success_count == 0 {
            warn!(total_rows, "全部行被拒绝，不写入");
            return Err(ImportError::NoRowsImported {
                total: total_rows,
                errors: batch.error_count,
            });
        }

        // === 步骤 4: 追加写入（单次） ===
        if !batch.records.is_empty() {
            debug!("步骤 4: 追加写入");
            self.flight_repo
                .append_flights(batch.records)
                .map_err(|e| {
                    error!(error = %e, "航班写入失败");
                    ImportError::from(e)
                })?;
        }

        let elapsed_ms = start_time.elapsed().as_millis();
        info!(
            total_rows,
            success = batch.success_count,
            errors = batch.error_count,
            elapsed_ms = elapsed_ms as u64,
            "航班导入完成"
        );

        Ok(ImportSummary {
            batch_id,
            file_name,
            total_rows,
            success_count: batch.success_count,
            error_count: batch.error_count,
            rejections: batch.rejections,
            imported_at: Utc::now(),
            elapsed_ms,
        })
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
        user_id: Option<&str>,
    ) -> Vec<ImportResult<ImportSummary>> {
        info!(count = file_paths.len(), "开始批量导入文件");

        // 顺序执行：每个文件读取最新修订号后再写入
        stream::iter(file_paths)
            .then(|path| self.import_file(path, user_id))
            .collect()
            .await
    }

    fn import_rows(&self, rows: Vec<RawRow>, user_id: Option<&str>) -> FlightBatch {
        let numbered = rows
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| SourceRow {
                row_number: idx + 1,
                cells,
            })
            .collect();
        self.process_rows(numbered, user_id, usize::MAX)
    }
}
