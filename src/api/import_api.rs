// ==========================================
// 飞行日志本 - 导入 API
// ==========================================
// 职责: 封装航班导入器
// ==========================================

use crate::api::error::ApiResult;
use crate::config::LogbookConfigReader;
use crate::domain::import::ImportSummary;
use crate::importer::{FlightImporter, FlightImporterImpl};
use crate::repository::FlightRepository;
use std::sync::Arc;
use tracing::{error, info};

pub struct ImportApi {
    importer: FlightImporterImpl<Arc<dyn LogbookConfigReader>>,
}

impl ImportApi {
    pub fn new(flight_repo: Arc<FlightRepository>, config: Arc<dyn LogbookConfigReader>) -> Self {
        Self {
            importer: FlightImporterImpl::new(flight_repo, config),
        }
    }

    /// 导入单个文件
    pub async fn import_flights(
        &self,
        file_path: &str,
        user_id: Option<&str>,
    ) -> ApiResult<ImportSummary> {
        match self.importer.import_file(file_path, user_id).await {
            Ok(summary) => {
                info!(
                    batch_id = %summary.batch_id,
                    success = summary.success_count,
                    errors = summary.error_count,
                    "导入成功"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(file = file_path, error = %e, "导入失败");
                Err(e.into())
            }
        }
    }

    /// 逐个导入多个文件（各自独立成败）
    pub async fn import_many(
        &self,
        file_paths: Vec<String>,
        user_id: Option<&str>,
    ) -> Vec<ApiResult<ImportSummary>> {
        self.importer
            .batch_import(file_paths, user_id)
            .await
            .into_iter()
            .map(|r| r.map_err(Into::into))
            .collect()
    }
}
