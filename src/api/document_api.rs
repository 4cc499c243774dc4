// ==========================================
// 飞行日志本 - 证照 API
// ==========================================
// 职责: 证照列表（带到期状态）/ 新增 / 删除
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::LogbookConfigReader;
use crate::domain::document::{DocumentRecord, NewDocument};
use crate::engine::aggregator::{DocumentWithStatus, LogbookAggregator};
use crate::repository::DocumentRepository;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct DocumentApi {
    document_repo: Arc<DocumentRepository>,
    config: Arc<dyn LogbookConfigReader>,
}

impl DocumentApi {
    pub fn new(
        document_repo: Arc<DocumentRepository>,
        config: Arc<dyn LogbookConfigReader>,
    ) -> Self {
        Self {
            document_repo,
            config,
        }
    }

    /// 证照列表（签发日期倒序 + 到期状态）
    pub async fn list_documents(
        &self,
        user_id: Option<&str>,
        today: NaiveDate,
    ) -> ApiResult<Vec<DocumentWithStatus>> {
        let warning_days = self.config.get_expiry_warning_days().await?;
        let documents = self.document_repo.list_documents(user_id)?;
        Ok(LogbookAggregator::new(warning_days).document_statuses(&documents, today))
    }

    /// 新增证照
    pub fn add_document(
        &self,
        input: NewDocument,
        user_id: Option<&str>,
    ) -> ApiResult<DocumentRecord> {
        if input.issue_date.trim().is_empty() {
            return Err(ApiError::InvalidInput("签发日期不能为空".to_string()));
        }
        Ok(self.document_repo.add_document(input, user_id)?)
    }

    /// 删除证照
    pub fn delete_document(&self, id: &str, user_id: Option<&str>) -> ApiResult<()> {
        Ok(self.document_repo.delete_document(id, user_id)?)
    }
}
