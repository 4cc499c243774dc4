// ==========================================
// 飞行日志本 - 驾驶舱 API
// ==========================================
// 职责: 航班数 / 小时数 / 最近航班 / 体检有效性
// ==========================================

use crate::api::error::ApiResult;
use crate::config::LogbookConfigReader;
use crate::engine::aggregator::{DashboardStats, LogbookAggregator};
use crate::repository::{DocumentRepository, FlightRepository};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

pub struct DashboardApi {
    flight_repo: Arc<FlightRepository>,
    document_repo: Arc<DocumentRepository>,
    config: Arc<dyn LogbookConfigReader>,
}

impl DashboardApi {
    pub fn new(
        flight_repo: Arc<FlightRepository>,
        document_repo: Arc<DocumentRepository>,
        config: Arc<dyn LogbookConfigReader>,
    ) -> Self {
        Self {
            flight_repo,
            document_repo,
            config,
        }
    }

    /// 驾驶舱统计
    ///
    /// # 参数
    /// - user_id: 当前用户
    /// - today: 到期判定基准日
    pub async fn get_dashboard_stats(
        &self,
        user_id: Option<&str>,
        today: NaiveDate,
    ) -> ApiResult<DashboardStats> {
        let warning_days = self.config.get_expiry_warning_days().await?;
        let recent_n = self.config.get_recent_flights_limit().await?;

        let flights = self.flight_repo.list_flights(user_id)?;
        let documents = self.document_repo.list_documents(user_id)?;
        debug!(
            flights = flights.len(),
            documents = documents.len(),
            "驾驶舱统计"
        );

        Ok(LogbookAggregator::new(warning_days).dashboard_stats(
            &flights,
            &documents,
            today,
            recent_n,
        ))
    }
}
