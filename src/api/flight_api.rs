// ==========================================
// 飞行日志本 - 航班 API
// ==========================================
// 职责: 航班列表 / 搜索 / 飞行日志 / 新增编辑 / 删除
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::flight::{FlightDraft, FlightRecord};
use crate::engine::aggregator::{FlightLog, LogbookAggregator};
use crate::repository::FlightRepository;
use std::sync::Arc;
use tracing::instrument;

pub struct FlightApi {
    flight_repo: Arc<FlightRepository>,
    aggregator: LogbookAggregator,
}

impl FlightApi {
    pub fn new(flight_repo: Arc<FlightRepository>) -> Self {
        Self {
            flight_repo,
            aggregator: LogbookAggregator::default(),
        }
    }

    /// 航班列表（日期倒序）
    pub fn list_flights(&self, user_id: Option<&str>) -> ApiResult<Vec<FlightRecord>> {
        let flights = self.flight_repo.list_flights(user_id)?;
        Ok(self.aggregator.sort_newest_first(&flights))
    }

    /// 关键字搜索（日期倒序）
    pub fn search_flights(&self, user_id: Option<&str>, term: &str) -> ApiResult<Vec<FlightRecord>> {
        let flights = self.list_flights(user_id)?;
        Ok(self.aggregator.search_flights(&flights, term))
    }

    /// 查询单条航班
    pub fn get_flight(&self, id: &str, user_id: Option<&str>) -> ApiResult<FlightRecord> {
        self.flight_repo
            .get_flight(id, user_id)?
            .ok_or_else(|| ApiError::NotFound(format!("FlightRecord(id={})不存在", id)))
    }

    /// 飞行日志（日期正序 + 合计）
    pub fn flight_log(&self, user_id: Option<&str>) -> ApiResult<FlightLog> {
        let flights = self.flight_repo.list_flights(user_id)?;
        Ok(self.aggregator.flight_log(&flights))
    }

    /// 新增 / 编辑航班
    ///
    /// 新增时若草稿未指定归属，归属当前用户
    #[instrument(skip(self, draft))]
    pub fn upsert_flight(
        &self,
        mut draft: FlightDraft,
        user_id: Option<&str>,
    ) -> ApiResult<FlightRecord> {
        if draft.date.trim().is_empty() {
            return Err(ApiError::InvalidInput("日期不能为空".to_string()));
        }
        if draft.aircraft.trim().is_empty() {
            return Err(ApiError::InvalidInput("机型不能为空".to_string()));
        }
        if draft.user_id.is_none() {
            draft.user_id = user_id.map(str::to_string);
        }

        Ok(self.flight_repo.upsert_flight(draft)?)
    }

    /// 删除航班
    #[instrument(skip(self))]
    pub fn delete_flight(&self, id: &str, user_id: Option<&str>) -> ApiResult<()> {
        Ok(self.flight_repo.delete_flight(id, user_id)?)
    }
}
