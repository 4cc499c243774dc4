// ==========================================
// 飞行日志本 - 航班仓储
// ==========================================
// 职责: flights 集合的读写（整体 JSON 数组）
// 读取: 回填缺失的 duration
// 写入: 新增 / 编辑前强制航班不变量
// 可见性: 本人记录 + 无归属的历史记录
// ==========================================

use crate::domain::flight::{FlightDraft, FlightRecord};
use crate::engine::flight_derivation::FlightDerivationService;
use crate::repository::blob_store::BlobStore;
use crate::repository::collection::{JsonCollection, Loaded};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// 集合键
pub const FLIGHTS_KEY: &str = "flights";

// ==========================================
// FlightRepository - 航班仓储
// ==========================================
pub struct FlightRepository {
    collection: JsonCollection<FlightRecord>,
    derivation: FlightDerivationService,
}

impl FlightRepository {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            collection: JsonCollection::new(FLIGHTS_KEY, store),
            derivation: FlightDerivationService::new(),
        }
    }

    /// 读取全部航班（含回填）
    fn load(&self) -> RepositoryResult<Loaded<FlightRecord>> {
        let mut loaded = self.collection.load()?;
        for record in loaded.items.iter_mut() {
            self.derivation.backfill_duration(record);
        }
        Ok(loaded)
    }

    fn not_found(id: &str) -> RepositoryError {
        RepositoryError::NotFound {
            entity: "FlightRecord".to_string(),
            id: id.to_string(),
        }
    }

    /// 航班列表（存储顺序）
    ///
    /// # 参数
    /// - user_id: 当前用户；None 时只返回无归属记录
    pub fn list_flights(&self, user_id: Option<&str>) -> RepositoryResult<Vec<FlightRecord>> {
        let loaded = self.load()?;
        Ok(loaded
            .items
            .into_iter()
            .filter(|f| f.is_visible_to(user_id))
            .collect())
    }

    /// 按 id 查询（不可见视为不存在）
    pub fn get_flight(
        &self,
        id: &str,
        user_id: Option<&str>,
    ) -> RepositoryResult<Option<FlightRecord>> {
        let loaded = self.load()?;
        Ok(loaded
            .items
            .into_iter()
            .find(|f| f.id == id && f.is_visible_to(user_id)))
    }

    /// 新增或编辑航班
    ///
    /// # 规则
    /// - draft.id 为空 ⇒ 新增（生成 UUID，imported = false）
    /// - 否则合并到已有记录，保留 id / created_at / imported / user_id
    /// - 两种情况都重新推导 duration，单飞清空教员
    ///
    /// # 返回
    /// - Ok(FlightRecord): 写入后的记录
    /// - Err(NotFound): id 不存在或对该用户不可见
    /// - Err(OptimisticLockFailure): 集合已被其他写入者修改
    #[instrument(skip(self, draft), fields(id = ?draft.id))]
    pub fn upsert_flight(&self, draft: FlightDraft) -> RepositoryResult<FlightRecord> {
        let Loaded {
            mut items,
            revision,
        } = self.load()?;
        let now = Utc::now();

        let saved = match draft.id.clone() {
            None => {
                let mut record = draft.into_record(Uuid::new_v4().to_string(), now);
                self.derivation.apply_invariants(&mut record);
                items.push(record.clone());
                info!(flight_id = %record.id, "新增航班");
                record
            }
            Some(id) => {
                let caller = draft.user_id.clone();
                let existing = items
                    .iter_mut()
                    .find(|f| f.id == id && f.is_visible_to(caller.as_deref()))
                    .ok_or_else(|| Self::not_found(&id))?;
                draft.merge_into(existing, now);
                self.derivation.apply_invariants(existing);
                info!(flight_id = %id, "编辑航班");
                existing.clone()
            }
        };

        self.collection.save(&items, revision)?;
        Ok(saved)
    }

    /// 删除航班
    pub fn delete_flight(&self, id: &str, user_id: Option<&str>) -> RepositoryResult<()> {
        let Loaded {
            mut items,
            revision,
        } = self.load()?;

        let before = items.len();
        items.retain(|f| !(f.id == id && f.is_visible_to(user_id)));
        if items.len() == before {
            return Err(Self::not_found(id));
        }

        self.collection.save(&items, revision)?;
        info!(flight_id = id, "删除航班");
        Ok(())
    }

    /// 追加一批航班（导入用，单次写入）
    ///
    /// # 返回
    /// - Ok(usize): 追加条数
    pub fn append_flights(&self, records: Vec<FlightRecord>) -> RepositoryResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let Loaded {
            mut items,
            revision,
        } = self.load()?;
        let count = records.len();
        items.extend(records);
        let new_revision = self.collection.save(&items, revision)?;

        debug!(
            appended = count,
            total = items.len(),
            revision = new_revision,
            "航班批量追加"
        );
        Ok(count)
    }
}
