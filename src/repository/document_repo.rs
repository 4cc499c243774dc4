// ==========================================
// 飞行日志本 - 证照仓储
// ==========================================
// 职责: documents 集合的读写（整体 JSON 数组）
// 红线: 到期状态不落库，由统计引擎派生
// ==========================================

use crate::domain::document::{DocumentRecord, NewDocument};
use crate::repository::blob_store::BlobStore;
use crate::repository::collection::{JsonCollection, Loaded};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 集合键
pub const DOCUMENTS_KEY: &str = "documents";

pub struct DocumentRepository {
    collection: JsonCollection<DocumentRecord>,
}

impl DocumentRepository {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            collection: JsonCollection::new(DOCUMENTS_KEY, store),
        }
    }

    /// 证照列表（签发日期倒序，无法解析的日期排最后）
    pub fn list_documents(&self, user_id: Option<&str>) -> RepositoryResult<Vec<DocumentRecord>> {
        let mut documents: Vec<DocumentRecord> = self
            .collection
            .load()?
            .items
            .into_iter()
            .filter(|d| d.is_visible_to(user_id))
            .collect();

        documents.sort_by(|a, b| match (a.parsed_issue_date(), b.parsed_issue_date()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(documents)
    }

    /// 新增证照
    pub fn add_document(
        &self,
        input: NewDocument,
        user_id: Option<&str>,
    ) -> RepositoryResult<DocumentRecord> {
        if input.name.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "证照名称不能为空".to_string(),
            ));
        }

        let Loaded {
            mut items,
            revision,
        } = self.collection.load()?;
        let record = input.into_record(
            Uuid::new_v4().to_string(),
            user_id.map(str::to_string),
            Utc::now(),
        );
        items.push(record.clone());
        self.collection.save(&items, revision)?;

        info!(document_id = %record.id, doc_type = %record.doc_type, "新增证照");
        Ok(record)
    }

    /// 删除证照
    pub fn delete_document(&self, id: &str, user_id: Option<&str>) -> RepositoryResult<()> {
        let Loaded {
            mut items,
            revision,
        } = self.collection.load()?;

        let before = items.len();
        items.retain(|d| !(d.id == id && d.is_visible_to(user_id)));
        if items.len() == before {
            return Err(RepositoryError::NotFound {
                entity: "DocumentRecord".to_string(),
                id: id.to_string(),
            });
        }

        self.collection.save(&items, revision)?;
        info!(document_id = id, "删除证照");
        Ok(())
    }
}
