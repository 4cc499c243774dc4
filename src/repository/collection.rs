// ==========================================
// 飞行日志本 - JSON 集合读写
// ==========================================
// 职责: BlobStore 之上的类型化集合（Vec<T> ⇄ JSON 数组）
// 读取时记录修订号，写回时带上，防止并发覆盖
// ==========================================

use crate::repository::blob_store::{BlobStore, INITIAL_REVISION};
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// 已加载的集合
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub revision: i64,
}

/// 类型化 JSON 集合
pub struct JsonCollection<T> {
    key: &'static str,
    store: Arc<dyn BlobStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(key: &'static str, store: Arc<dyn BlobStore>) -> Self {
        Self {
            key,
            store,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// 读取整个集合；从未写入视为空集合
    pub fn load(&self) -> RepositoryResult<Loaded<T>> {
        match self.store.read(self.key)? {
            None => Ok(Loaded {
                items: Vec::new(),
                revision: INITIAL_REVISION,
            }),
            Some(snapshot) => {
                let items: Vec<T> = serde_json::from_str(&snapshot.value).map_err(|e| {
                    RepositoryError::SerializationError {
                        collection: self.key.to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok(Loaded {
                    items,
                    revision: snapshot.revision,
                })
            }
        }
    }

    /// 写回整个集合（修订号不匹配时失败）
    pub fn save(&self, items: &[T], expected_revision: i64) -> RepositoryResult<i64> {
        let json =
            serde_json::to_string(items).map_err(|e| RepositoryError::SerializationError {
                collection: self.key.to_string(),
                message: e.to_string(),
            })?;
        self.store.write(self.key, &json, expected_revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::blob_store::MemoryBlobStore;

    #[test]
    fn test_load_empty_and_save() {
        let store: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let collection: JsonCollection<String> = JsonCollection::new("names", store);

        let loaded = collection.load().unwrap();
        assert!(loaded.items.is_empty());
        assert_eq!(loaded.revision, 0);

        let rev = collection.save(&["a".to_string()], loaded.revision).unwrap();
        let reloaded = collection.load().unwrap();
        assert_eq!(reloaded.items, vec!["a".to_string()]);
        assert_eq!(reloaded.revision, rev);
    }

    #[test]
    fn test_corrupt_collection_reports_key() {
        let store: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        store.write("names", "{not json", 0).unwrap();
        let collection: JsonCollection<String> = JsonCollection::new("names", store);

        match collection.load() {
            Err(RepositoryError::SerializationError { collection, .. }) => {
                assert_eq!(collection, "names")
            }
            other => panic!("unexpected: {:?}", other.map(|l| l.items)),
        }
    }
}
