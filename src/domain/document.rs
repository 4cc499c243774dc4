// ==========================================
// 飞行日志本 - 证照领域模型
// ==========================================
// 职责: 执照 / 体检 等证照记录
// 红线: 到期状态为纯函数派生，不落库
// ==========================================

use crate::domain::types::DocumentType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 证照记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// 是否对指定用户可见（与航班相同的归属规则）
    pub fn is_visible_to(&self, user_id: Option<&str>) -> bool {
        match &self.user_id {
            None => true,
            Some(owner) => Some(owner.as_str()) == user_id,
        }
    }

    /// 解析签发日期
    pub fn parsed_issue_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.issue_date.trim(), "%Y-%m-%d").ok()
    }
}

/// 新增证照的输入字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub notes: String,
}

impl NewDocument {
    /// 生成证照记录；空白到期日视为未设置
    pub fn into_record(
        self,
        id: String,
        user_id: Option<String>,
        created_at: DateTime<Utc>,
    ) -> DocumentRecord {
        let expiry_date = self
            .expiry_date
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        DocumentRecord {
            id,
            user_id,
            name: self.name,
            doc_type: self.doc_type,
            issue_date: self.issue_date,
            expiry_date,
            number: self.number,
            issuer: self.issuer,
            notes: self.notes,
            created_at,
        }
    }
}
