// ==========================================
// 飞行日志本 - 领域类型定义
// ==========================================
// 职责: 航班类型 / 架次类型 / 证照类型 / 到期状态
// ==========================================

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ==========================================
// 飞行类型 (Type of Flight)
// ==========================================
// 序列化格式: 与录入表单下拉值一致
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeOfFlight {
    #[serde(rename = "Ccts&Ldg", alias = "CctsAndLdg")]
    CctsAndLdg, // 起落航线
    #[default]
    #[serde(rename = "General Flying", alias = "GeneralFlying")]
    GeneralFlying, // 一般飞行
    #[serde(rename = "Progress Check", alias = "ProgressCheck")]
    ProgressCheck, // 阶段检查
    #[serde(rename = "Check")]
    Check, // 检查飞行
    #[serde(rename = "Cross-country", alias = "CrossCountry")]
    CrossCountry, // 转场
    #[serde(rename = "Instrument Flying", alias = "InstrumentFlying")]
    InstrumentFlying, // 仪表飞行
}

impl TypeOfFlight {
    /// 显示/存储用字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeOfFlight::CctsAndLdg => "Ccts&Ldg",
            TypeOfFlight::GeneralFlying => "General Flying",
            TypeOfFlight::ProgressCheck => "Progress Check",
            TypeOfFlight::Check => "Check",
            TypeOfFlight::CrossCountry => "Cross-country",
            TypeOfFlight::InstrumentFlying => "Instrument Flying",
        }
    }
}

impl fmt::Display for TypeOfFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 架次类型 (Sortie Type)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortieType {
    #[default]
    Dual, // 带飞
    Solo, // 单飞
}

impl fmt::Display for SortieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortieType::Dual => write!(f, "Dual"),
            SortieType::Solo => write!(f, "Solo"),
        }
    }
}

// ==========================================
// 证照类型 (Document Type)
// ==========================================
// 反序列化宽松: 大小写不敏感，未知类型归入 Others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentType {
    #[serde(rename = "SPL")]
    Spl, // 学生驾驶员执照
    #[serde(rename = "FRTOL")]
    Frtol, // 无线电通话员执照
    #[serde(rename = "Medical")]
    Medical, // 体检合格证
    #[serde(rename = "Others")]
    Others, // 其他
}

impl DocumentType {
    /// 从字符串解析，未知类型归入 Others
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "SPL" => DocumentType::Spl,
            "FRTOL" => DocumentType::Frtol,
            "MEDICAL" => DocumentType::Medical,
            _ => DocumentType::Others,
        }
    }
}

impl<'de> Deserialize<'de> for DocumentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(DocumentType::parse(&raw))
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Spl => write!(f, "SPL"),
            DocumentType::Frtol => write!(f, "FRTOL"),
            DocumentType::Medical => write!(f, "Medical"),
            DocumentType::Others => write!(f, "Others"),
        }
    }
}

// ==========================================
// 到期状态 (Expiry Status)
// ==========================================
// 纯函数派生，不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ExpiryStatus {
    /// 已过期（days = 过期天数）
    Expired { days: i64 },
    /// 即将到期（days = 剩余天数，在预警窗口内）
    Expiring { days: i64 },
    /// 有效（days = 剩余天数）
    Valid { days: i64 },
    /// 未设置到期日
    NotSet,
}

impl ExpiryStatus {
    /// 天数差（NotSet 无天数）
    pub fn days(&self) -> Option<i64> {
        match self {
            ExpiryStatus::Expired { days }
            | ExpiryStatus::Expiring { days }
            | ExpiryStatus::Valid { days } => Some(*days),
            ExpiryStatus::NotSet => None,
        }
    }

    /// 状态标签
    pub fn label(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired { .. } => "expired",
            ExpiryStatus::Expiring { .. } => "expiring",
            ExpiryStatus::Valid { .. } => "valid",
            ExpiryStatus::NotSet => "not set",
        }
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::Expired { days } => write!(f, "expired ({} days ago)", days),
            ExpiryStatus::Expiring { days } => write!(f, "expiring ({} days left)", days),
            ExpiryStatus::Valid { days } => write!(f, "valid ({} days left)", days),
            ExpiryStatus::NotSet => write!(f, "not set"),
        }
    }
}
