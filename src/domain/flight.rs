// ==========================================
// 飞行日志本 - 航班领域模型
// ==========================================
// 职责: 规范化航班记录 (FlightRecord) 与录入草稿 (FlightDraft)
// 存储: `flights` 集合，整体 JSON 数组读写
// ==========================================

use crate::domain::types::{SortieType, TypeOfFlight};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// FlightRecord - 规范化航班记录
// ==========================================
// 不变量:
// - chocks_off/chocks_on 同时存在时 duration 由二者推导
// - sortie_type = Solo 时 instructor 必为空
// 旧数据兼容: chocks_off / chocks_on / FROM / To 字段名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    // ===== 主键与归属 =====
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>, // 为空 ⇒ 对所有用户可见

    // ===== 基础信息 =====
    pub date: String, // ISO 日期 YYYY-MM-DD
    pub aircraft: String,
    #[serde(default)]
    pub flight_number: String,

    // ===== 时间 =====
    #[serde(default, alias = "chocks_off")]
    pub chocks_off: String, // HH:MM
    #[serde(default, alias = "chocks_on")]
    pub chocks_on: String, // HH:MM

    // ===== 航段 =====
    #[serde(default, alias = "FROM")]
    pub from: String,
    #[serde(default, alias = "To")]
    pub to: String,

    // ===== 机组 =====
    #[serde(default)]
    pub trainee: String,
    #[serde(default)]
    pub instructor: String,

    // ===== 分类 =====
    #[serde(default)]
    pub type_of_flight: TypeOfFlight,
    #[serde(default)]
    pub sortie_type: SortieType,

    // ===== 派生 =====
    #[serde(default)]
    pub duration: String, // 小时，两位小数

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub imported: bool, // 仅导入适配器生成的记录为 true
}

impl FlightRecord {
    /// 解析日期（非 ISO 日期返回 None）
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// 是否对指定用户可见（本人记录或无归属的历史记录）
    pub fn is_visible_to(&self, user_id: Option<&str>) -> bool {
        match &self.user_id {
            None => true,
            Some(owner) => Some(owner.as_str()) == user_id,
        }
    }
}

// ==========================================
// FlightDraft - 航班录入草稿
// ==========================================
// 用途: 新增 / 编辑表单提交的字段集合
// id 为空 ⇒ 新增；否则合并到已有记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>, // 新增 ⇒ 记录归属；编辑 ⇒ 操作用户（只用于可见性校验）
    pub date: String,
    pub aircraft: String,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub chocks_off: String,
    #[serde(default)]
    pub chocks_on: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub trainee: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub type_of_flight: TypeOfFlight,
    #[serde(default)]
    pub sortie_type: SortieType,
    #[serde(default)]
    pub duration: String,
}

impl FlightDraft {
    /// 生成新记录（id / created_at 由调用方分配）
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> FlightRecord {
        FlightRecord {
            id,
            user_id: self.user_id,
            date: self.date,
            aircraft: self.aircraft,
            flight_number: self.flight_number,
            chocks_off: self.chocks_off,
            chocks_on: self.chocks_on,
            from: self.from,
            to: self.to,
            trainee: self.trainee,
            instructor: self.instructor,
            type_of_flight: self.type_of_flight,
            sortie_type: self.sortie_type,
            duration: self.duration,
            created_at,
            updated_at: None,
            imported: false,
        }
    }

    /// 将草稿字段合并进已有记录
    ///
    /// 保留: id / created_at / imported / user_id（编辑不改变归属）
    pub fn merge_into(self, existing: &mut FlightRecord, updated_at: DateTime<Utc>) {
        existing.date = self.date;
        existing.aircraft = self.aircraft;
        existing.flight_number = self.flight_number;
        existing.chocks_off = self.chocks_off;
        existing.chocks_on = self.chocks_on;
        existing.from = self.from;
        existing.to = self.to;
        existing.trainee = self.trainee;
        existing.instructor = self.instructor;
        existing.type_of_flight = self.type_of_flight;
        existing.sortie_type = self.sortie_type;
        existing.duration = self.duration;
        existing.updated_at = Some(updated_at);
    }
}
