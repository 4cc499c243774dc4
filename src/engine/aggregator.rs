// ==========================================
// 飞行日志本 - 统计聚合引擎
// ==========================================
// 职责: 驾驶舱 / 飞行日志 / 证照列表所需的派生统计
// 红线: 纯函数，只读记录，不访问存储
// ==========================================
// 输出:
// - 总/带飞/单飞小时数
// - 最近 N 条航班
// - 证照到期状态（过期 / 即将到期 / 有效 / 未设置）
// ==========================================

use crate::domain::document::DocumentRecord;
use crate::domain::flight::FlightRecord;
use crate::domain::types::{DocumentType, ExpiryStatus, SortieType};
use crate::engine::duration::parse_hours_lenient;
use crate::engine::temporal::normalize_date_str;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

/// 默认到期预警窗口（天）
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

/// 默认驾驶舱最近航班条数
pub const DEFAULT_RECENT_FLIGHTS: usize = 5;

// ==========================================
// 输出结构
// ==========================================

/// 小时数汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HourTotals {
    pub total: f64,
    pub dual: f64,
    pub solo: f64,
}

/// 证照 + 到期状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentWithStatus {
    pub document: DocumentRecord,
    pub expiry: ExpiryStatus,
}

/// 体检合格证有效性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalValidity {
    pub document_id: String,
    pub expiry_date: Option<String>,
    pub expiry: ExpiryStatus,
}

/// 驾驶舱统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_flights: usize,
    pub hours: HourTotals,
    pub recent_flights: Vec<FlightRecord>,
    pub medical_validity: Option<MedicalValidity>,
}

/// 飞行日志（时间正序 + 合计行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLog {
    pub rows: Vec<FlightRecord>,
    pub totals: HourTotals,
}

// ==========================================
// LogbookAggregator - 统计聚合引擎
// ==========================================
pub struct LogbookAggregator {
    expiry_warning_days: i64,
}

impl LogbookAggregator {
    /// 创建聚合引擎
    ///
    /// # 参数
    /// - expiry_warning_days: 到期预警窗口（天），含边界
    pub fn new(expiry_warning_days: i64) -> Self {
        Self {
            expiry_warning_days,
        }
    }

    // ==========================================
    // 小时数
    // ==========================================

    /// 汇总小时数（按架次类型分组）
    ///
    /// duration 宽松解析，非数值计 0。
    /// 求和前对数值排序，保证结果与输入顺序无关。
    #[instrument(skip(self, flights), fields(count = flights.len()))]
    pub fn aggregate_hours(&self, flights: &[FlightRecord]) -> HourTotals {
        let mut all = Vec::with_capacity(flights.len());
        let mut dual = Vec::new();
        let mut solo = Vec::new();

        for flight in flights {
            let hours = parse_hours_lenient(&flight.duration);
            all.push(hours);
            match flight.sortie_type {
                SortieType::Dual => dual.push(hours),
                SortieType::Solo => solo.push(hours),
            }
        }

        HourTotals {
            total: stable_sum(all),
            dual: stable_sum(dual),
            solo: stable_sum(solo),
        }
    }

    // ==========================================
    // 排序 / 筛选
    // ==========================================

    /// 最近 N 条航班（日期倒序）
    pub fn recent_flights(&self, flights: &[FlightRecord], n: usize) -> Vec<FlightRecord> {
        let mut sorted = flights.to_vec();
        sorted.sort_by(|a, b| compare_dates_desc(a.parsed_date(), b.parsed_date()));
        sorted.truncate(n);
        sorted
    }

    /// 日期倒序（航班列表）
    pub fn sort_newest_first(&self, flights: &[FlightRecord]) -> Vec<FlightRecord> {
        self.recent_flights(flights, flights.len())
    }

    /// 日期正序（飞行日志）
    pub fn sort_chronological(&self, flights: &[FlightRecord]) -> Vec<FlightRecord> {
        let mut sorted = flights.to_vec();
        sorted.sort_by(|a, b| compare_dates(a.parsed_date(), b.parsed_date()));
        sorted
    }

    /// 关键字搜索（机型 / 航班号 / 起降地，不区分大小写）
    pub fn search_flights(&self, flights: &[FlightRecord], term: &str) -> Vec<FlightRecord> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return flights.to_vec();
        }

        flights
            .iter()
            .filter(|f| {
                [&f.aircraft, &f.flight_number, &f.from, &f.to]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// 飞行日志：时间正序 + 合计
    pub fn flight_log(&self, flights: &[FlightRecord]) -> FlightLog {
        FlightLog {
            rows: self.sort_chronological(flights),
            totals: self.aggregate_hours(flights),
        }
    }

    // ==========================================
    // 证照到期
    // ==========================================

    /// 到期状态判定
    ///
    /// # 规则
    /// - delta = 到期日 − 今天（天）
    /// - delta < 0 ⇒ Expired { |delta| }
    /// - 0 ≤ delta ≤ 预警窗口 ⇒ Expiring
    /// - 其余 ⇒ Valid
    /// - 空白或无法解析 ⇒ NotSet
    pub fn classify_expiry(&self, expiry_date: Option<&str>, today: NaiveDate) -> ExpiryStatus {
        let expiry = match expiry_date.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => {
                match NaiveDate::parse_from_str(&normalize_date_str(raw), "%Y-%m-%d") {
                    Ok(date) => date,
                    Err(_) => return ExpiryStatus::NotSet,
                }
            }
            None => return ExpiryStatus::NotSet,
        };

        let delta = (expiry - today).num_days();
        if delta < 0 {
            ExpiryStatus::Expired { days: delta.abs() }
        } else if delta <= self.expiry_warning_days {
            ExpiryStatus::Expiring { days: delta }
        } else {
            ExpiryStatus::Valid { days: delta }
        }
    }

    /// 证照列表：签发日期倒序 + 到期状态
    pub fn document_statuses(
        &self,
        documents: &[DocumentRecord],
        today: NaiveDate,
    ) -> Vec<DocumentWithStatus> {
        let mut sorted = documents.to_vec();
        sorted.sort_by(|a, b| compare_dates_desc(a.parsed_issue_date(), b.parsed_issue_date()));

        sorted
            .into_iter()
            .map(|document| {
                let expiry = self.classify_expiry(document.expiry_date.as_deref(), today);
                DocumentWithStatus { document, expiry }
            })
            .collect()
    }

    /// 体检合格证有效性（取第一份 Medical 证照）
    pub fn medical_validity(
        &self,
        documents: &[DocumentRecord],
        today: NaiveDate,
    ) -> Option<MedicalValidity> {
        documents
            .iter()
            .find(|d| d.doc_type == DocumentType::Medical)
            .map(|d| MedicalValidity {
                document_id: d.id.clone(),
                expiry_date: d.expiry_date.clone(),
                expiry: self.classify_expiry(d.expiry_date.as_deref(), today),
            })
    }

    // ==========================================
    // 驾驶舱
    // ==========================================

    /// 驾驶舱统计
    pub fn dashboard_stats(
        &self,
        flights: &[FlightRecord],
        documents: &[DocumentRecord],
        today: NaiveDate,
        recent_n: usize,
    ) -> DashboardStats {
        DashboardStats {
            total_flights: flights.len(),
            hours: self.aggregate_hours(flights),
            recent_flights: self.recent_flights(flights, recent_n),
            medical_validity: self.medical_validity(documents, today),
        }
    }
}

impl Default for LogbookAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRY_WARNING_DAYS)
    }
}

/// 小时数展示（一位小数）
pub fn format_hours(hours: f64) -> String {
    format!("{:.1}", hours)
}

/// 排序后求和（与输入顺序无关）
fn stable_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    values.into_iter().sum()
}

/// 日期比较：无法解析的日期排在有效日期之后
fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 日期倒序比较：无法解析的日期同样排在最后
fn compare_dates_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        _ => compare_dates(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flight::FlightDraft;
    use crate::domain::types::TypeOfFlight;
    use chrono::Utc;

    fn flight(id: &str, date: &str, sortie: SortieType, duration: &str) -> FlightRecord {
        FlightDraft {
            date: date.to_string(),
            aircraft: format!("AC-{}", id),
            sortie_type: sortie,
            type_of_flight: TypeOfFlight::GeneralFlying,
            duration: duration.to_string(),
            ..Default::default()
        }
        .into_record(id.to_string(), Utc::now())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_aggregate_hours_by_sortie() {
        let flights = vec![
            flight("1", "2024-01-01", SortieType::Dual, "1.50"),
            flight("2", "2024-01-02", SortieType::Solo, "0.75"),
            flight("3", "2024-01-03", SortieType::Dual, ""),
            flight("4", "2024-01-04", SortieType::Solo, "abc"),
            flight("5", "2024-01-05", SortieType::Dual, "2.00"),
        ];

        let totals = LogbookAggregator::default().aggregate_hours(&flights);
        assert_eq!(totals.total, 4.25);
        assert_eq!(totals.dual, 3.5);
        assert_eq!(totals.solo, 0.75);
    }

    #[test]
    fn test_aggregate_hours_order_independent() {
        let mut flights = vec![
            flight("1", "2024-01-01", SortieType::Dual, "0.10"),
            flight("2", "2024-01-02", SortieType::Solo, "0.20"),
            flight("3", "2024-01-03", SortieType::Dual, "0.30"),
            flight("4", "2024-01-04", SortieType::Dual, "1.17"),
        ];
        let aggregator = LogbookAggregator::default();
        let forward = aggregator.aggregate_hours(&flights);
        flights.reverse();
        let backward = aggregator.aggregate_hours(&flights);
        flights.swap(0, 2);
        let shuffled = aggregator.aggregate_hours(&flights);

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
        assert_eq!(forward, aggregator.aggregate_hours(&flights));
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(
            LogbookAggregator::default().aggregate_hours(&[]),
            HourTotals::default()
        );
    }

    #[test]
    fn test_recent_flights() {
        let flights = vec![
            flight("a", "2024-01-05", SortieType::Dual, "1"),
            flight("b", "2024-03-01", SortieType::Dual, "1"),
            flight("c", "not a date", SortieType::Dual, "1"),
            flight("d", "2024-02-10", SortieType::Dual, "1"),
        ];

        let recent = LogbookAggregator::default().recent_flights(&flights, 2);
        let ids: Vec<&str> = recent.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);

        let all = LogbookAggregator::default().recent_flights(&flights, 10);
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].id, "c");
    }

    #[test]
    fn test_sort_chronological() {
        let flights = vec![
            flight("a", "2024-03-01", SortieType::Dual, "1"),
            flight("b", "2024-01-01", SortieType::Dual, "1"),
        ];
        let log = LogbookAggregator::default().flight_log(&flights);
        assert_eq!(log.rows[0].id, "b");
        assert_eq!(log.rows[1].id, "a");
        assert_eq!(log.totals.total, 2.0);
    }

    #[test]
    fn test_search_flights() {
        let mut f1 = flight("1", "2024-01-01", SortieType::Dual, "1");
        f1.aircraft = "Cessna 152".to_string();
        let mut f2 = flight("2", "2024-01-02", SortieType::Dual, "1");
        f2.from = "EGKB".to_string();
        let flights = vec![f1, f2];
        let aggregator = LogbookAggregator::default();

        assert_eq!(aggregator.search_flights(&flights, "cessna").len(), 1);
        assert_eq!(aggregator.search_flights(&flights, "egkb")[0].id, "2");
        assert_eq!(aggregator.search_flights(&flights, "").len(), 2);
        assert!(aggregator.search_flights(&flights, "zzz").is_empty());
    }

    #[test]
    fn test_classify_expiry() {
        let aggregator = LogbookAggregator::default();
        let today = date("2024-01-01");

        assert_eq!(
            aggregator.classify_expiry(Some("2020-01-01"), today),
            ExpiryStatus::Expired { days: 1461 }
        );
        assert_eq!(
            aggregator.classify_expiry(Some("2024-01-01"), today),
            ExpiryStatus::Expiring { days: 0 }
        );
        assert_eq!(
            aggregator.classify_expiry(Some("2024-01-31"), today),
            ExpiryStatus::Expiring { days: 30 }
        );
        assert_eq!(
            aggregator.classify_expiry(Some("2024-02-01"), today),
            ExpiryStatus::Valid { days: 31 }
        );
        assert_eq!(aggregator.classify_expiry(None, today), ExpiryStatus::NotSet);
        assert_eq!(aggregator.classify_expiry(Some("  "), today), ExpiryStatus::NotSet);
        assert_eq!(aggregator.classify_expiry(Some("soon"), today), ExpiryStatus::NotSet);
    }

    #[test]
    fn test_classify_expiry_custom_window() {
        let aggregator = LogbookAggregator::new(7);
        let today = date("2024-01-01");
        assert_eq!(
            aggregator.classify_expiry(Some("2024-01-10"), today),
            ExpiryStatus::Valid { days: 9 }
        );
    }

    #[test]
    fn test_dashboard_stats_medical() {
        let aggregator = LogbookAggregator::default();
        let today = date("2024-06-01");
        let flights = vec![flight("1", "2024-05-01", SortieType::Solo, "1.25")];
        let documents = vec![
            DocumentRecord {
                id: "spl".to_string(),
                user_id: None,
                name: "SPL".to_string(),
                doc_type: DocumentType::Spl,
                issue_date: "2023-01-01".to_string(),
                expiry_date: None,
                number: String::new(),
                issuer: String::new(),
                notes: String::new(),
                created_at: Utc::now(),
            },
            DocumentRecord {
                id: "med".to_string(),
                user_id: None,
                name: "Class 2".to_string(),
                doc_type: DocumentType::Medical,
                issue_date: "2023-06-01".to_string(),
                expiry_date: Some("2024-06-21".to_string()),
                number: String::new(),
                issuer: String::new(),
                notes: String::new(),
                created_at: Utc::now(),
            },
        ];

        let stats = aggregator.dashboard_stats(&flights, &documents, today, 5);
        assert_eq!(stats.total_flights, 1);
        assert_eq!(stats.hours.solo, 1.25);
        assert_eq!(stats.recent_flights.len(), 1);
        let medical = stats.medical_validity.unwrap();
        assert_eq!(medical.document_id, "med");
        assert_eq!(medical.expiry, ExpiryStatus::Expiring { days: 20 });

        let statuses = aggregator.document_statuses(&documents, today);
        assert_eq!(statuses[0].document.id, "med");
        assert_eq!(statuses[1].expiry, ExpiryStatus::NotSet);
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(4.26), "4.3");
        assert_eq!(format_hours(3.04), "3.0");
        assert_eq!(format_hours(0.0), "0.0");
    }
}
