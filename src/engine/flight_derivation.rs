// ==========================================
// 飞行日志本 - 航班派生字段维护
// ==========================================
// 职责: 在新增 / 编辑 / 读取时维护航班不变量
// 1. 挡轮挡时间齐全 ⇒ duration 由时间推导，否则保留原值
// 2. 单飞 ⇒ instructor 清空
// ==========================================

use crate::domain::flight::FlightRecord;
use crate::domain::types::SortieType;
use crate::engine::duration::calculate_duration;
use crate::engine::duration::format_duration;

/// 航班派生服务
pub struct FlightDerivationService;

impl FlightDerivationService {
    pub fn new() -> Self {
        Self
    }

    /// 写入前强制不变量（新增 / 编辑）
    pub fn apply_invariants(&self, record: &mut FlightRecord) {
        if let Some(hours) = calculate_duration(&record.chocks_off, &record.chocks_on) {
            record.duration = format_duration(hours);
        }

        if record.sortie_type == SortieType::Solo {
            record.instructor.clear();
        }
    }

    /// 读取时回填：时间齐全但 duration 缺失
    pub fn backfill_duration(&self, record: &mut FlightRecord) {
        if !record.duration.trim().is_empty() {
            return;
        }
        if let Some(hours) = calculate_duration(&record.chocks_off, &record.chocks_on) {
            record.duration = format_duration(hours);
        }
    }
}

impl Default for FlightDerivationService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flight::FlightDraft;
    use chrono::Utc;

    fn record(off: &str, on: &str, duration: &str) -> FlightRecord {
        FlightDraft {
            date: "2024-01-01".to_string(),
            aircraft: "C152".to_string(),
            chocks_off: off.to_string(),
            chocks_on: on.to_string(),
            duration: duration.to_string(),
            instructor: "J. Smith".to_string(),
            ..Default::default()
        }
        .into_record("f1".to_string(), Utc::now())
    }

    #[test]
    fn test_duration_recomputed_from_chocks() {
        let service = FlightDerivationService::new();
        let mut r = record("10:00", "11:30", "9.99");
        service.apply_invariants(&mut r);
        assert_eq!(r.duration, "1.50");
    }

    #[test]
    fn test_manual_duration_kept_without_chocks() {
        let service = FlightDerivationService::new();
        let mut r = record("", "11:30", "1.2");
        service.apply_invariants(&mut r);
        assert_eq!(r.duration, "1.2");
    }

    #[test]
    fn test_solo_clears_instructor() {
        let service = FlightDerivationService::new();
        let mut r = record("", "", "");
        r.sortie_type = SortieType::Solo;
        service.apply_invariants(&mut r);
        assert!(r.instructor.is_empty());

        let mut dual = record("", "", "");
        service.apply_invariants(&mut dual);
        assert_eq!(dual.instructor, "J. Smith");
    }

    #[test]
    fn test_backfill_only_when_missing() {
        let service = FlightDerivationService::new();
        let mut missing = record("08:00", "09:00", "");
        service.backfill_duration(&mut missing);
        assert_eq!(missing.duration, "1.00");

        let mut present = record("08:00", "09:00", "0.9");
        service.backfill_duration(&mut present);
        assert_eq!(present.duration, "0.9");
    }
}
