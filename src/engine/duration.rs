// ==========================================
// 飞行日志本 - 飞行时长计算
// ==========================================
// 职责: 由挡轮挡撤除/放置时间 (HH:MM) 计算飞行小时数
// 规则: 放置时间早于撤除时间 ⇒ 视为次日（仅一次跨日）
// 精度: 两位小数，四舍五入
// ==========================================

use chrono::{NaiveTime, Timelike};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// 解析 HH:MM（空白或格式错误返回 None）
fn parse_clock(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M").ok()
}

/// 计算飞行时长（小时，两位小数）
///
/// # 返回
/// - Some(hours): 两个时间均有效
/// - None: 任一为空或无效
pub fn calculate_duration(chocks_off: &str, chocks_on: &str) -> Option<f64> {
    let off = parse_clock(chocks_off)?;
    let on = parse_clock(chocks_on)?;

    let off_minutes = (off.hour() * 60 + off.minute()) as i64;
    let mut on_minutes = (on.hour() * 60 + on.minute()) as i64;
    if on_minutes < off_minutes {
        on_minutes += MINUTES_PER_DAY;
    }

    let hours = (on_minutes - off_minutes) as f64 / 60.0;
    Some(round2(hours))
}

/// 计算飞行时长并格式化；无法计算时返回空字符串
pub fn duration_string(chocks_off: &str, chocks_on: &str) -> String {
    calculate_duration(chocks_off, chocks_on)
        .map(format_duration)
        .unwrap_or_default()
}

/// 两位小数格式化
pub fn format_duration(hours: f64) -> String {
    format!("{:.2}", hours)
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 宽松解析时长字符串（取前导数值部分，无效视为 0）
///
/// 兼容手工录入的 "1.5h"、" 2 " 等写法
pub fn parse_hours_lenient(value: &str) -> f64 {
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        return if v.is_finite() { v } else { 0.0 };
    }

    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        let accepted = match ch {
            '0'..='9' => true,
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            '+' | '-' if idx == 0 => true,
            _ => false,
        };
        if !accepted {
            break;
        }
        end = idx + ch.len_utf8();
    }

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
