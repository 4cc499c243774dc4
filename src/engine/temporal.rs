// ==========================================
// 飞行日志本 - 日期/时间规范化
// ==========================================
// 职责: 异构日期/时间 → ISO 日期 (YYYY-MM-DD) / 24 小时制 (HH:MM)
// 红线: 尽力而为，绝不报错；无法解析的输入原样返回
// ==========================================
// 支持:
// - 文本日期 D/M/YYYY、D-M-YYYY（按 日/月/年 解释）
// - 其他常见文本日期格式
// - 电子表格日期序列号（纪元 1899-12-30）
// - 文本时间中的 H:MM / HH:MM 片段
// - 日内小数时间（0.5 = 12:00）
// ==========================================

use crate::domain::import::{format_number, RawCell};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// 电子表格日期序列号纪元（1900 闰年缺陷的通用修正）
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// 一天的秒数
const SECONDS_PER_DAY: f64 = 86_400.0;

/// 浮点尾差容忍（秒）
const FLOAT_SLACK_SECONDS: f64 = 1e-6;

/// 标准日期格式（按顺序尝试）
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// 标准日期时间格式（取日期部分）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

fn day_month_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2})([/-])(\d{1,2})([/-])(\d{4})$").expect("日/月/年 正则非法")
    })
}

fn clock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("时间正则非法"))
}

// ==========================================
// 日期规范化
// ==========================================

/// 规范化日期单元格 → YYYY-MM-DD
///
/// # 规则
/// - Number: 电子表格序列号，纪元 1899-12-30 + floor(serial) 天
/// - Text: 见 [`normalize_date_str`]
/// - Empty: 空字符串
pub fn normalize_date(cell: &RawCell) -> String {
    match cell {
        RawCell::Empty => String::new(),
        RawCell::Number(serial) => serial_to_date(*serial)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| format_number(*serial)),
        RawCell::Text(text) => normalize_date_str(text),
    }
}

/// 规范化文本日期
///
/// D/M/YYYY 与 D-M-YYYY 一律按 日/月/年 解释（不是 月/日）。
/// 其余文本尝试标准格式；均失败则原样返回。
pub fn normalize_date_str(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    // 两个分隔符必须一致（5/3-2024 不算 日/月/年）
    let dmy = day_month_year_pattern()
        .captures(trimmed)
        .filter(|caps| caps[2] == caps[4]);
    if let Some(caps) = dmy {
        let day = caps[1].parse::<u32>().ok();
        let month = caps[3].parse::<u32>().ok();
        let year = caps[5].parse::<i32>().ok();

        return match (year, month, day) {
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| input.to_string()),
            _ => input.to_string(),
        };
    }

    parse_standard_date(trimmed)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| input.to_string())
}

/// 标准日期解析（ISO / RFC 3339 / 常见英文格式）
pub fn parse_standard_date(input: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// 电子表格序列号 → 日期（仅取整数部分）
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

// ==========================================
// 时间规范化
// ==========================================

/// 规范化时间单元格 → HH:MM
///
/// # 规则
/// - Number: 日内小数（只取小数部分，日期时间序列号同样适用）
/// - Text: 取第一个 H:MM / HH:MM 片段并补零；无匹配原样返回
/// - Empty: 空字符串
pub fn normalize_time(cell: &RawCell) -> String {
    match cell {
        RawCell::Empty => String::new(),
        RawCell::Number(fraction) => day_fraction_to_time(*fraction)
            .unwrap_or_else(|| format_number(*fraction)),
        RawCell::Text(text) => normalize_time_str(text),
    }
}

/// 规范化文本时间
pub fn normalize_time_str(input: &str) -> String {
    match clock_pattern().captures(input) {
        Some(caps) => format!("{:0>2}:{}", &caps[1], &caps[2]),
        None => input.to_string(),
    }
}

/// 日内小数 → HH:MM
///
/// 小时 = floor(frac × 24)，分钟 = floor((frac × 24 − 小时) × 60)。
/// 按秒向下取整；加微小偏移吸收 0.4305555… 这类浮点尾差，不会进位到下一分钟。
pub fn day_fraction_to_time(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let fraction = value.rem_euclid(1.0);
    let seconds = ((fraction * SECONDS_PER_DAY + FLOAT_SLACK_SECONDS).floor() as i64)
        .min(SECONDS_PER_DAY as i64 - 1);

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    Some(format!("{:02}:{:02}", hours, minutes))
}
