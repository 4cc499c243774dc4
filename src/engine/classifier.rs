// ==========================================
// 飞行日志本 - 航班分类器
// ==========================================
// 职责:
// 1. 课目描述 (exercise) → 飞行类型
// 2. 副驾驶/学员 + 机长 → 学员 / 架次类型 / 教员
// 规则: 关键字区分大小写，按表顺序命中即返回
// ==========================================

use crate::domain::types::{SortieType, TypeOfFlight};
use serde::{Deserialize, Serialize};

/// 课目关键字表（顺序即优先级）
pub const EXERCISE_KEYWORDS: &[(&[&str], TypeOfFlight)] = &[
    (&["Ccts", "App", "Ldgs"], TypeOfFlight::CctsAndLdg),
    (&["General", "Line Flying"], TypeOfFlight::GeneralFlying),
    (&["Cross-country"], TypeOfFlight::CrossCountry),
    (&["Instrument", "Simulated"], TypeOfFlight::InstrumentFlying),
    (&["CHECK", "Check"], TypeOfFlight::Check),
];

/// 课目描述分类；无命中或空白默认 GeneralFlying
pub fn classify_exercise(text: &str) -> TypeOfFlight {
    EXERCISE_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(_, kind)| *kind)
        .unwrap_or(TypeOfFlight::GeneralFlying)
}

/// 机组分配结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewAssignment {
    pub trainee: String,
    pub sortie_type: SortieType,
    pub instructor: String,
}

/// 机组分类
///
/// - 副驾驶/学员为空 ⇒ 单飞：学员 = 机长，教员为空
/// - 否则 ⇒ 带飞：学员 = 副驾驶/学员，教员 = 机长
pub fn classify_crew(co_pilot_or_student: &str, pilot_in_command: &str) -> CrewAssignment {
    let student = co_pilot_or_student.trim();
    if student.is_empty() {
        CrewAssignment {
            trainee: pilot_in_command.trim().to_string(),
            sortie_type: SortieType::Solo,
            instructor: String::new(),
        }
    } else {
        CrewAssignment {
            trainee: student.to_string(),
            sortie_type: SortieType::Dual,
            instructor: pilot_in_command.trim().to_string(),
        }
    }
}
