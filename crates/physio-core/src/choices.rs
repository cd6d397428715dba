//! Allowed choices offered by the intake surface.
//!
//! The prompt builder never checks membership; these lists only drive the
//! intake template and the CLI's warnings about unlisted values.

use crate::field::IntakeField;
use crate::language::Language;

/// A selectable option with its label in each supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub zh: &'static str,
    pub en: &'static str,
}

impl Choice {
    const fn new(zh: &'static str, en: &'static str) -> Self {
        Self { zh, en }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::Chinese => self.zh,
            Language::English => self.en,
        }
    }

    /// Case-insensitive match against either label.
    pub fn matches(&self, value: &str) -> bool {
        let value = value.trim();
        value == self.zh || value.eq_ignore_ascii_case(self.en)
    }
}

const GENDER: &[Choice] = &[
    Choice::new("男", "Male"),
    Choice::new("女", "Female"),
    Choice::new("其他", "Other"),
];

const ACTIVITY_LEVEL: &[Choice] = &[
    Choice::new("久坐", "Sedentary"),
    Choice::new("低度", "Light"),
    Choice::new("中度", "Moderate"),
    Choice::new("高度", "High"),
];

const PAIN_DURATION: &[Choice] = &[
    Choice::new("最近", "Recent"),
    Choice::new("不足1个月", "Less than 1 month"),
    Choice::new("1至3个月", "1 to 3 months"),
    Choice::new("3至6个月", "3 to 6 months"),
    Choice::new("1年或更长", "1 year or longer"),
];

const PAIN_CHARACTER: &[Choice] = &[
    Choice::new("灼烧感", "Burning"),
    Choice::new("酸痛", "Aching"),
    Choice::new("刺痛", "Stabbing"),
    Choice::new("跳痛", "Throbbing"),
    Choice::new("麻木", "Numbness"),
    Choice::new("刺痒", "Tingling"),
    Choice::new("放射痛", "Radiating"),
];

const RELIEVING_FACTORS: &[Choice] = &[
    Choice::new("冰敷或热敷", "Ice or heat"),
    Choice::new("服用非处方止痛药", "Over-the-counter pain relievers"),
    Choice::new(
        "练习放松技巧（如深呼吸、冥想）",
        "Relaxation techniques (deep breathing, meditation)",
    ),
    Choice::new("轻柔拉伸或瑜伽", "Gentle stretching or yoga"),
    Choice::new("按摩受影响区域", "Massaging the affected area"),
    Choice::new("休息并避免加重活动", "Rest and avoiding aggravating activities"),
    Choice::new("使用局部止痛膏或凝胶", "Topical pain relief cream or gel"),
];

const EQUIPMENT_AT_HOME: &[Choice] = &[
    Choice::new("哑铃", "Dumbbells"),
    Choice::new("弹力带", "Resistance bands"),
    Choice::new("瑜伽垫", "Yoga mat"),
    Choice::new("健身球", "Exercise ball"),
    Choice::new("跳绳", "Jump rope"),
    Choice::new("跑步机", "Treadmill"),
    Choice::new("固定自行车", "Stationary bike"),
    Choice::new("壶铃", "Kettlebell"),
    Choice::new("引体向上杆", "Pull-up bar"),
    Choice::new("泡沫轴", "Foam roller"),
    Choice::new("筋膜枪", "Massage gun"),
];

/// Allowed choices for a choice field, `None` for free-form fields.
pub fn choices_for(field: IntakeField) -> Option<&'static [Choice]> {
    match field {
        IntakeField::Gender => Some(GENDER),
        IntakeField::ActivityLevel => Some(ACTIVITY_LEVEL),
        IntakeField::PainDuration => Some(PAIN_DURATION),
        IntakeField::PainCharacter => Some(PAIN_CHARACTER),
        IntakeField::RelievingFactors => Some(RELIEVING_FACTORS),
        IntakeField::EquipmentAtHome => Some(EQUIPMENT_AT_HOME),
        _ => None,
    }
}

/// Whether `value` is one of the listed choices for `field`.
///
/// Free-form fields accept anything.
pub fn is_listed_choice(field: IntakeField, value: &str) -> bool {
    match choices_for(field) {
        Some(choices) => choices.iter().any(|c| c.matches(value)),
        None => true,
    }
}
