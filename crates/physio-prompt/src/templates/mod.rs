//! Template sections for prompt construction.

use physio_core::{IntakeField, Language};

/// Intake fields grouped into the four template sections, in display order.
pub const SECTIONS: [&[IntakeField]; 4] = [
    &[
        IntakeField::Age,
        IntakeField::Gender,
        IntakeField::Occupation,
        IntakeField::ActivityLevel,
    ],
    &[
        IntakeField::PainLocation,
        IntakeField::PainIntensity,
        IntakeField::PainDuration,
        IntakeField::PainCharacter,
        IntakeField::AggravatingFactors,
        IntakeField::RelievingFactors,
        IntakeField::OtherComments,
    ],
    &[
        IntakeField::PreviousInjuries,
        IntakeField::ChronicConditions,
        IntakeField::Medications,
    ],
    &[
        IntakeField::FunctionalLimitations,
        IntakeField::PatientGoals,
        IntakeField::EquipmentAtHome,
    ],
];

/// Render the task description.
pub fn render_task(language: Language) -> &'static str {
    match language {
        Language::Chinese => {
            r#"任务：
你是一位专门从事物理治疗评估的AI助手。你的任务是使用提供的信息为我进行初步评估。分析数据并生成一个简明的总结，包括我的病情、可能的诊断以及进一步评估或治疗的建议。
使用以下信息进行你的评估："#
        }
        Language::English => {
            r#"Task:
You are an AI assistant specialized in physiotherapy assessment. Your task is to give me a preliminary assessment using the information provided. Analyze the data and produce a concise summary covering my condition, possible diagnoses, and recommendations for further assessment or treatment.
Use the following information for your assessment:"#
        }
    }
}

/// Heading for one of the [`SECTIONS`], numbered from 1.
pub fn section_heading(index: usize, language: Language) -> &'static str {
    match (index, language) {
        (0, Language::Chinese) => "1. 我的人口统计数据：",
        (1, Language::Chinese) => "2. 我的疼痛信息：",
        (2, Language::Chinese) => "3. 我的病史：",
        (_, Language::Chinese) => "4. 个性化和目标：",
        (0, Language::English) => "1. My demographics:",
        (1, Language::English) => "2. My pain information:",
        (2, Language::English) => "3. My medical history:",
        (_, Language::English) => "4. Personalization and goals:",
    }
}

/// Label shown before a field value in the prompt.
pub fn field_label(field: IntakeField, language: Language) -> &'static str {
    match language {
        Language::Chinese => match field {
            IntakeField::Age => "年龄",
            IntakeField::Gender => "性别",
            IntakeField::Occupation => "职业",
            IntakeField::ActivityLevel => "活动水平",
            IntakeField::PainLocation => "部位",
            IntakeField::PainIntensity => "强度（0-10分制）",
            IntakeField::PainDuration => "持续时间",
            IntakeField::PainCharacter => "特征（例如，尖锐、钝痛、酸痛）",
            IntakeField::AggravatingFactors => "加重因素",
            IntakeField::RelievingFactors => "缓解因素",
            IntakeField::OtherComments => "其他评论",
            IntakeField::PreviousInjuries => "既往伤病",
            IntakeField::ChronicConditions => "慢性病",
            IntakeField::Medications => "药物",
            IntakeField::FunctionalLimitations => "我的功能限制",
            IntakeField::PatientGoals => "我的目标",
            IntakeField::EquipmentAtHome => "拥有的设备",
        },
        Language::English => match field {
            IntakeField::Age => "Age",
            IntakeField::Gender => "Gender",
            IntakeField::Occupation => "Occupation",
            IntakeField::ActivityLevel => "Activity level",
            IntakeField::PainLocation => "Location",
            IntakeField::PainIntensity => "Intensity (0-10 scale)",
            IntakeField::PainDuration => "Duration",
            IntakeField::PainCharacter => "Character (e.g. sharp, dull, aching)",
            IntakeField::AggravatingFactors => "Aggravating factors",
            IntakeField::RelievingFactors => "Relieving factors",
            IntakeField::OtherComments => "Other comments",
            IntakeField::PreviousInjuries => "Previous injuries",
            IntakeField::ChronicConditions => "Chronic conditions",
            IntakeField::Medications => "Medications",
            IntakeField::FunctionalLimitations => "My functional limitations",
            IntakeField::PatientGoals => "My goals",
            IntakeField::EquipmentAtHome => "Equipment available",
        },
    }
}

/// Label/value separator.
pub fn label_separator(language: Language) -> &'static str {
    match language {
        Language::Chinese => "：",
        Language::English => ": ",
    }
}

/// Separator between items of a multi-choice value.
pub fn list_separator(language: Language) -> &'static str {
    match language {
        Language::Chinese => "、",
        Language::English => ", ",
    }
}

/// Text embedded in place of an empty or null value.
pub fn placeholder(language: Language) -> &'static str {
    match language {
        Language::Chinese => "未提供",
        Language::English => "Not provided",
    }
}

/// Render the report instructions with the five required output sections.
pub fn render_report_instructions(language: Language) -> &'static str {
    match language {
        Language::Chinese => {
            r#"评估报告：

根据以上信息，生成一份评估报告，包括以下内容：

1. 病情总结（2-3句话）
2. 任何需要立即医疗关注的红旗警示或担忧（如果适用）。如果不适用，请说明没有即时的红旗警示或担忧。
3. 诊断可能性表格，列出诊断及其概率（高、中、低）（列出2-3种可能性）。
4. 可以在家进行的进一步评估建议，以及如何解读评估结果（3-4点）。
5. 根据个性化和目标部分，建议4-5个个性化治疗计划，如推荐的运动、康复活动。如果适用，建议重复次数和重量。按最推荐程度（从高到低）排列活动。

以清晰、简洁的方式呈现你的评估，适合我和物理治疗师审阅。记住保持专业的语气，并强调这是基于提供信息的初步评估，而不是最终诊断。

使用格式良好的Markdown生成文本，在必要时使用粗体和表格使评估更清晰。

回答："#
        }
        Language::English => {
            r#"Assessment report:

Based on the information above, produce an assessment report containing:

1. A summary of the condition (2-3 sentences).
2. Any red-flag warnings or concerns that need immediate medical attention, if applicable. If none apply, state that there are no immediate red flags or concerns.
3. A table of possible diagnoses with their likelihood (high, medium, low), listing 2-3 possibilities.
4. Suggestions for further self-assessment that can be done at home, and how to interpret the results (3-4 points).
5. Based on the personalization and goals section, 4-5 personalized treatment plan items such as recommended exercises and rehabilitation activities. Where applicable, suggest repetitions and weights. Order the activities from most to least recommended.

Present the assessment clearly and concisely, suitable for review by me and a physiotherapist. Keep a professional tone and stress that this is a preliminary assessment based on the information provided, not a final diagnosis.

Write well-formatted Markdown, using bold text and tables where they make the assessment clearer.

Answer:"#
        }
    }
}
