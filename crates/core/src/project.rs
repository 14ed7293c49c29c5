//! Project script types, naming, draft validation, and the mock script converter.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Stored script type of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScriptType {
    Narrative,
    Plot,
    Commentary,
}

impl ScriptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Narrative => "NARRATIVE",
            Self::Plot => "PLOT",
            Self::Commentary => "COMMENTARY",
        }
    }
}

impl std::fmt::Display for ScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Script kind chosen in the creation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftKind {
    Commentary,
    Plot,
}

impl DraftKind {
    /// Plot drafts are stored as narrative projects.
    pub fn stored_type(&self) -> ScriptType {
        match self {
            Self::Commentary => ScriptType::Commentary,
            Self::Plot => ScriptType::Narrative,
        }
    }

    /// Only a commentary that is not pre-written goes through conversion.
    pub fn needs_conversion(&self, pre_written: bool) -> bool {
        matches!(self, Self::Commentary) && !pre_written
    }
}

/// Name given to a freshly created project, e.g. `新项目 2024/3/7`.
pub fn new_project_name(date: NaiveDate) -> String {
    format!("新项目 {}/{}/{}", date.year(), date.month(), date.day())
}

/// Mocked body of an uploaded script file.
pub fn uploaded_file_content(file_name: &str) -> String {
    format!("(模拟读取的文件内容: {file_name}) \n\n这是从文件中读取的原始解说词文本。")
}

/// Resolve draft content: an uploaded file replaces whatever was typed.
pub fn resolve_draft_content(content: &str, uploaded_file_name: Option<&str>) -> String {
    match uploaded_file_name {
        Some(name) if !name.trim().is_empty() => uploaded_file_content(name),
        _ => content.to_string(),
    }
}

pub fn validate_script_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Script content must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Project name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Number of repeated acts in the converted documentary script.
pub const CONVERTED_SCRIPT_ACTS: usize = 20;

/// Produce the long documentary script returned by the mock converter.
pub fn converted_script(generated_at: &str) -> String {
    let mut script = format!(
        "# 纪录片：星际文明的崛起与陨落 (AI 剧本转换版)\n\
         生成时间: {generated_at}\n\
         预估时长: 45分钟\n\
         \n\
         ---\n\
         \n\
         ## 序幕：起源\n\
         \n\
         [画面 001]\n\
         描述：深邃的宇宙背景，无数星系像尘埃一样散落。镜头缓慢推进，穿过猎户座星云，色彩斑斓的气体云在黑暗中涌动。\n\
         运镜：推镜头 (Dolly In) -> 缓慢\n\
         音效：低沉的宇宙背景噪音，逐渐增强的宏大管弦乐。\n\
         解说词：\"在一百三十八亿年前，这里什么都没有。没有光，没有时间，只有无尽的虚空。直到那个奇点的爆发，赋予了这一切意义。\"\n\
         \n\
         [画面 002]\n\
         描述：一颗原始的行星正在形成，岩浆在大地上奔流，天空中陨石如雨点般落下。\n\
         运镜：俯拍 (High Angle) -> 快速掠过地表\n\
         音效：巨大的撞击声，岩浆流动的滋滋声。\n\
         解说词：\"混乱，是秩序的母亲。在数十亿年的混沌中，生命所需的元素正在熔炉中锻造。\"\n\
         \n\
         ---\n\
         \n\
         ## 第一章：觉醒\n\
         \n\
         [画面 003]\n\
         描述：原始海洋的特写，单细胞生物在显微镜视角下分裂、游动。\n\
         解说词：\"最初的火花微不足道，但在浩瀚的时间长河中，它点燃了进化的引信。\"\n\n"
    );

    for i in 1..=CONVERTED_SCRIPT_ACTS {
        let even = i % 2 == 0;
        let spire = if even { "水晶" } else { "金属" };
        let clothing = if even { "极简主义的长袍" } else { "外骨骼装甲" };
        let eyes = if even { "智慧与平静" } else { "狂热与不安" };
        let thought = if even {
            "他们在思考存在的意义"
        } else {
            "他们在渴望更多的征服"
        };
        script.push_str(&format!(
            "\n## 第{i}幕：文明的第 {i} 次跃迁\n\
             \n\
             [画面 {a:03}]\n\
             描述：全景镜头展示第 {i} 代文明的城市中心。巨大的{spire}尖塔直插云霄，飞行载具在空中形成光流。\n\
             运镜：环绕镜头 (Orbit)\n\
             解说词：\"当历史的车轮滚动到第 {i} 个纪元，我们以为我们已经掌握了真理。能源不再是问题，戴森球包裹了恒星，每一焦耳的能量都被贪婪地汲取。\"\n\
             \n\
             [画面 {b:03}]\n\
             描述：街道上的行人特写。他们穿着{clothing}，眼神中透露出{eyes}。\n\
             解说词：\"但技术不仅仅带来了繁荣。看这些面孔，{thought}。这就是矛盾的螺旋，也是毁灭的伏笔。\"\n\
             \n\
             [画面 {c:03}]\n\
             描述：虚拟会议室内部。全息投影显示着星图，红色的警告区域正在扩散。\n\
             解说词：\"警报声最初是微弱的，被繁荣的喧嚣所掩盖。直到不可逆转的临界点到来。\"\n",
            a = i + 3,
            b = i + 4,
            c = i + 5,
        ));
    }

    script.push_str(
        "\n---\n\
         \n\
         ## 终章：轮回\n\
         \n\
         [画面 099]\n\
         描述：废墟。曾经辉煌的城市现在被植被覆盖（或被沙尘掩埋）。镜头拉远，看到这颗星球孤独地悬浮在太空中。\n\
         解说词：\"一切归于寂静。但这不是结束，只是另一个开始。星尘会再次聚集，新的恒星会再次点燃。\"\n\
         \n\
         [画面 100]\n\
         描述：黑屏。屏幕中央出现一行白字：“致所有探索者”。\n\
         解说词：(留白 3秒) \"我们终将在群星间重逢。\"\n",
    );

    script
}
