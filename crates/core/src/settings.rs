//! Global agent settings: config keys, option catalogs, style presets, and
//! video-settings validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Config keys
// ---------------------------------------------------------------------------

/// One configurable agent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigKey {
    Script,
    IndexProps,
    IndexScenes,
    IndexChars,
    Worldview,
    DetailProps,
    DetailScenes,
    DetailChars,
    Special3,
    Special2,
    Special1,
    ImgPromptProps,
    ImgPromptScenes,
    ImgPromptChars,
    Storyboard,
}

impl ConfigKey {
    /// Every key in display order.
    pub const ALL: [ConfigKey; 15] = [
        Self::Script,
        Self::IndexProps,
        Self::IndexScenes,
        Self::IndexChars,
        Self::Worldview,
        Self::DetailProps,
        Self::DetailScenes,
        Self::DetailChars,
        Self::Special3,
        Self::Special2,
        Self::Special1,
        Self::ImgPromptProps,
        Self::ImgPromptScenes,
        Self::ImgPromptChars,
        Self::Storyboard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Script => "剧本",
            Self::IndexProps => "索引提取-道具",
            Self::IndexScenes => "索引提取-场景",
            Self::IndexChars => "索引提取-人物",
            Self::Worldview => "世界观提取",
            Self::DetailProps => "资产详情-道具",
            Self::DetailScenes => "资产详情-场景",
            Self::DetailChars => "资产详情-人物",
            Self::Special3 => "特殊状态提示词-道具",
            Self::Special2 => "特殊状态提示词-场景",
            Self::Special1 => "特殊状态提示词-人物",
            Self::ImgPromptProps => "主状态提示词-道具",
            Self::ImgPromptScenes => "主状态提示词-场景",
            Self::ImgPromptChars => "主状态提示词-人物",
            Self::Storyboard => "分镜提示词",
        }
    }

    pub fn prompt_options(&self) -> &'static [&'static str] {
        match self {
            Self::Script => &["剧本分析-通用", "剧本分析-2D动画适配", "剧本分析-影视化写实", "剧本分析-3D视觉化", "剧本分析-结构化"],
            Self::IndexProps => &["索引提取-通用-道具", "索引提取-2D风格化物品", "索引提取-写实道具", "索引提取-3D资产规格", "索引提取-细粒度"],
            Self::IndexScenes => &["索引提取-通用-场景", "索引提取-2D背景绘制", "索引提取-实拍取景地", "索引提取-3D场景搭建", "索引提取-氛围优先"],
            Self::IndexChars => &["索引提取-通用-人物", "索引提取-二次元人设", "索引提取-真人选角", "索引提取-3D角色建模", "索引提取-性格侧写"],
            Self::Worldview => &["世界观提取-通用", "世界观提取-动画美术风格", "世界观提取-电影摄影风格", "世界观提取-3D渲染风格", "世界观提取-物理法则"],
            Self::DetailProps => &["资产详情-通用-道具", "资产详情-赛璐珞风格描述", "资产详情-电影级道具质感", "资产详情-PBR材质描述", "资产详情-高精度"],
            Self::DetailScenes => &["资产详情-通用-场景", "资产详情-新海诚/吉卜力风", "资产详情-好莱坞电影布光", "资产详情-UE5场景描述", "资产详情-概念设计"],
            Self::DetailChars => &["资产详情-通用-人物", "资产详情-日漫风格", "资产详情-真实摄影人像", "资产详情-皮克斯/迪士尼3D", "资产详情-DND卡片风格"],
            Self::Special3 => &["特殊状态(物)-通用", "特殊状态(物)-卡通道具(2D)", "特殊状态(物)-物理道具(真人)", "特殊状态(物)-高模道具(3D)"],
            Self::Special2 => &["特殊状态(景)-通用", "特殊状态(景)-手绘背景(2D)", "特殊状态(景)-实拍置景(真人)", "特殊状态(景)-环境渲染(3D)"],
            Self::Special1 => &["特殊状态(人)-通用", "特殊状态(人)-夸张表情(2D)", "特殊状态(人)-特效化妆(真人)", "特殊状态(人)-角色建模(3D)"],
            Self::ImgPromptProps => &["主状态(物)-通用", "主状态(物)-Niji动漫风", "主状态(物)-产品级写实", "主状态(物)-Octane渲染", "主状态(物)-单体透视"],
            Self::ImgPromptScenes => &["主状态(景)-通用", "主状态(景)-Niji动漫风", "主状态(景)-电影级写实", "主状态(景)-Unreal Engine 5", "主状态(景)-广角构图"],
            Self::ImgPromptChars => &["主状态(人)-通用", "主状态(人)-Niji动漫风", "主状态(人)-电影级写实", "主状态(人)-皮克斯风格", "主状态(人)-半身肖像"],
            Self::Storyboard => &["分镜-通用", "分镜-日式动画分镜", "分镜-电影实拍分镜", "分镜-3D动态预览", "分镜-广告分镜"],
        }
    }
}

// ---------------------------------------------------------------------------
// Models and defaults
// ---------------------------------------------------------------------------

pub const MODEL_OPTIONS: &[&str] = &[
    "Gemini 3 Flash (标准)",
    "Gemini 3 Pro (高智)",
    "Gemini Flash-Lite (极速)",
    "Gemini 2.5 Flash",
];

pub const DEFAULT_MODEL: &str = "Gemini 3 Flash (标准)";
pub const DEFAULT_PROMPT: &str = "默认提示词";

pub fn validate_model(model: &str) -> Result<(), CoreError> {
    if !MODEL_OPTIONS.contains(&model) {
        return Err(CoreError::Validation(format!(
            "Unknown model '{model}'. Must be one of: {}",
            MODEL_OPTIONS.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_prompt(key: ConfigKey, prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "Prompt for '{}' must not be empty",
            key.label()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StylePreset {
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "REAL")]
    Real,
    #[serde(rename = "3D")]
    ThreeD,
}

impl StylePreset {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TwoD => "2D 动画模式 (Anime/Cartoon)",
            Self::Real => "真人实拍模式 (Cinematic/Realism)",
            Self::ThreeD => "3D 渲染模式 (3D Render/CGI)",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::TwoD => &["2D", "动漫", "二次元", "动画", "日漫", "赛璐珞", "新海诚"],
            Self::Real => &["真人", "写实", "实拍", "影视", "电影", "Photo", "产品级"],
            Self::ThreeD => &["3D", "渲染", "UE5", "建模", "皮克斯", "Octane", "Unreal"],
        }
    }

    /// First prompt option of `key` matching a keyword, else the first option.
    pub fn prompt_for(&self, key: ConfigKey) -> &'static str {
        let options = key.prompt_options();
        options
            .iter()
            .find(|opt| self.keywords().iter().any(|kw| opt.contains(kw)))
            .or_else(|| options.first())
            .copied()
            .unwrap_or(DEFAULT_PROMPT)
    }
}

// ---------------------------------------------------------------------------
// Video settings
// ---------------------------------------------------------------------------

pub const DEFAULT_VIDEO_RATIO: &str = "16:9";
pub const DEFAULT_VIDEO_RESOLUTION: &str = "1080p";
pub const DEFAULT_VIDEO_DURATION: &str = "5s";

pub const VALID_RESOLUTIONS: &[&str] = &["480p", "720p", "1080p", "2K", "4K"];

static RATIO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[1-9][0-9]*:[1-9][0-9]*$").expect("ratio regex is valid")
});

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]*s$").expect("duration regex is valid"));

pub fn validate_video_settings(
    ratio: &str,
    resolution: &str,
    duration: &str,
) -> Result<(), CoreError> {
    if !RATIO_RE.is_match(ratio) {
        return Err(CoreError::Validation(format!(
            "ratio must look like W:H, got '{ratio}'"
        )));
    }
    if !VALID_RESOLUTIONS.contains(&resolution) {
        return Err(CoreError::Validation(format!(
            "Invalid resolution '{resolution}'. Must be one of: {}",
            VALID_RESOLUTIONS.join(", ")
        )));
    }
    if !DURATION_RE.is_match(duration) {
        return Err(CoreError::Validation(format!(
            "duration must look like 5s, got '{duration}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifteen_keys_with_options() {
        assert_eq!(ConfigKey::ALL.len(), 15);
        assert!(ConfigKey::ALL.iter().all(|k| !k.prompt_options().is_empty()));
    }

    #[test]
    fn key_serializes_camel_case() {
        let json = serde_json::to_string(&ConfigKey::ImgPromptChars).unwrap();
        assert_eq!(json, "\"imgPromptChars\"");
    }

    #[test]
    fn preset_picks_matching_option() {
        assert_eq!(StylePreset::TwoD.prompt_for(ConfigKey::Script), "剧本分析-2D动画适配");
        assert_eq!(StylePreset::Real.prompt_for(ConfigKey::Script), "剧本分析-影视化写实");
        assert_eq!(StylePreset::ThreeD.prompt_for(ConfigKey::DetailChars), "资产详情-皮克斯/迪士尼3D");
    }

    #[test]
    fn preset_serializes_short_code() {
        assert_eq!(serde_json::to_string(&StylePreset::TwoD).unwrap(), "\"2D\"");
        let parsed: StylePreset = serde_json::from_str("\"REAL\"").unwrap();
        assert_eq!(parsed, StylePreset::Real);
    }

    #[test]
    fn model_validation() {
        assert!(validate_model(DEFAULT_MODEL).is_ok());
        assert!(validate_model("gpt-9").is_err());
    }

    #[test]
    fn blank_prompt_rejected() {
        assert!(validate_prompt(ConfigKey::Script, " ").is_err());
        assert!(validate_prompt(ConfigKey::Script, DEFAULT_PROMPT).is_ok());
    }

    #[test]
    fn video_settings_validation() {
        assert!(validate_video_settings("16:9", "1080p", "5s").is_ok());
        assert!(validate_video_settings("9:16", "4K", "10s").is_ok());
        assert!(validate_video_settings("16x9", "1080p", "5s").is_err());
        assert!(validate_video_settings("16:9", "8K", "5s").is_err());
        assert!(validate_video_settings("16:9", "1080p", "5").is_err());
    }
}
