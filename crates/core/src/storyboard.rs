//! Storyboard splitting, shot constants and validation, mock video URLs.

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Shot constants
// ---------------------------------------------------------------------------

/// Duration assigned to every shot produced by storyboard generation.
pub const DEFAULT_SHOT_DURATION_SECS: f64 = 5.0;

/// Upper bound on a single shot's duration.
pub const MAX_SHOT_DURATION_SECS: f64 = 600.0;

/// Marker that opens a frame block in a generated script.
pub const FRAME_MARKER: &str = "[画面";

pub const SHOT_FAILURE_MESSAGE: &str = "视频生成失败";
pub const SHOT_FAILURE_DETAIL: &str = "渲染节点返回错误：模型推理超时，请稍后重试。";

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Split a script into shot descriptions.
///
/// Scripts containing `[画面 …]` blocks yield one shot per block; the block
/// body (header dropped) becomes the description and runs until the next
/// block, a `#` heading, or a `---` rule. Other scripts yield one shot per
/// non-empty paragraph.
pub fn split_into_shots(script: &str) -> Vec<String> {
    if script.contains(FRAME_MARKER) {
        split_frame_blocks(script)
    } else {
        split_paragraphs(script)
    }
}

fn split_frame_blocks(script: &str) -> Vec<String> {
    let mut shots = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in script.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(FRAME_MARKER) {
            if let Some(block) = current.take() {
                shots.push(finish_block(block));
            }
            current = Some((trimmed.to_string(), Vec::new()));
        } else if trimmed.starts_with('#') || trimmed.starts_with("---") {
            if let Some(block) = current.take() {
                shots.push(finish_block(block));
            }
        } else if let Some((_, body)) = current.as_mut() {
            if !trimmed.is_empty() {
                body.push(trimmed.to_string());
            }
        }
    }
    if let Some(block) = current.take() {
        shots.push(finish_block(block));
    }
    shots
}

fn finish_block((header, body): (String, Vec<String>)) -> String {
    if body.is_empty() {
        header
    } else {
        body.join("\n")
    }
}

fn split_paragraphs(script: &str) -> Vec<String> {
    let mut shots = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    for line in script.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !paragraph.is_empty() {
                shots.push(paragraph.join("\n"));
                paragraph.clear();
            }
        } else {
            paragraph.push(trimmed);
        }
    }
    if !paragraph.is_empty() {
        shots.push(paragraph.join("\n"));
    }
    shots
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Shot durations must be finite, positive, and at most [`MAX_SHOT_DURATION_SECS`].
pub fn validate_shot_duration(duration: f64) -> Result<(), CoreError> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(CoreError::Validation(format!(
            "shot duration must be a positive number, got {duration}"
        )));
    }
    if duration > MAX_SHOT_DURATION_SECS {
        return Err(CoreError::Validation(format!(
            "shot duration must be <= {MAX_SHOT_DURATION_SECS}, got {duration}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

/// Mock video URL of the `version`-th render of a shot (1-based).
pub fn shot_video_url(shot_id: DbId, version: usize) -> String {
    format!("https://mock-video.local/shots/{shot_id}/v{version}.mp4")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::converted_script;

    #[test]
    fn frame_blocks_become_shots() {
        let script = "# 标题\n\n[画面 001]\n描述：宇宙。\n解说词：\"开始\"\n\n[画面 002]\n描述：行星。\n---\n尾声";
        let shots = split_into_shots(script);
        assert_eq!(shots, vec!["描述：宇宙。\n解说词：\"开始\"", "描述：行星。"]);
    }

    #[test]
    fn empty_frame_block_keeps_header() {
        let shots = split_into_shots("[画面 007]\n\n[画面 008]\n内容");
        assert_eq!(shots, vec!["[画面 007]", "内容"]);
    }

    #[test]
    fn paragraphs_become_shots() {
        let shots = split_into_shots("第一段\n继续\n\n\n第二段\n");
        assert_eq!(shots, vec!["第一段\n继续", "第二段"]);
    }

    #[test]
    fn blank_script_yields_nothing() {
        assert!(split_into_shots("  \n\n ").is_empty());
    }

    #[test]
    fn converted_script_splits_into_every_frame() {
        // 3 prologue frames, 3 per act, 2 epilogue frames.
        let shots = split_into_shots(&converted_script("now"));
        assert_eq!(shots.len(), 3 + 3 * 20 + 2);
    }

    #[test]
    fn duration_validation() {
        assert!(validate_shot_duration(5.0).is_ok());
        assert!(validate_shot_duration(0.0).is_err());
        assert!(validate_shot_duration(f64::NAN).is_err());
        assert!(validate_shot_duration(601.0).is_err());
    }

    #[test]
    fn video_url_format() {
        assert_eq!(shot_video_url(12, 3), "https://mock-video.local/shots/12/v3.mp4");
    }
}
