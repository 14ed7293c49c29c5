//! Editor timeline layout.

use serde::Serialize;

/// Horizontal scale of the timeline.
pub const PIXELS_PER_SECOND: f64 = 20.0;

/// Narrowest a clip is ever drawn.
pub const MIN_CLIP_WIDTH_PX: f64 = 60.0;

pub fn clip_width_px(duration_secs: f64) -> f64 {
    (duration_secs * PIXELS_PER_SECOND).max(MIN_CLIP_WIDTH_PX)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClipPlacement {
    pub index: usize,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub width_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    /// `false` when there is nothing to render yet.
    pub connected: bool,
    pub total_duration_secs: f64,
    pub total_width_px: f64,
    pub placements: Vec<ClipPlacement>,
}

/// Lay clips end to end in order.
pub fn layout(durations: &[f64]) -> TimelineLayout {
    let mut start = 0.0;
    let mut total_width = 0.0;
    let placements = durations
        .iter()
        .enumerate()
        .map(|(index, &duration)| {
            let width = clip_width_px(duration);
            let placement = ClipPlacement {
                index,
                start_secs: start,
                duration_secs: duration,
                width_px: width,
            };
            start += duration;
            total_width += width;
            placement
        })
        .collect();

    TimelineLayout {
        connected: !durations.is_empty(),
        total_duration_secs: start,
        total_width_px: total_width,
        placements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_clips_get_minimum_width() {
        assert_eq!(clip_width_px(1.0), 60.0);
        assert_eq!(clip_width_px(5.0), 100.0);
    }

    #[test]
    fn clips_are_placed_end_to_end() {
        let layout = layout(&[5.0, 2.0, 10.0]);
        let starts: Vec<f64> = layout.placements.iter().map(|p| p.start_secs).collect();
        assert_eq!(starts, vec![0.0, 5.0, 7.0]);
        assert_eq!(layout.total_duration_secs, 17.0);
        assert_eq!(layout.total_width_px, 100.0 + 60.0 + 200.0);
        assert!(layout.connected);
    }

    #[test]
    fn empty_timeline_is_disconnected() {
        let layout = layout(&[]);
        assert!(!layout.connected);
        assert!(layout.placements.is_empty());
        assert_eq!(layout.total_duration_secs, 0.0);
    }
}
