use chain::{Chain, VideoConfig};

/// Overlay progress past which every gear shows its direction arrow and
/// the question mark on the last gear goes away.
const REVEAL_PROGRESS: f64 = 0.7;
/// Overlay progress past which the last gear is highlighted.
const HIGHLIGHT_PROGRESS: f64 = 0.9;

/// One frame of the ground-truth animation.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Frame {
    /// how far the chain has turned, applied with alternating sign
    pub offset: f64,
    pub show_all_directions: bool,
    pub question_on_last: bool,
    pub highlight_last: bool,
}

impl Frame {
    pub fn initial() -> Self {
        Self {
            offset: 0.,
            show_all_directions: false,
            question_on_last: true,
            highlight_last: false,
        }
    }

    pub fn final_state(offset: f64) -> Self {
        Self {
            offset,
            show_all_directions: true,
            question_on_last: false,
            highlight_last: true,
        }
    }

    fn rotating(progress: f64, total: f64) -> Self {
        Self {
            offset: total * progress,
            show_all_directions: progress > REVEAL_PROGRESS,
            question_on_last: progress < REVEAL_PROGRESS,
            highlight_last: progress > HIGHLIGHT_PROGRESS,
        }
    }

    /// Rotation of every gear in `chain` in this frame.
    pub fn gear_angles(&self, chain: &Chain) -> Vec<f64> {
        (0..chain.len())
            .map(|i| chain.gear_angle(i, self.offset))
            .collect()
    }
}

/// The full timeline: held initial frames, the rotation, held final
/// frames.
pub fn schedule(video: &VideoConfig, total_rotation: f64) -> Vec<Frame> {
    let final_hold = video.hold_frames * video.final_hold_multiplier;
    let mut frames = Vec::with_capacity(video.hold_frames + video.rotation_frames + final_hold);

    frames.extend(std::iter::repeat(Frame::initial()).take(video.hold_frames));

    let n = video.rotation_frames;
    for k in 0..n {
        let progress = if n > 1 {
            k as f64 / (n - 1) as f64
        } else {
            1.
        };
        frames.push(Frame::rotating(progress, total_rotation));
    }

    frames.extend(std::iter::repeat(Frame::final_state(total_rotation)).take(final_hold));
    frames
}

/// Length of the timeline in seconds.
pub fn duration_secs(video: &VideoConfig, frames: usize) -> f64 {
    if video.fps == 0 {
        return 0.;
    }
    frames as f64 / video.fps as f64
}
