//! Frame number to millisecond conversion.

use std::num::NonZeroU32;
use std::ops::Range;

use crate::error::{ExportError, Result};

/// Converts authoring-tool frames into the millisecond timestamps the format stores.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameTime {
    fps: NonZeroU32,
}

impl FrameTime {
    /// Fails for a frame rate of zero; every other rate is accepted.
    pub fn new(fps: u32) -> Result<Self> {
        NonZeroU32::new(fps)
            .map(|fps| Self { fps })
            .ok_or(ExportError::InvalidFrameRate { fps })
    }

    pub fn fps(&self) -> u32 {
        self.fps.get()
    }

    /// `round(frame / fps * 1000)`, ties to even.
    #[inline]
    pub fn to_ms(&self, frame: i32) -> i32 {
        let ms = (f64::from(frame) / f64::from(self.fps.get())) * 1000.0;
        ms.round_ties_even() as i32
    }

    /// Sample frames of a clip (end exclusive) with their timestamps.
    pub fn clip_frames(&self, start_frame: i32, end_frame: i32) -> ClipFrames {
        let frames = start_frame..end_frame.max(start_frame);
        let times_ms = frames.clone().map(|f| self.to_ms(f)).collect();
        ClipFrames {
            frames,
            times_ms,
            end_ms: self.to_ms(end_frame),
        }
    }
}

/// Integer frames a clip samples, already converted to timestamps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipFrames {
    pub frames: Range<i32>,
    pub times_ms: Vec<i32>,
    pub end_ms: i32,
}

impl ClipFrames {
    pub fn len(&self) -> usize {
        self.times_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times_ms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_fps_rounds_to_nearest_ms() {
        let t = FrameTime::new(30).unwrap();
        assert_eq!(t.to_ms(0), 0);
        assert_eq!(t.to_ms(1), 33);
        assert_eq!(t.to_ms(2), 67);
        assert_eq!(t.to_ms(30), 1000);
    }

    #[test]
    fn half_ms_ties_go_to_even() {
        // 16 fps: one frame is 62.5 ms
        let t = FrameTime::new(16).unwrap();
        assert_eq!(t.to_ms(1), 62);
        assert_eq!(t.to_ms(3), 188);
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(matches!(
            FrameTime::new(0),
            Err(ExportError::InvalidFrameRate { fps: 0 })
        ));
    }

    #[test]
    fn reversed_clip_bounds_yield_no_frames() {
        let t = FrameTime::new(30).unwrap();
        let frames = t.clip_frames(10, 5);
        assert!(frames.is_empty());
        assert_eq!(frames.end_ms, t.to_ms(5));
    }
}
