use std::borrow::Cow;

use crate::{
    blend::crossfade,
    error::{SlideshowError, SlideshowResult},
    frame::Frame,
};

/// Timing parameters for one slideshow run.
///
/// Frame counts floor, matching `int(fps * seconds)`: a 0.9s hold at 1 fps
/// emits zero hold frames.
#[derive(Clone, Copy, Debug)]
pub struct SequenceTiming {
    pub fps: u32,
    pub hold_seconds: f64,
    pub transition_seconds: f64,
}

impl SequenceTiming {
    pub fn validate(&self) -> SlideshowResult<()> {
        if self.fps == 0 {
            return Err(SlideshowError::validation("fps must be non-zero"));
        }
        for (name, v) in [
            ("hold duration", self.hold_seconds),
            ("transition duration", self.transition_seconds),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SlideshowError::validation(format!(
                    "{name} must be a finite non-negative number of seconds"
                )));
            }
        }
        Ok(())
    }

    pub fn hold_frames(&self) -> u64 {
        (f64::from(self.fps) * self.hold_seconds) as u64
    }

    pub fn transition_frames(&self) -> u64 {
        (f64::from(self.fps) * self.transition_seconds) as u64
    }

    /// Total frames emitted for a timeline of `images` entries:
    /// `(n - 1) * (hold + transition) + hold`.
    pub fn total_frames(&self, images: usize) -> u64 {
        if images == 0 {
            return 0;
        }
        let n = images as u64;
        (n - 1) * (self.hold_frames() + self.transition_frames()) + self.hold_frames()
    }
}

/// Which part of the slideshow a frame belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Repeat of timeline image `image`, unmodified.
    Hold { image: usize },
    /// Crossfade step `step` (0-based) from image `from` to `from + 1`.
    Blend { from: usize, step: u64 },
}

/// One emitted frame plus its position in the slideshow.
#[derive(Clone, Debug)]
pub struct SequencedFrame<'a> {
    pub kind: FrameKind,
    pub frame: Cow<'a, Frame>,
}

enum Stage {
    Hold,
    Transition,
}

/// Lazy frame stream over a timeline of fitted images.
///
/// For each adjacent pair the current image is held for `hold_frames()`
/// repeats, then crossfaded into the next over `transition_frames()` steps
/// with `alpha = step / transition_frames` (alpha never reaches 1, so the
/// last blend frame is never identical to the incoming image). The final
/// image is held with no trailing transition. Hold frames borrow from the
/// timeline; only blend frames allocate, so memory stays at O(1) frames
/// regardless of timeline length.
pub struct FrameSequence<'a> {
    timeline: &'a [Frame],
    hold_frames: u64,
    transition_frames: u64,
    index: usize,
    emitted: u64,
    stage: Stage,
}

impl<'a> FrameSequence<'a> {
    /// Validates that the timeline is non-empty and that every frame shares
    /// the dimensions of the first.
    pub fn new(timeline: &'a [Frame], timing: SequenceTiming) -> SlideshowResult<Self> {
        timing.validate()?;
        let Some(first) = timeline.first() else {
            return Err(SlideshowError::validation(
                "timeline must contain at least one frame",
            ));
        };
        if let Some(odd) = timeline.iter().find(|f| f.size() != first.size()) {
            return Err(SlideshowError::validation(format!(
                "timeline frames must share dimensions: found {} and {}",
                first.size(),
                odd.size()
            )));
        }

        Ok(Self {
            timeline,
            hold_frames: timing.hold_frames(),
            transition_frames: timing.transition_frames(),
            index: 0,
            emitted: 0,
            stage: Stage::Hold,
        })
    }

    fn remaining(&self) -> u64 {
        let per_pair = self.hold_frames + self.transition_frames;
        let pairs_left = (self.timeline.len() - 1 - self.index) as u64;
        match self.stage {
            // Current hold, plus every later pair, plus the final hold burst
            // (already counted when this hold is the final one).
            Stage::Hold => pairs_left * per_pair + self.hold_frames - self.emitted,
            Stage::Transition => {
                (self.transition_frames - self.emitted)
                    + (pairs_left - 1) * per_pair
                    + self.hold_frames
            }
        }
    }
}

impl<'a> Iterator for FrameSequence<'a> {
    type Item = SequencedFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stage {
                Stage::Hold => {
                    if self.emitted < self.hold_frames {
                        self.emitted += 1;
                        return Some(SequencedFrame {
                            kind: FrameKind::Hold { image: self.index },
                            frame: Cow::Borrowed(&self.timeline[self.index]),
                        });
                    }
                    if self.index + 1 >= self.timeline.len() {
                        return None;
                    }
                    self.stage = Stage::Transition;
                    self.emitted = 0;
                }
                Stage::Transition => {
                    if self.emitted < self.transition_frames {
                        let step = self.emitted;
                        self.emitted += 1;
                        let alpha = step as f32 / self.transition_frames as f32;
                        let blended = crossfade(
                            &self.timeline[self.index],
                            &self.timeline[self.index + 1],
                            alpha,
                        );
                        return Some(SequencedFrame {
                            kind: FrameKind::Blend {
                                from: self.index,
                                step,
                            },
                            frame: Cow::Owned(blended),
                        });
                    }
                    self.index += 1;
                    self.stage = Stage::Hold;
                    self.emitted = 0;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.remaining();
        let lower = usize::try_from(rem).unwrap_or(usize::MAX);
        (lower, usize::try_from(rem).ok())
    }
}
