//! # Gestures
//!
//! Turns a pointer drag into at most one [`Command::Step`].
//!
//! The axis is locked on the first movement beyond [`AXIS_LOCK_THRESHOLD`]
//! and kept for the rest of the drag. Vertical drags belong to page scrolling
//! and never navigate. A horizontal drag navigates when either the final
//! offset or the release velocity crosses its threshold: swiping left goes
//! to the next channel, swiping right to the previous one.
//!
//! Only active in [`PresentationMode::Compact`]. Wide layouts use the arrow
//! buttons instead and every drag callback is a no-op.

use crate::navigation::Command;

/// Logical pixels of movement before the axis is decided.
pub const AXIS_LOCK_THRESHOLD: f32 = 10.0;
/// Logical pixels of horizontal offset that commit a swipe.
pub const SWIPE_DISTANCE: f32 = 75.0;
/// Logical pixels per second that commit a swipe regardless of distance.
pub const SWIPE_VELOCITY: f32 = 500.0;
/// Viewports narrower than this use the compact, swipeable layout.
pub const COMPACT_MAX_WIDTH: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisLock {
    #[default]
    Unset,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    Compact,
    Wide,
}

impl PresentationMode {
    pub fn for_viewport_width(width: u32) -> Self {
        if width < COMPACT_MAX_WIDTH {
            PresentationMode::Compact
        } else {
            PresentationMode::Wide
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSample {
    pub axis: AxisLock,
    pub offset: Vec2,
    pub velocity: Vec2,
}

impl GestureSample {
    fn track(&mut self, offset: Vec2) {
        self.offset = offset;

        if self.axis != AxisLock::Unset {
            return;
        }

        let (abs_x, abs_y) = (offset.x.abs(), offset.y.abs());
        if abs_x.max(abs_y) > AXIS_LOCK_THRESHOLD {
            self.axis = if abs_x > abs_y {
                AxisLock::Horizontal
            } else {
                AxisLock::Vertical
            };
        }
    }
}

#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    mode: PresentationMode,
    session: Option<GestureSample>,
}

impl GestureInterpreter {
    pub fn new(mode: PresentationMode) -> Self {
        Self {
            mode,
            session: None,
        }
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    /// Layout changes abandon any drag in progress.
    pub fn set_mode(&mut self, mode: PresentationMode) {
        if self.mode != mode {
            self.session = None;
        }
        self.mode = mode;
    }

    pub fn session(&self) -> Option<&GestureSample> {
        self.session.as_ref()
    }

    pub fn drag_start(&mut self) {
        if self.mode == PresentationMode::Compact {
            self.session = Some(GestureSample::default());
        }
    }

    pub fn drag_move(&mut self, offset: Vec2) {
        if let Some(sample) = self.session.as_mut() {
            sample.track(offset);
        }
    }

    pub fn drag_end(&mut self, offset: Vec2, velocity: Vec2) -> Option<Command> {
        let mut sample = self.session.take()?;
        sample.track(offset);
        sample.velocity = velocity;

        if sample.axis != AxisLock::Horizontal {
            return None;
        }

        if sample.offset.x <= -SWIPE_DISTANCE || sample.velocity.x <= -SWIPE_VELOCITY {
            Some(Command::Step(1))
        } else if sample.offset.x >= SWIPE_DISTANCE || sample.velocity.x >= SWIPE_VELOCITY {
            Some(Command::Step(-1))
        } else {
            None
        }
    }
}
