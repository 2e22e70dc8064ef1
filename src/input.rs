//! Pointer and touch input, and the press/drag/release stroke machine.

use crate::surface::Surface;
use crate::types::Point;

/// Reveal sampling runs on every Nth move.
pub const SAMPLE_EVERY: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Move,
    End,
}

/// Where an event came from. Coordinates are in client space.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Pointer(Point),
    /// Active contacts; only the first one is used.
    Touch(Vec<Point>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub phase: Phase,
    pub source: Source,
}

impl InputEvent {
    pub fn pointer(phase: Phase, x: f32, y: f32) -> Self {
        Self { phase, source: Source::Pointer(Point::new(x, y)) }
    }

    pub fn touch(phase: Phase, touches: Vec<Point>) -> Self {
        Self { phase, source: Source::Touch(touches) }
    }

    /// Position relative to `origin`. None for a touch event without contacts.
    pub fn local_position(&self, origin: Point) -> Option<Point> {
        let client = match &self.source {
            Source::Pointer(p) => *p,
            Source::Touch(touches) => *touches.first()?,
        };
        Some(client.relative_to(origin))
    }
}

/// Whether the handler took the event (and suppressed the default action).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Ignored,
    Consumed,
}

impl EventResponse {
    pub fn default_prevented(self) -> bool {
        self == EventResponse::Consumed
    }
}

/// How strokes are laid down. Erasing always uses destination-out
/// with round caps and joins, so only the width varies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub width: f32,
}

#[derive(Debug, Default)]
pub struct InputTracker {
    scratching: bool,
    move_count: u64,
    /// Last point of the open path.
    pen: Option<Point>,
    brush: Option<Brush>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scratching(&self) -> bool {
        self.scratching
    }

    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    /// Idle -> Scratching. Stamps a dot so a tap without drag still erases.
    pub fn press(&mut self, surface: &mut Surface, at: Point, brush: Brush) {
        self.scratching = true;
        self.brush = Some(brush);
        surface.erase_disc(at, brush.width);
        self.pen = Some(at);
    }

    /// Extends the stroke to `to`. Returns true when the reveal ratio is due a sample.
    pub fn drag(&mut self, surface: &mut Surface, to: Point) -> bool {
        if !self.scratching {
            return false;
        }
        let (Some(from), Some(brush)) = (self.pen, self.brush) else {
            return false;
        };
        surface.erase_segment(from, to, brush.width);
        self.pen = Some(to);

        self.move_count += 1;
        self.move_count % SAMPLE_EVERY == 0
    }

    /// Scratching -> Idle.
    pub fn release(&mut self) {
        self.scratching = false;
        self.pen = None;
    }
}
