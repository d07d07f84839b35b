use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{PixelPoint, Viewport};

/// Pointer sample as delivered by the host, in displayed (CSS/logical) pixels.
///
/// `client_width`/`client_height` are the displayed size of the surface; they
/// scale the offset back to canvas pixels when the surface is stretched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub offset_x: f64,
    pub offset_y: f64,
    pub client_width: f64,
    pub client_height: f64,
}

impl PointerEvent {
    #[must_use]
    pub fn new(offset_x: f64, offset_y: f64, client_width: f64, client_height: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            client_width,
            client_height,
        }
    }

    /// Event from a surface displayed at its native canvas size.
    #[must_use]
    pub fn unscaled(x: f64, y: f64, viewport: Viewport) -> Self {
        Self::new(x, y, f64::from(viewport.width), f64::from(viewport.height))
    }

    #[must_use]
    pub fn canvas_position(self, viewport: Viewport) -> PixelPoint {
        let scale = |offset: f64, canvas: u32, client: f64| {
            if client > 0.0 && client.is_finite() {
                offset * (f64::from(canvas) / client)
            } else {
                offset
            }
        };
        PixelPoint::new(
            scale(self.offset_x, viewport.width, self.client_width),
            scale(self.offset_y, viewport.height, self.client_height),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureState {
    /// Waiting for a press over the hidden segment.
    Idle,
    /// Pressed inside the guess area; no move seen yet.
    Armed,
    /// Moves are being turned into guess points.
    Capturing,
    /// Released; a new press over the hidden segment re-arms.
    Released,
    /// Reveal started; pointer input is ignored from now on.
    Disabled,
}

impl CaptureState {
    #[must_use]
    pub fn accepts_moves(self) -> bool {
        matches!(self, Self::Armed | Self::Capturing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuessPoint {
    pub x: f64,
    pub y: Option<f64>,
}

/// The user's guess: anchor followed by one slot per hidden point.
///
/// Slots fill left to right; slot `i` only takes a value once slot `i - 1`
/// holds one. The anchor is always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGuess {
    points: Vec<GuessPoint>,
}

impl UserGuess {
    #[must_use]
    pub fn new(anchor: PixelPoint, hidden: &[PixelPoint]) -> Self {
        let mut points = Vec::with_capacity(hidden.len() + 1);
        points.push(GuessPoint {
            x: anchor.x,
            y: Some(anchor.y),
        });
        points.extend(hidden.iter().map(|point| GuessPoint {
            x: point.x,
            y: None,
        }));
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[GuessPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn ys(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|point| point.y).collect()
    }

    /// Set points in order, as drawn by the dashed guess line.
    #[must_use]
    pub fn filled_points(&self) -> Vec<PixelPoint> {
        self.points
            .iter()
            .filter_map(|point| point.y.map(|y| PixelPoint::new(point.x, y)))
            .collect()
    }

    /// The trailing slot, once the user has dragged all the way across.
    #[must_use]
    pub fn last_filled(&self) -> Option<PixelPoint> {
        let last = self.points.last()?;
        last.y.map(|y| PixelPoint::new(last.x, y))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.points.iter().all(|point| point.y.is_some())
    }

    /// Applies one pointer sample and returns how many slots took its y.
    ///
    /// A slot is hit when the pointer is within `half_interval` of its x. The
    /// scan runs left to right, so a slot filled by this sample can unlock
    /// its successor within the same call.
    pub fn apply_pointer(
        &mut self,
        pointer: PixelPoint,
        half_interval: f64,
        y_range: (f64, f64),
    ) -> usize {
        let (min_y, max_y) = y_range;
        if pointer.y < min_y || pointer.y > max_y {
            return 0;
        }
        let mut updated = 0;
        for index in 1..self.points.len() {
            let in_bin = (pointer.x - self.points[index].x).abs() <= half_interval;
            if in_bin && self.points[index - 1].y.is_some() {
                self.points[index].y = Some(pointer.y);
                updated += 1;
            }
        }
        updated
    }
}

/// Geometry that gates arming and filling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureBounds {
    pub viewport: Viewport,
    /// Horizontal press area over the hidden segment.
    pub arm_x: (f64, f64),
    /// Vertical range (top, bottom) accepted for presses and fills.
    pub y_range: (f64, f64),
    pub half_interval: f64,
    /// Moves this close to a canvas edge release the capture.
    pub release_margin: f64,
}

impl CaptureBounds {
    #[must_use]
    pub fn contains_press(&self, point: PixelPoint) -> bool {
        point.x >= self.arm_x.0
            && point.x <= self.arm_x.1
            && point.y >= self.y_range.0
            && point.y <= self.y_range.1
    }

    #[must_use]
    pub fn near_edge(&self, point: PixelPoint) -> bool {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        point.x >= width - self.release_margin
            || point.x <= self.release_margin
            || point.y >= height - self.release_margin
            || point.y <= self.release_margin
    }
}

/// Result of one move delivered while capturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub updated: usize,
    pub released: bool,
}

/// Pointer state machine driving `UserGuess` updates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerCapture {
    state: CaptureState,
    guess: UserGuess,
    bounds: CaptureBounds,
}

impl PointerCapture {
    #[must_use]
    pub fn new(guess: UserGuess, bounds: CaptureBounds) -> Self {
        Self {
            state: CaptureState::Idle,
            guess,
            bounds,
        }
    }

    #[must_use]
    pub fn state(&self) -> CaptureState {
        self.state
    }

    #[must_use]
    pub fn guess(&self) -> &UserGuess {
        &self.guess
    }

    #[must_use]
    pub fn bounds(&self) -> CaptureBounds {
        self.bounds
    }

    /// Returns `true` when the press armed the capture.
    pub fn on_pointer_down(&mut self, point: PixelPoint) -> bool {
        match self.state {
            CaptureState::Idle | CaptureState::Released if self.bounds.contains_press(point) => {
                self.state = CaptureState::Armed;
                true
            }
            _ => false,
        }
    }

    /// Returns `None` when no capture is attached.
    pub fn on_pointer_move(&mut self, point: PixelPoint) -> Option<MoveOutcome> {
        if !self.state.accepts_moves() {
            return None;
        }
        self.state = CaptureState::Capturing;

        let released = self.bounds.near_edge(point);
        let updated =
            self.guess
                .apply_pointer(point, self.bounds.half_interval, self.bounds.y_range);
        trace!(x = point.x, y = point.y, updated, "guess pointer move");
        if released {
            self.state = CaptureState::Released;
        }
        Some(MoveOutcome { updated, released })
    }

    /// Returns `true` when an active capture was released.
    pub fn on_pointer_up(&mut self) -> bool {
        if self.state.accepts_moves() {
            self.state = CaptureState::Released;
            return true;
        }
        false
    }

    pub fn disable(&mut self) {
        self.state = CaptureState::Disabled;
    }
}
