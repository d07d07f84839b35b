use serde::{Deserialize, Serialize};

use crate::core::{DifferenceScore, PixelPoint};

/// One straight piece of the hidden segment, walked at constant arc speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealSegment {
    pub start: PixelPoint,
    pub end: PixelPoint,
    /// Inclination against the x axis; positive when the segment rises on screen.
    pub angle: f64,
    pub length: f64,
    /// Arc length added per processed frame.
    pub increment: f64,
}

impl RevealSegment {
    #[must_use]
    pub fn new(start: PixelPoint, end: PixelPoint, interval_width: f64, drawing_speed: f64) -> Self {
        let rise = end.y - start.y;
        let length = (rise * rise + interval_width * interval_width).sqrt();
        let magnitude = (interval_width / length).clamp(-1.0, 1.0).acos();
        let angle = if end.y <= start.y { magnitude } else { -magnitude };
        Self {
            start,
            end,
            angle,
            length,
            increment: length / interval_width * drawing_speed,
        }
    }

    /// Point `traveled` pixels along the segment from its start.
    #[must_use]
    pub fn project(&self, traveled: f64) -> PixelPoint {
        PixelPoint::new(
            self.start.x + self.angle.cos() * traveled,
            self.start.y - self.angle.sin() * traveled,
        )
    }
}

/// What one host frame did to the reveal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RevealStatus {
    /// No reveal in flight.
    Inactive,
    /// Frame arrived inside the minimum delay; nothing drawn.
    Waiting,
    /// Frame drawn; keep requesting frames.
    Running,
    /// Final frame drawn and the completion callback invoked.
    Completed(DifferenceScore),
}

impl RevealStatus {
    /// Whether the host should request another frame.
    #[must_use]
    pub fn wants_next_frame(self) -> bool {
        matches!(self, Self::Waiting | Self::Running)
    }
}

/// Progress of the reveal along the anchored hidden sequence.
///
/// Advancing is purely geometric: the visited path depends only on the
/// segments and the drawing speed, never on frame timing.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealAnimator {
    segments: Vec<RevealSegment>,
    segment_index: usize,
    traveled: f64,
    path: Vec<PixelPoint>,
    frame_delay_ms: f64,
    last_frame_ms: Option<f64>,
}

impl RevealAnimator {
    /// `sequence` starts with the anchor point followed by the hidden points.
    #[must_use]
    pub fn new(
        sequence: &[PixelPoint],
        interval_width: f64,
        drawing_speed: f64,
        frame_delay_ms: f64,
    ) -> Self {
        let segments = sequence
            .windows(2)
            .map(|pair| RevealSegment::new(pair[0], pair[1], interval_width, drawing_speed))
            .collect();
        Self {
            segments,
            segment_index: 0,
            traveled: 0.0,
            path: sequence.first().copied().into_iter().collect(),
            frame_delay_ms,
            last_frame_ms: None,
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[RevealSegment] {
        &self.segments
    }

    /// Points drawn so far, starting at the anchor.
    #[must_use]
    pub fn path(&self) -> &[PixelPoint] {
        &self.path
    }

    #[must_use]
    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Every segment has been walked to its end.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.segment_index >= self.segments.len()
    }

    /// Delay gate: returns `false` for frames that arrive too early.
    pub fn accepts_frame(&mut self, frame_time_ms: f64) -> bool {
        if let Some(last) = self.last_frame_ms {
            if frame_time_ms - last < self.frame_delay_ms {
                return false;
            }
        }
        self.last_frame_ms = Some(frame_time_ms);
        true
    }

    /// Moves the head one frame forward.
    ///
    /// When the head has covered the current segment, the segment end is
    /// pinned to its exact point and walking continues on the next one.
    pub fn advance(&mut self) {
        let Some(current) = self.segments.get(self.segment_index).copied() else {
            return;
        };
        if self.traveled >= current.length {
            self.place_head(current.end);
            self.segment_index += 1;
            self.traveled = 0.0;
        }
        if let Some(segment) = self.segments.get(self.segment_index).copied() {
            self.place_head(segment.project(self.traveled));
            self.traveled += segment.increment;
        }
    }

    fn place_head(&mut self, point: PixelPoint) {
        let slot = self.segment_index + 1;
        if slot < self.path.len() {
            self.path[slot] = point;
        } else {
            self.path.push(point);
        }
    }
}
