use tracing::{debug, trace, warn};

use crate::core::{
    CoordinateMapper, Dataset, DifferenceScore, FieldGeometry, MappedDataset, Viewport,
    difference_score, final_score,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{CaptureBounds, CaptureState, PointerCapture, PointerEvent, UserGuess};
use crate::render::{RenderFrame, Renderer};

use super::chart_scene::ChartScene;
use super::reveal::{RevealAnimator, RevealStatus};
use super::validation::validate_config;
use super::GuessChartConfig;

/// Moves landing this close to a canvas edge end the capture.
const RELEASE_MARGIN_PX: f64 = 3.0;

type ScoreCallback = Box<dyn FnMut(&DifferenceScore)>;
type RevealCallback = Box<dyn FnOnce(DifferenceScore)>;

/// Interactive guess chart bound to one drawing surface.
///
/// The chart owns all of its mutable state; hosts drive it from a single
/// timeline by forwarding pointer events and one `tick` per presented frame.
pub struct GuessChart<R: Renderer> {
    renderer: R,
    config: GuessChartConfig,
    dataset: Dataset,
    mapper: CoordinateMapper,
    mapped: MappedDataset,
    capture: PointerCapture,
    live_score: Option<DifferenceScore>,
    score_callback: Option<ScoreCallback>,
    reveal: Option<RevealAnimator>,
    reveal_callback: Option<RevealCallback>,
}

impl<R: Renderer> GuessChart<R> {
    /// Validates inputs, maps the dataset and paints the initial state.
    pub fn new(renderer: R, config: GuessChartConfig, dataset: Dataset) -> ChartResult<Self> {
        validate_config(&config)?;
        dataset.validate()?;

        let geometry = FieldGeometry::new(
            config.viewport(),
            config.field_offset,
            config.indent_to_active_area,
        )?;
        let mapper = CoordinateMapper::from_dataset(geometry, &dataset)?;
        let mapped = mapper.map_dataset(&dataset)?;

        let hidden = mapped.hidden_group();
        let guess = UserGuess::new(mapped.anchor(), &hidden.points);
        let (hidden_min_x, hidden_max_x) = hidden.x_span().unwrap_or_default();
        let bounds = CaptureBounds {
            viewport: config.viewport(),
            arm_x: (hidden_min_x - mapper.interval_width(), hidden_max_x),
            y_range: (geometry.end_y, geometry.start_y),
            half_interval: mapper.interval_width() / 2.0,
            release_margin: RELEASE_MARGIN_PX,
        };

        debug!(
            chart = %config.chart_name,
            groups = dataset.groups.len(),
            points = dataset.total_point_count(),
            interval_width = mapper.interval_width(),
            "guess chart created"
        );

        let mut chart = Self {
            renderer,
            config,
            dataset,
            mapper,
            mapped,
            capture: PointerCapture::new(guess, bounds),
            live_score: None,
            score_callback: None,
            reveal: None,
            reveal_callback: None,
        };
        chart.render()?;
        Ok(chart)
    }

    /// Registers the callback fired after every guess update that yields a score.
    ///
    /// A later registration replaces the earlier one.
    pub fn on_score_available(&mut self, callback: impl FnMut(&DifferenceScore) + 'static) {
        self.score_callback = Some(Box::new(callback));
    }

    /// Starts the one-shot reveal of the hidden segment.
    ///
    /// Pointer capture is switched off for good. `on_complete` receives the
    /// final score once `tick` has walked the whole segment.
    pub fn start_reveal(
        &mut self,
        on_complete: impl FnOnce(DifferenceScore) + 'static,
    ) -> ChartResult<()> {
        if self.reveal.is_some() {
            warn!(chart = %self.config.chart_name, "reveal requested while one is running");
            return Err(ChartError::RevealInProgress);
        }
        if self.config.reveal_requires_score && self.live_score.is_none() {
            warn!(chart = %self.config.chart_name, "reveal requested before any score");
            return Err(ChartError::RevealNotReady);
        }

        self.capture.disable();
        let animator = RevealAnimator::new(
            &self.mapped.hidden_sequence(),
            self.mapper.interval_width(),
            self.config.drawing_speed,
            self.config.frame_delay_ms,
        );
        debug!(
            chart = %self.config.chart_name,
            segments = animator.segments().len(),
            "reveal started"
        );
        self.reveal = Some(animator);
        self.reveal_callback = Some(Box::new(on_complete));
        Ok(())
    }

    /// Processes one presented frame of the reveal.
    ///
    /// Hosts keep scheduling frames while the returned status
    /// `wants_next_frame()`. A failed frame abandons the reveal and drops its
    /// completion callback, so `start_reveal` may be called again.
    pub fn tick(&mut self, frame_time_ms: f64) -> ChartResult<RevealStatus> {
        let Some(mut animator) = self.reveal.take() else {
            return Ok(RevealStatus::Inactive);
        };
        let status = self.step_reveal(&mut animator, frame_time_ms);
        match &status {
            Ok(status) if status.wants_next_frame() => self.reveal = Some(animator),
            Ok(_) => {}
            Err(err) => {
                warn!(chart = %self.config.chart_name, %err, "reveal abandoned");
                self.reveal_callback = None;
            }
        }
        status
    }

    fn step_reveal(
        &mut self,
        animator: &mut RevealAnimator,
        frame_time_ms: f64,
    ) -> ChartResult<RevealStatus> {
        if !animator.accepts_frame(frame_time_ms) {
            return Ok(RevealStatus::Waiting);
        }

        if animator.is_exhausted() {
            let mut frame = self.reveal_frame(animator);
            self.scene().append_final_marker(&mut frame);
            self.renderer.render(&frame)?;

            let score = final_score(
                &self.mapped.hidden_sequence(),
                &self.capture.guess().ys(),
                self.mapper.interval_width(),
            );
            debug!(chart = %self.config.chart_name, score = %score, "reveal completed");
            if let Some(callback) = self.reveal_callback.take() {
                callback(score);
            }
            return Ok(RevealStatus::Completed(score));
        }

        animator.advance();
        trace!(
            segment = animator.segment_index(),
            path_len = animator.path().len(),
            "reveal frame"
        );
        let frame = self.reveal_frame(animator);
        self.renderer.render(&frame)?;
        Ok(RevealStatus::Running)
    }

    /// Handles a press; returns `true` when it armed the guess capture.
    pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
        let position = event.canvas_position(self.config.viewport());
        let armed = self.capture.on_pointer_down(position);
        if armed {
            debug!(x = position.x, y = position.y, "guess capture armed");
        }
        armed
    }

    /// Feeds a move into the capture, redraws and rescoring.
    ///
    /// Returns the current score, or `None` when there is none yet or no
    /// capture is attached.
    pub fn pointer_move(&mut self, event: PointerEvent) -> ChartResult<Option<DifferenceScore>> {
        let position = event.canvas_position(self.config.viewport());
        let Some(outcome) = self.capture.on_pointer_move(position) else {
            return Ok(None);
        };
        if outcome.released {
            debug!(x = position.x, y = position.y, "guess capture released at edge");
        }

        self.render()?;

        let score = difference_score(
            &self.mapped.hidden_sequence(),
            &self.capture.guess().ys(),
            self.mapper.interval_width(),
        );
        self.live_score = score;
        if let (Some(score), Some(callback)) = (score, self.score_callback.as_mut()) {
            callback(&score);
        }
        Ok(score)
    }

    pub fn pointer_up(&mut self) {
        if self.capture.on_pointer_up() {
            debug!("guess capture released");
        }
    }

    /// Pointer left the surface; same as a release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Repaints the capture-phase scene.
    ///
    /// While a reveal is in flight the next `tick` owns the surface.
    pub fn render(&mut self) -> ChartResult<()> {
        if let Some(animator) = &self.reveal {
            let frame = self.reveal_frame(animator);
            return self.renderer.render(&frame);
        }
        let scene = self.scene();
        let mut frame = scene.new_frame();
        scene.append_static_chart(&mut frame);
        scene.append_user_line(&mut frame, self.capture.guess());
        scene.append_user_end_marker(&mut frame, self.capture.guess(), true);
        scene.append_endpoint_markers(&mut frame);
        self.renderer.render(&frame)
    }

    fn reveal_frame(&self, animator: &RevealAnimator) -> RenderFrame {
        let scene = self.scene();
        let mut frame = scene.new_frame();
        scene.append_static_chart(&mut frame);
        scene.append_user_line(&mut frame, self.capture.guess());
        scene.append_user_end_marker(&mut frame, self.capture.guess(), false);
        scene.append_reveal_path(&mut frame, animator.path());
        scene.append_endpoint_markers(&mut frame);
        frame
    }

    fn scene(&self) -> ChartScene<'_> {
        ChartScene {
            config: &self.config,
            dataset: &self.dataset,
            mapper: &self.mapper,
            mapped: &self.mapped,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GuessChartConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport()
    }

    #[must_use]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    #[must_use]
    pub fn mapped_dataset(&self) -> &MappedDataset {
        &self.mapped
    }

    #[must_use]
    pub fn interval_width(&self) -> f64 {
        self.mapper.interval_width()
    }

    #[must_use]
    pub fn user_guess(&self) -> &UserGuess {
        self.capture.guess()
    }

    #[must_use]
    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    #[must_use]
    pub fn live_score(&self) -> Option<DifferenceScore> {
        self.live_score
    }

    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// In-flight reveal progress, if any.
    #[must_use]
    pub fn reveal_animator(&self) -> Option<&RevealAnimator> {
        self.reveal.as_ref()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
