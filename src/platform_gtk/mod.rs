//! GTK4 host for a `GuessChart`.
//!
//! The chart paints into an offscreen Cairo surface; a `DrawingArea` named
//! after `chart_name` shows that surface, forwards pointer input and drives
//! reveal frames from its frame clock.
//!
//! Callbacks registered on the chart run while the chart is borrowed, so they
//! must not call back into the adapter.

use std::cell::RefCell;
use std::rc::Rc;

use gtk::glib;
use gtk::prelude::*;
use gtk4 as gtk;
use tracing::warn;

use crate::api::GuessChart;
use crate::core::DifferenceScore;
use crate::error::ChartResult;
use crate::interaction::PointerEvent;
use crate::render::CairoRenderer;

type SharedChart = Rc<RefCell<GuessChart<CairoRenderer>>>;

pub struct GtkChartAdapter {
    area: gtk::DrawingArea,
    chart: SharedChart,
}

impl GtkChartAdapter {
    #[must_use]
    pub fn new(chart: GuessChart<CairoRenderer>) -> Self {
        let viewport = chart.viewport();
        let area = gtk::DrawingArea::new();
        area.set_widget_name(&chart.config().chart_name);
        area.set_content_width(i32::try_from(viewport.width).unwrap_or(i32::MAX));
        area.set_content_height(i32::try_from(viewport.height).unwrap_or(i32::MAX));
        let chart: SharedChart = Rc::new(RefCell::new(chart));

        {
            let chart = Rc::clone(&chart);
            area.set_draw_func(move |_, context, width, height| {
                let chart = chart.borrow();
                let viewport = chart.viewport();
                context.scale(
                    f64::from(width) / f64::from(viewport.width),
                    f64::from(height) / f64::from(viewport.height),
                );
                let painted = context
                    .set_source_surface(chart.renderer().surface(), 0.0, 0.0)
                    .and_then(|()| context.paint());
                if let Err(err) = painted {
                    warn!(%err, "failed to paint chart surface");
                }
            });
        }

        let click = gtk::GestureClick::new();
        {
            let chart = Rc::clone(&chart);
            let area_ref = area.downgrade();
            click.connect_pressed(move |_, _, x, y| {
                let Some(area) = area_ref.upgrade() else {
                    return;
                };
                chart.borrow_mut().pointer_down(pointer_event(&area, x, y));
            });
        }
        {
            let chart = Rc::clone(&chart);
            click.connect_released(move |_, _, _, _| chart.borrow_mut().pointer_up());
        }
        area.add_controller(click);

        let motion = gtk::EventControllerMotion::new();
        {
            let chart = Rc::clone(&chart);
            let area_ref = area.downgrade();
            motion.connect_motion(move |_, x, y| {
                let Some(area) = area_ref.upgrade() else {
                    return;
                };
                match chart.borrow_mut().pointer_move(pointer_event(&area, x, y)) {
                    Ok(_) => area.queue_draw(),
                    Err(err) => warn!(%err, "failed to apply pointer move"),
                }
            });
        }
        {
            let chart = Rc::clone(&chart);
            motion.connect_leave(move |_| chart.borrow_mut().pointer_leave());
        }
        area.add_controller(motion);

        Self { area, chart }
    }

    /// Widget to mount in the host layout.
    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }

    pub fn on_score_available(&self, callback: impl FnMut(&DifferenceScore) + 'static) {
        self.chart.borrow_mut().on_score_available(callback);
    }

    /// Starts the reveal and drives it from the widget's frame clock.
    pub fn start_reveal(&self, on_complete: impl FnOnce(DifferenceScore) + 'static) -> ChartResult<()> {
        self.chart.borrow_mut().start_reveal(on_complete)?;
        let chart = Rc::clone(&self.chart);
        self.area.add_tick_callback(move |area, clock| {
            let frame_time_ms = clock.frame_time() as f64 / 1000.0;
            let status = chart.borrow_mut().tick(frame_time_ms);
            area.queue_draw();
            match status {
                Ok(status) if status.wants_next_frame() => glib::ControlFlow::Continue,
                Ok(_) => glib::ControlFlow::Break,
                Err(err) => {
                    warn!(%err, "reveal frame failed");
                    glib::ControlFlow::Break
                }
            }
        });
        Ok(())
    }
}

fn pointer_event(area: &gtk::DrawingArea, x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(x, y, f64::from(area.width()), f64::from(area.height()))
}
