use crate::core::{CoordinateMapper, Dataset, MappedDataset, PixelPoint};
use crate::interaction::UserGuess;
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, PolylinePrimitive, RectPrimitive,
    RenderFrame, TextHAlign, TextPrimitive,
};

use super::GuessChartConfig;

/// Stateless drawing routines over one chart's immutable inputs.
///
/// Every `append_*` call only pushes primitives into the given frame.
#[derive(Debug, Clone, Copy)]
pub(super) struct ChartScene<'a> {
    pub config: &'a GuessChartConfig,
    pub dataset: &'a Dataset,
    pub mapper: &'a CoordinateMapper,
    pub mapped: &'a MappedDataset,
}

impl ChartScene<'_> {
    #[must_use]
    pub fn new_frame(&self) -> RenderFrame {
        RenderFrame::new(self.config.viewport())
    }

    /// Background, shaded groups, visible line and both label rows.
    pub fn append_static_chart(&self, frame: &mut RenderFrame) {
        self.append_background(frame);
        self.append_shadows(frame);
        self.append_series_line(frame);
        self.append_x_labels(frame);
        self.append_group_names(frame);
    }

    fn append_background(&self, frame: &mut RenderFrame) {
        let geometry = self.mapper.geometry();
        frame.rects.push(RectPrimitive::new(
            geometry.start_x,
            geometry.end_y,
            geometry.field_width(),
            geometry.field_height(),
            self.config.chart_background_color,
        ));

        let interval_width = self.mapper.interval_width();
        for index in 1..self.mapper.interval_count() {
            let x = geometry.start_x + interval_width * index as f64;
            frame.lines.push(LinePrimitive::new(
                x,
                geometry.start_y,
                x,
                geometry.end_y,
                self.config.chart_background_line_width,
                self.config.chart_background_line_color,
            ));
        }
    }

    /// One filled area per visible group, closed down to the field bottom.
    ///
    /// Each area after the first starts at the previous group's last point so
    /// neighbouring areas meet without a gap.
    fn append_shadows(&self, frame: &mut RenderFrame) {
        let bottom = self.mapper.geometry().start_y;
        let mut previous_last: Option<PixelPoint> = None;
        for (position, (_, group)) in self.mapped.visible_groups().enumerate() {
            let (Some(first), Some(last)) = (group.points.first(), group.points.last()) else {
                continue;
            };
            let mut outline = Vec::with_capacity(group.points.len() + 3);
            match previous_last {
                Some(previous) => {
                    outline.push(PixelPoint::new(previous.x, bottom));
                    outline.push(previous);
                }
                None => outline.push(PixelPoint::new(first.x, bottom)),
            }
            outline.extend(group.points.iter().copied());
            outline.push(PixelPoint::new(last.x, bottom));

            frame
                .polygons
                .push(PolygonPrimitive::new(outline, self.shadow_color(position)));
            previous_last = Some(*last);
        }
    }

    fn append_series_line(&self, frame: &mut RenderFrame) {
        let points: Vec<PixelPoint> = self
            .mapped
            .visible_groups()
            .flat_map(|(_, group)| group.points.iter().copied())
            .collect();
        if points.len() >= 2 {
            frame.polylines.push(PolylinePrimitive::new(
                points,
                self.config.chart_line_width,
                self.config.chart_line_color,
            ));
        }
    }

    /// Labels every stride-th ordinal plus the final one.
    ///
    /// The last stride multiple is left out since it would crowd or repeat
    /// the final label.
    fn append_x_labels(&self, frame: &mut RenderFrame) {
        let stride = self.config.x_label_stride;
        let interval_count = u32::try_from(self.mapper.interval_count()).unwrap_or(u32::MAX);
        let crowded = interval_count - interval_count % stride;
        let baseline = f64::from(self.config.height);

        let label = |ordinal: u32| {
            TextPrimitive::new(
                self.config.x_label(ordinal),
                self.mapper.map_x(ordinal),
                baseline,
                self.config.axis_label_font_size,
                Color::BLACK,
                TextHAlign::Center,
            )
        };

        for point in self.dataset.groups.iter().flat_map(|group| &group.points) {
            if point.x % stride == 0 && point.x != crowded {
                frame.texts.push(label(point.x));
            }
        }
        if let Some(last) = self.dataset.groups.iter().rev().find_map(|g| g.points.last()) {
            frame.texts.push(label(last.x));
        }
    }

    fn append_group_names(&self, frame: &mut RenderFrame) {
        let geometry = self.mapper.geometry();
        let y = geometry.start_y - geometry.padding_px() / 2.0;
        let half_interval = self.mapper.interval_width() / 2.0;

        for (index, group) in self.mapped.visible_groups() {
            if group.name.is_empty() {
                continue;
            }
            let Some((min_x, max_x)) = group.x_span() else {
                continue;
            };
            let span = max_x - min_x;
            let mut x = min_x + span / 2.0;
            if index != 0 {
                x -= half_interval;
            }
            let mut text = TextPrimitive::new(
                group.name.clone(),
                x,
                y,
                self.config.axis_label_font_size,
                Color::BLACK,
                TextHAlign::Center,
            )
            .bold();
            if span > 0.0 {
                text = text.with_max_width(span);
            }
            frame.texts.push(text);
        }
    }

    /// Dashed line through the filled guess slots.
    pub fn append_user_line(&self, frame: &mut RenderFrame, guess: &UserGuess) {
        let points = guess.filled_points();
        if points.len() < 2 {
            return;
        }
        frame.polylines.push(
            PolylinePrimitive::new(
                points,
                self.config.chart_line_width,
                self.config.user_chart_line_color,
            )
            .with_dash(&self.config.user_line_dash),
        );
    }

    /// Marker on the guess end once the user has reached it.
    pub fn append_user_end_marker(
        &self,
        frame: &mut RenderFrame,
        guess: &UserGuess,
        with_callout: bool,
    ) {
        if let Some(end) = guess.last_filled() {
            let callout = with_callout.then(|| format_callout(self.mapper.unmap_y(end.y)));
            self.append_marker(frame, end, self.config.hidden_chart_line_color, callout);
        }
    }

    /// Start-of-series and last-visible markers with their raw values.
    pub fn append_endpoint_markers(&self, frame: &mut RenderFrame) {
        let hidden = self.mapped.hidden_index();
        let first = self
            .dataset
            .groups
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != hidden)
            .find_map(|(_, group)| group.points.first());
        if let (Some(raw), Some(pixel)) = (first, self.mapped.first_visible_point()) {
            self.append_marker(
                frame,
                pixel,
                self.config.chart_line_color,
                Some(format_callout(raw.y)),
            );
        }

        let anchor_group = &self.dataset.groups[hidden - 1];
        if let Some(raw) = anchor_group.points.last() {
            self.append_marker(
                frame,
                self.mapped.anchor(),
                self.config.hidden_chart_line_color,
                Some(format_callout(raw.y)),
            );
        }
    }

    /// Marker on the true final value, drawn when the reveal completes.
    pub fn append_final_marker(&self, frame: &mut RenderFrame) {
        let raw = self.dataset.groups[self.mapped.hidden_index()].points.last();
        let pixel = self.mapped.hidden_group().points.last();
        if let (Some(raw), Some(pixel)) = (raw, pixel) {
            self.append_marker(
                frame,
                *pixel,
                self.config.hidden_chart_line_color,
                Some(format_callout(raw.y)),
            );
        }
    }

    /// Partially revealed hidden segment: shaded area plus stroke.
    pub fn append_reveal_path(&self, frame: &mut RenderFrame, path: &[PixelPoint]) {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return;
        };
        let bottom = self.mapper.geometry().start_y;
        let mut outline = Vec::with_capacity(path.len() + 2);
        outline.extend(path.iter().copied());
        outline.push(PixelPoint::new(last.x, bottom));
        outline.push(PixelPoint::new(first.x, bottom));
        let parity = if self.mapped.groups().len() % 2 == 1 { 0 } else { 1 };
        frame
            .polygons
            .push(PolygonPrimitive::new(outline, self.shadow_color(parity)));

        if path.len() >= 2 {
            frame.polylines.push(PolylinePrimitive::new(
                path.to_vec(),
                self.config.chart_line_width,
                self.config.hidden_chart_line_color,
            ));
        }
    }

    fn append_marker(
        &self,
        frame: &mut RenderFrame,
        center: PixelPoint,
        color: Color,
        callout: Option<String>,
    ) {
        frame.circles.push(CirclePrimitive {
            center,
            radius: self.config.marker_radius,
            fill_color: Color::WHITE,
            stroke_color: color,
            stroke_width: self.config.chart_line_width,
        });

        let Some(text) = callout else {
            return;
        };
        let font = self.config.marker_font_size;
        let (x, y) = callout_anchor(center, self.mapper.interval_width(), font);
        frame.texts.push(
            TextPrimitive::new(text, x, y, font, Color::BLACK, TextHAlign::Left).bold(),
        );
    }

    fn shadow_color(&self, position: usize) -> Color {
        let palette = &self.config.shadow_colors;
        palette[position % palette.len()]
    }
}

/// Callout baseline next to a marker.
///
/// Markers close to the canvas top get the text below them so it is not
/// clipped.
#[must_use]
pub(super) fn callout_anchor(center: PixelPoint, interval_width: f64, font_size: f64) -> (f64, f64) {
    let x = center.x - interval_width / 1.5;
    let y = if center.y < font_size * 3.0 {
        center.y + font_size * 2.0
    } else {
        center.y - font_size
    };
    (x, y)
}

/// Whole numbers print bare, anything else with one decimal.
#[must_use]
pub(super) fn format_callout(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
