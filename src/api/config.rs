use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DashPattern};

/// Public chart bootstrap configuration.
///
/// Every field has a default so partial JSON documents load; colors are CSS
/// strings on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessChartConfig {
    /// Mount point name the host attaches the drawing surface under.
    #[serde(default = "default_chart_name")]
    pub chart_name: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Margin between canvas edge and plot field, px.
    #[serde(default = "default_field_offset")]
    pub field_offset: f64,
    /// Gap between the data extremes and the field edges, percent of field height.
    #[serde(default = "default_indent_to_active_area")]
    pub indent_to_active_area: f64,
    #[serde(default = "default_chart_line_color")]
    pub chart_line_color: Color,
    #[serde(default = "default_user_chart_line_color")]
    pub user_chart_line_color: Color,
    #[serde(default = "default_hidden_chart_line_color")]
    pub hidden_chart_line_color: Color,
    #[serde(default = "default_chart_line_width")]
    pub chart_line_width: f64,
    #[serde(default = "default_chart_background_color")]
    pub chart_background_color: Color,
    #[serde(default = "default_chart_background_line_color")]
    pub chart_background_line_color: Color,
    #[serde(default = "default_chart_background_line_width")]
    pub chart_background_line_width: f64,
    #[serde(default = "default_shadow_colors")]
    pub shadow_colors: SmallVec<[Color; 2]>,
    /// Label every n-th ordinal on the x axis.
    #[serde(default = "default_x_label_stride")]
    pub x_label_stride: u32,
    /// Must contain `{x}`, which is replaced by the two-digit zero-padded
    /// ordinal.
    #[serde(default = "default_x_label_template")]
    pub x_label_template: String,
    /// Reveal speed: arc length advanced per frame, in interval-width units.
    #[serde(default = "default_drawing_speed")]
    pub drawing_speed: f64,
    #[serde(default = "default_axis_label_font_size")]
    pub axis_label_font_size: f64,
    #[serde(default = "default_marker_font_size")]
    pub marker_font_size: f64,
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f64,
    #[serde(default = "default_user_line_dash")]
    pub user_line_dash: DashPattern,
    /// Frames arriving sooner than this after the last processed one are skipped.
    #[serde(default)]
    pub frame_delay_ms: f64,
    /// When set, `start_reveal` is refused until a live score exists.
    #[serde(default)]
    pub reveal_requires_score: bool,
}

impl Default for GuessChartConfig {
    fn default() -> Self {
        Self {
            chart_name: default_chart_name(),
            width: default_width(),
            height: default_height(),
            field_offset: default_field_offset(),
            indent_to_active_area: default_indent_to_active_area(),
            chart_line_color: default_chart_line_color(),
            user_chart_line_color: default_user_chart_line_color(),
            hidden_chart_line_color: default_hidden_chart_line_color(),
            chart_line_width: default_chart_line_width(),
            chart_background_color: default_chart_background_color(),
            chart_background_line_color: default_chart_background_line_color(),
            chart_background_line_width: default_chart_background_line_width(),
            shadow_colors: default_shadow_colors(),
            x_label_stride: default_x_label_stride(),
            x_label_template: default_x_label_template(),
            drawing_speed: default_drawing_speed(),
            axis_label_font_size: default_axis_label_font_size(),
            marker_font_size: default_marker_font_size(),
            marker_radius: default_marker_radius(),
            user_line_dash: default_user_line_dash(),
            frame_delay_ms: 0.0,
            reveal_requires_score: false,
        }
    }
}

impl GuessChartConfig {
    /// Creates a default config for a canvas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Sets the margin between canvas edge and plot field.
    #[must_use]
    pub fn with_field_offset(mut self, field_offset: f64) -> Self {
        self.field_offset = field_offset;
        self
    }

    /// Sets the padding between data extremes and field edges, in percent.
    #[must_use]
    pub fn with_indent_to_active_area(mut self, percent: f64) -> Self {
        self.indent_to_active_area = percent;
        self
    }

    /// Sets the reveal speed.
    #[must_use]
    pub fn with_drawing_speed(mut self, drawing_speed: f64) -> Self {
        self.drawing_speed = drawing_speed;
        self
    }

    /// Replaces the alternating shadow palette.
    #[must_use]
    pub fn with_shadow_colors(mut self, colors: &[Color]) -> Self {
        self.shadow_colors = colors.iter().copied().collect();
        self
    }

    /// Sets x-axis label stride and template.
    #[must_use]
    pub fn with_x_labels(mut self, stride: u32, template: impl Into<String>) -> Self {
        self.x_label_stride = stride;
        self.x_label_template = template.into();
        self
    }

    /// Sets the minimum delay between processed reveal frames.
    #[must_use]
    pub fn with_frame_delay_ms(mut self, delay_ms: f64) -> Self {
        self.frame_delay_ms = delay_ms;
        self
    }

    /// Refuses reveals until a live score has been computed.
    #[must_use]
    pub fn with_reveal_requires_score(mut self, required: bool) -> Self {
        self.reveal_requires_score = required;
        self
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))
    }

    /// Formats the x-axis label for one ordinal.
    #[must_use]
    pub fn x_label(&self, ordinal: u32) -> String {
        self.x_label_template
            .replacen("{x}", &format!("{ordinal:02}"), 1)
    }
}

fn default_chart_name() -> String {
    "my-chart".to_owned()
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

fn default_field_offset() -> f64 {
    50.0
}

fn default_indent_to_active_area() -> f64 {
    15.0
}

fn default_chart_line_color() -> Color {
    Color::from_rgba8(0x00, 0xbb, 0xcc, 1.0)
}

fn default_user_chart_line_color() -> Color {
    Color::from_rgba8(0xff, 0x99, 0x22, 1.0)
}

fn default_hidden_chart_line_color() -> Color {
    Color::from_rgba8(0xff, 0x44, 0x44, 1.0)
}

fn default_chart_line_width() -> f64 {
    7.0
}

fn default_chart_background_color() -> Color {
    Color::rgba(0.0, 0.0, 0.0, 0.1)
}

fn default_chart_background_line_color() -> Color {
    Color::WHITE
}

fn default_chart_background_line_width() -> f64 {
    2.5
}

fn default_shadow_colors() -> SmallVec<[Color; 2]> {
    smallvec![
        Color::from_rgba8(164, 164, 164, 0.35),
        Color::from_rgba8(110, 110, 110, 0.35),
    ]
}

fn default_x_label_stride() -> u32 {
    2
}

fn default_x_label_template() -> String {
    "{x}".to_owned()
}

fn default_drawing_speed() -> f64 {
    3.0
}

fn default_axis_label_font_size() -> f64 {
    34.0
}

fn default_marker_font_size() -> f64 {
    30.0
}

fn default_marker_radius() -> f64 {
    12.0
}

fn default_user_line_dash() -> DashPattern {
    smallvec![16.0, 5.0]
}

#[cfg(test)]
mod tests {
    use super::GuessChartConfig;

    #[test]
    fn x_label_pads_ordinal() {
        let config = GuessChartConfig::default().with_x_labels(4, "'{x}");
        assert_eq!(config.x_label(4), "'04");
        assert_eq!(config.x_label(16), "'16");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = GuessChartConfig::from_json_str(
            r##"{"width": 800, "shadow_colors": ["#aaa"], "chart_line_color": "rgb(0, 0, 255)"}"##,
        )
        .expect("config");
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.shadow_colors.len(), 1);
        assert!((config.chart_line_color.blue - 1.0).abs() <= 1e-12);
    }
}
