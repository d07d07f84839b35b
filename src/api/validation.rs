use crate::error::{ChartError, ChartResult};

use super::GuessChartConfig;

pub(super) fn validate_config(config: &GuessChartConfig) -> ChartResult<()> {
    let viewport = config.viewport();
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    if config.shadow_colors.is_empty() {
        return Err(ChartError::InvalidConfig(
            "shadow color palette must not be empty".to_owned(),
        ));
    }
    if config.x_label_stride == 0 {
        return Err(ChartError::InvalidConfig(
            "x label stride must be > 0".to_owned(),
        ));
    }
    if !config.x_label_template.contains("{x}") {
        return Err(ChartError::InvalidConfig(format!(
            "x label template `{}` must contain the `{{x}}` placeholder",
            config.x_label_template
        )));
    }
    if !config.drawing_speed.is_finite() || config.drawing_speed <= 0.0 {
        return Err(ChartError::InvalidConfig(
            "drawing speed must be finite and > 0".to_owned(),
        ));
    }
    if !config.frame_delay_ms.is_finite() || config.frame_delay_ms < 0.0 {
        return Err(ChartError::InvalidConfig(
            "frame delay must be finite and >= 0".to_owned(),
        ));
    }

    for (name, value) in [
        ("chart_line_width", config.chart_line_width),
        ("chart_background_line_width", config.chart_background_line_width),
        ("axis_label_font_size", config.axis_label_font_size),
        ("marker_font_size", config.marker_font_size),
        ("marker_radius", config.marker_radius),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "`{name}` must be finite and > 0"
            )));
        }
    }
    if config
        .user_line_dash
        .iter()
        .any(|len| !len.is_finite() || *len < 0.0)
    {
        return Err(ChartError::InvalidConfig(
            "user line dash lengths must be finite and >= 0".to_owned(),
        ));
    }

    for color in [
        config.chart_line_color,
        config.user_chart_line_color,
        config.hidden_chart_line_color,
        config.chart_background_color,
        config.chart_background_line_color,
    ]
    .into_iter()
    .chain(config.shadow_colors.iter().copied())
    {
        color
            .validate()
            .map_err(|e| ChartError::InvalidConfig(e.to_string()))?;
    }

    Ok(())
}
