use guess_chart::core::{DataGroup, DataPoint, Dataset, HiddenGroupSelector, PixelPoint, Viewport};
use guess_chart::interaction::PointerEvent;
use guess_chart::render::{
    Color, NullRenderer, PolylinePrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
};
use guess_chart::{ChartError, GuessChart, GuessChartConfig, RevealStatus};

// 7 points on a 1000x600 canvas: interval 150 px, hidden slots at x = 800, 950.
fn build_chart() -> GuessChart<NullRenderer> {
    let dataset = Dataset::new(
        vec![
            DataGroup::new(
                "Before",
                vec![
                    DataPoint::new(0, 20.0),
                    DataPoint::new(1, 24.0),
                    DataPoint::new(2, 22.0),
                ],
            ),
            DataGroup::new("After", vec![DataPoint::new(3, 30.0), DataPoint::new(4, 28.0)]),
            DataGroup::new("Hidden", vec![DataPoint::new(5, 35.0), DataPoint::new(6, 40.0)]),
        ],
        HiddenGroupSelector::Name("Hidden".to_owned()),
    );
    GuessChart::new(
        NullRenderer::default(),
        GuessChartConfig::new(1000, 600),
        dataset,
    )
    .expect("chart init")
}

fn draw_full_guess(chart: &mut GuessChart<NullRenderer>) {
    let viewport = chart.viewport();
    assert!(chart.pointer_down(PointerEvent::unscaled(700.0, 300.0, viewport)));
    chart
        .pointer_move(PointerEvent::unscaled(800.0, 200.0, viewport))
        .expect("move");
    chart
        .pointer_move(PointerEvent::unscaled(950.0, 180.0, viewport))
        .expect("move");
    chart.pointer_up();
    assert!(chart.user_guess().is_complete());
}

fn last_frame(chart: &GuessChart<NullRenderer>) -> &RenderFrame {
    chart.renderer().last_frame().expect("frame rendered")
}

#[test]
fn initial_frame_draws_visible_part_only() {
    let chart = build_chart();
    let frame = last_frame(&chart);

    assert_eq!(frame.viewport, Viewport::new(1000, 600));
    assert_eq!(frame.rects.len(), 1);
    assert_eq!(frame.lines.len(), 5);
    assert_eq!(frame.polygons.len(), 2);
    assert_eq!(frame.polylines.len(), 1);
    assert_eq!(frame.polylines[0].points.len(), 5);
    assert_eq!(frame.circles.len(), 2);

    let hidden_start = chart.mapped_dataset().hidden_group().points[0];
    assert!(
        frame.polylines[0]
            .points
            .iter()
            .all(|point| point.x < hidden_start.x)
    );
}

#[test]
fn shadows_alternate_palette_colors() {
    let chart = build_chart();
    let frame = last_frame(&chart);
    let palette = &chart.config().shadow_colors;

    assert_eq!(frame.polygons[0].fill_color, palette[0]);
    assert_eq!(frame.polygons[1].fill_color, palette[1]);
}

#[test]
fn x_labels_follow_stride_and_always_include_last_ordinal() {
    let chart = build_chart();
    let frame = last_frame(&chart);

    let labels: Vec<&str> = frame
        .texts
        .iter()
        .filter(|text| text.h_align == TextHAlign::Center && !text.bold)
        .map(|text| text.text.as_str())
        .collect();
    assert_eq!(labels, vec!["00", "02", "04", "06"]);
}

#[test]
fn group_names_are_bold_and_shifted_after_first_group() {
    let chart = build_chart();
    let frame = last_frame(&chart);

    let names: Vec<&TextPrimitive> = frame
        .texts
        .iter()
        .filter(|text| text.bold && text.h_align == TextHAlign::Center)
        .collect();
    assert_eq!(names.len(), 2);
    assert_eq!(names[0].text, "Before");
    assert!((names[0].x - 200.0).abs() <= 1e-9);
    assert_eq!(names[1].text, "After");
    assert!((names[1].x - 500.0).abs() <= 1e-9);
    assert!(names.iter().all(|name| (name.y - 512.5).abs() <= 1e-9));
}

#[test]
fn endpoint_callouts_show_raw_values() {
    let chart = build_chart();
    let frame = last_frame(&chart);

    let callouts: Vec<&str> = frame
        .texts
        .iter()
        .filter(|text| text.h_align == TextHAlign::Left)
        .map(|text| text.text.as_str())
        .collect();
    assert_eq!(callouts, vec!["20", "28"]);
}

#[test]
fn complete_guess_adds_dashed_line_and_end_marker() {
    let mut chart = build_chart();
    draw_full_guess(&mut chart);
    let frame = last_frame(&chart);

    assert_eq!(frame.polylines.len(), 2);
    let user_line = &frame.polylines[1];
    assert_eq!(user_line.dash.as_slice(), chart.config().user_line_dash.as_slice());
    assert_eq!(user_line.color, chart.config().user_chart_line_color);
    assert_eq!(user_line.points.len(), 3);

    assert_eq!(frame.circles.len(), 3);
    assert_eq!(frame.circles[0].center, PixelPoint::new(950.0, 180.0));
    assert_eq!(
        frame
            .texts
            .iter()
            .filter(|text| text.h_align == TextHAlign::Left)
            .count(),
        3
    );
}

#[test]
fn reveal_frames_add_hidden_area_and_final_marker() {
    let mut chart = build_chart();
    draw_full_guess(&mut chart);
    chart.start_reveal(|_| {}).expect("start reveal");

    assert_eq!(chart.tick(0.0).expect("tick"), RevealStatus::Running);
    let frame = last_frame(&chart);
    assert_eq!(frame.polygons.len(), 3);
    assert_eq!(
        frame.polygons.last().map(|polygon| polygon.fill_color),
        Some(chart.config().shadow_colors[0])
    );
    assert_eq!(frame.polylines.len(), 3);
    assert_eq!(
        frame.polylines[2].color,
        chart.config().hidden_chart_line_color
    );
    assert_eq!(frame.circles.len(), 3);

    let mut now = 0.0;
    while chart.tick(now).expect("tick").wants_next_frame() {
        now += 16.0;
    }

    let frame = last_frame(&chart);
    let final_point = chart.mapped_dataset().final_point().expect("final point");
    assert_eq!(frame.circles.len(), 4);
    assert_eq!(frame.circles.last().map(|circle| circle.center), Some(final_point));
    assert_eq!(
        frame.texts.last().map(|text| text.text.as_str()),
        Some("40")
    );
}

#[test]
fn reveal_shade_follows_group_count_parity() {
    let dataset = Dataset::new(
        vec![
            DataGroup::new(
                "Before",
                vec![DataPoint::new(0, 20.0), DataPoint::new(1, 24.0)],
            ),
            DataGroup::new("Hidden", vec![DataPoint::new(2, 30.0)]),
        ],
        HiddenGroupSelector::Last,
    );
    let mut chart = GuessChart::new(
        NullRenderer::default(),
        GuessChartConfig::new(1000, 600),
        dataset,
    )
    .expect("chart init");
    chart.start_reveal(|_| {}).expect("start reveal");
    assert_eq!(chart.tick(0.0).expect("tick"), RevealStatus::Running);

    let frame = last_frame(&chart);
    assert_eq!(frame.polygons.len(), 2);
    assert_eq!(
        frame.polygons.last().map(|polygon| polygon.fill_color),
        Some(chart.config().shadow_colors[1])
    );
}

#[test]
fn null_renderer_rejects_invalid_primitives() {
    let mut renderer = NullRenderer::default();
    let mut frame = RenderFrame::new(Viewport::new(100, 100));
    assert!(frame.is_empty());
    frame.polylines.push(PolylinePrimitive::new(
        vec![PixelPoint::new(0.0, 0.0), PixelPoint::new(f64::NAN, 1.0)],
        1.0,
        Color::BLACK,
    ));

    let err = renderer.render(&frame).expect_err("nan point");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert_eq!(renderer.frames_rendered, 0);
    assert!(renderer.last_frame().is_none());
}
