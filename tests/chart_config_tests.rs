use guess_chart::core::{DataGroup, DataPoint, Dataset, HiddenGroupSelector};
use guess_chart::render::{Color, NullRenderer};
use guess_chart::{ChartError, GuessChart, GuessChartConfig};

fn dataset() -> Dataset {
    Dataset::new(
        vec![
            DataGroup::new("known", vec![DataPoint::new(0, 1.0), DataPoint::new(1, 2.0)]),
            DataGroup::new("answer", vec![DataPoint::new(2, 3.0)]),
        ],
        HiddenGroupSelector::Last,
    )
}

fn init_error(config: GuessChartConfig, dataset: Dataset) -> ChartError {
    match GuessChart::new(NullRenderer::default(), config, dataset) {
        Ok(_) => panic!("chart init should fail"),
        Err(err) => err,
    }
}

#[test]
fn defaults_describe_the_stock_chart() {
    let config = GuessChartConfig::default();
    assert_eq!(config.chart_name, "my-chart");
    assert_eq!((config.width, config.height), (1000, 600));
    assert_eq!(config.field_offset, 50.0);
    assert_eq!(config.indent_to_active_area, 15.0);
    assert_eq!(config.drawing_speed, 3.0);
    assert_eq!(config.x_label_stride, 2);
    assert_eq!(config.shadow_colors.len(), 2);
    assert_eq!(config.chart_line_color, "#0bc".parse::<Color>().expect("color"));
    assert_eq!(config.frame_delay_ms, 0.0);
    assert!(!config.reveal_requires_score);
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let config = GuessChartConfig::from_json_str(
        r##"{"chart_name": "inflation", "width": 640, "chart_line_color": "rgb(255, 0, 0)"}"##,
    )
    .expect("parse");

    assert_eq!(config.chart_name, "inflation");
    assert_eq!(config.width, 640);
    assert_eq!(config.height, 600);
    assert_eq!(config.chart_line_color, Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(config.user_line_dash.as_slice(), &[16.0, 5.0]);
}

#[test]
fn json_round_trip_keeps_customizations() {
    let config = GuessChartConfig::new(800, 480)
        .with_field_offset(30.0)
        .with_indent_to_active_area(10.0)
        .with_shadow_colors(&[Color::rgba(0.2, 0.4, 0.6, 0.5)])
        .with_x_labels(4, "'{x}")
        .with_frame_delay_ms(16.0);

    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"x_label_template\": \"'{x}\""));
    let restored = GuessChartConfig::from_json_str(&json).expect("parse");
    assert_eq!(restored, config);
}

#[test]
fn malformed_color_is_a_config_error() {
    let err = GuessChartConfig::from_json_str(r#"{"chart_line_color": "teal-ish"}"#)
        .expect_err("bad color");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn x_label_fills_template_with_two_digits() {
    let config = GuessChartConfig::default().with_x_labels(4, "'{x}");
    assert_eq!(config.x_label(8), "'08");
    assert_eq!(config.x_label(16), "'16");
    assert_eq!(GuessChartConfig::default().x_label(3), "03");
}

#[test]
fn empty_shadow_palette_is_rejected() {
    let config = GuessChartConfig::default().with_shadow_colors(&[]);
    assert!(matches!(
        init_error(config, dataset()),
        ChartError::InvalidConfig(_)
    ));
}

#[test]
fn invalid_numeric_settings_are_rejected() {
    let configs = [
        GuessChartConfig::default().with_drawing_speed(0.0),
        GuessChartConfig::default().with_drawing_speed(f64::NAN),
        GuessChartConfig::default().with_x_labels(0, "{x}"),
        GuessChartConfig::default().with_x_labels(2, ""),
        GuessChartConfig::default().with_x_labels(2, "day"),
        GuessChartConfig::default().with_frame_delay_ms(-1.0),
        GuessChartConfig::default().with_field_offset(300.0),
        GuessChartConfig::default().with_indent_to_active_area(60.0),
        GuessChartConfig {
            marker_radius: 0.0,
            ..GuessChartConfig::default()
        },
    ];
    for config in configs {
        assert!(matches!(
            init_error(config, dataset()),
            ChartError::InvalidConfig(_)
        ));
    }
}

#[test]
fn zero_sized_canvas_is_rejected() {
    let err = init_error(GuessChartConfig::new(0, 600), dataset());
    assert!(matches!(
        err,
        ChartError::InvalidViewport {
            width: 0,
            height: 600
        }
    ));
}

#[test]
fn malformed_datasets_are_rejected() {
    let too_small = Dataset::new(
        vec![
            DataGroup::new("known", vec![]),
            DataGroup::new("answer", vec![DataPoint::new(0, 1.0)]),
        ],
        HiddenGroupSelector::Last,
    );
    let non_finite = Dataset::new(
        vec![
            DataGroup::new("known", vec![DataPoint::new(0, f64::NAN), DataPoint::new(1, 2.0)]),
            DataGroup::new("answer", vec![DataPoint::new(2, 3.0)]),
        ],
        HiddenGroupSelector::Last,
    );
    let hidden_not_trailing = Dataset {
        hidden: HiddenGroupSelector::Index(0),
        ..dataset()
    };
    let unknown_name = Dataset {
        hidden: HiddenGroupSelector::Name("missing".to_owned()),
        ..dataset()
    };
    let empty_hidden = Dataset::new(
        vec![
            DataGroup::new("known", vec![DataPoint::new(0, 1.0), DataPoint::new(1, 2.0)]),
            DataGroup::new("answer", vec![]),
        ],
        HiddenGroupSelector::Last,
    );
    let gapped_ordinal = Dataset::new(
        vec![
            DataGroup::new("known", vec![DataPoint::new(0, 1.0), DataPoint::new(1, 2.0)]),
            DataGroup::new("answer", vec![DataPoint::new(7, 4.0)]),
        ],
        HiddenGroupSelector::Last,
    );
    let repeated_ordinal = Dataset::new(
        vec![
            DataGroup::new("known", vec![DataPoint::new(0, 1.0), DataPoint::new(1, 2.0)]),
            DataGroup::new("answer", vec![DataPoint::new(1, 4.0)]),
        ],
        HiddenGroupSelector::Last,
    );
    let no_visible = Dataset::new(
        vec![DataGroup::new(
            "answer",
            vec![DataPoint::new(0, 1.0), DataPoint::new(1, 2.0)],
        )],
        HiddenGroupSelector::Last,
    );

    for dataset in [
        too_small,
        non_finite,
        hidden_not_trailing,
        unknown_name,
        empty_hidden,
        gapped_ordinal,
        repeated_ordinal,
        no_visible,
    ] {
        assert!(matches!(
            init_error(GuessChartConfig::default(), dataset),
            ChartError::InvalidData(_)
        ));
    }
}

#[test]
fn dataset_json_defaults_hidden_to_last_group() {
    let dataset = Dataset::from_json_str(
        r#"{"groups": [
            {"name": "a", "points": [{"x": 0, "y": 1.5}, {"x": 1, "y": 2.5}]},
            {"name": "b", "points": [{"x": 2, "y": 3.5}]}
        ]}"#,
    )
    .expect("parse");
    assert_eq!(dataset.hidden, HiddenGroupSelector::Last);
    assert_eq!(dataset.validate().expect("valid"), 1);

    let err = Dataset::from_json_str(r#"{"groups": 3}"#).expect_err("bad shape");
    assert!(matches!(err, ChartError::InvalidData(_)));
}
