use std::cell::Cell;
use std::rc::Rc;

use guess_chart::api::RevealAnimator;
use guess_chart::core::{DataGroup, DataPoint, Dataset, HiddenGroupSelector, PixelPoint};
use guess_chart::interaction::PointerEvent;
use guess_chart::render::{NullRenderer, RenderFrame, Renderer};
use guess_chart::{ChartError, GuessChart, GuessChartConfig, RevealStatus};

fn build_chart(config: GuessChartConfig) -> GuessChart<NullRenderer> {
    let dataset = Dataset::new(
        vec![
            DataGroup::new(
                "known",
                vec![
                    DataPoint::new(0, 10.0),
                    DataPoint::new(1, 14.0),
                    DataPoint::new(2, 12.0),
                ],
            ),
            DataGroup::new(
                "answer",
                vec![
                    DataPoint::new(3, 18.0),
                    DataPoint::new(4, 11.0),
                    DataPoint::new(5, 16.0),
                ],
            ),
        ],
        HiddenGroupSelector::Last,
    );
    GuessChart::new(NullRenderer::default(), config, dataset).expect("chart init")
}

fn run_to_end(chart: &mut GuessChart<NullRenderer>, step_ms: f64) -> (RevealStatus, usize) {
    let mut now = 0.0;
    for frames in 1..=100_000 {
        now += step_ms;
        let status = chart.tick(now).expect("tick");
        if !status.wants_next_frame() {
            return (status, frames);
        }
    }
    panic!("reveal did not finish");
}

/// Renderer whose frames fail while the shared switch is on.
struct SwitchableRenderer {
    failing: Rc<Cell<bool>>,
}

impl Renderer for SwitchableRenderer {
    fn render(&mut self, _frame: &RenderFrame) -> guess_chart::ChartResult<()> {
        if self.failing.get() {
            return Err(ChartError::InvalidData("surface lost".to_owned()));
        }
        Ok(())
    }
}

#[test]
fn tick_without_reveal_is_inactive() {
    let mut chart = build_chart(GuessChartConfig::default());
    let before = chart.renderer().frames_rendered;
    assert_eq!(chart.tick(16.0).expect("tick"), RevealStatus::Inactive);
    assert_eq!(chart.renderer().frames_rendered, before);
}

#[test]
fn completion_callback_runs_exactly_once() {
    let mut chart = build_chart(GuessChartConfig::default());
    let calls = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&calls);
    chart
        .start_reveal(move |_| counter.set(counter.get() + 1))
        .expect("start reveal");

    let (status, _) = run_to_end(&mut chart, 16.0);
    assert!(matches!(status, RevealStatus::Completed(_)));
    assert_eq!(calls.get(), 1);

    assert_eq!(chart.tick(10_000.0).expect("tick"), RevealStatus::Inactive);
    assert_eq!(calls.get(), 1);
}

#[test]
fn unguessed_reveal_scores_full_difference() {
    let mut chart = build_chart(GuessChartConfig::default());
    chart.start_reveal(|_| {}).expect("start reveal");

    let (status, _) = run_to_end(&mut chart, 16.0);
    let RevealStatus::Completed(score) = status else {
        panic!("expected completion, got {status:?}");
    };
    assert_eq!(score.as_text(), "100.00");
}

#[test]
fn second_start_while_running_is_rejected() {
    let mut chart = build_chart(GuessChartConfig::default());
    chart.start_reveal(|_| {}).expect("start reveal");
    assert_eq!(chart.tick(0.0).expect("tick"), RevealStatus::Running);

    let err = chart.start_reveal(|_| {}).expect_err("reveal already running");
    assert!(matches!(err, ChartError::RevealInProgress));
    assert!(chart.is_revealing());
}

#[test]
fn reveal_can_replay_after_completion() {
    let mut chart = build_chart(GuessChartConfig::default());
    chart.start_reveal(|_| {}).expect("first reveal");
    let (first, first_frames) = run_to_end(&mut chart, 16.0);

    chart.start_reveal(|_| {}).expect("replay");
    let (second, second_frames) = run_to_end(&mut chart, 16.0);

    assert_eq!(first, second);
    assert_eq!(first_frames, second_frames);
}

#[test]
fn reveal_before_score_can_be_required() {
    let config = GuessChartConfig::default().with_reveal_requires_score(true);
    let mut chart = build_chart(config);

    let err = chart.start_reveal(|_| {}).expect_err("no score yet");
    assert!(matches!(err, ChartError::RevealNotReady));
    assert!(!chart.is_revealing());

    let viewport = chart.viewport();
    let slot = chart.user_guess().points()[1].x;
    assert!(chart.pointer_down(PointerEvent::unscaled(slot - 10.0, 300.0, viewport)));
    chart
        .pointer_move(PointerEvent::unscaled(slot, 300.0, viewport))
        .expect("move");
    chart.start_reveal(|_| {}).expect("score available");
}

#[test]
fn frame_delay_gates_processing() {
    let config = GuessChartConfig::default().with_frame_delay_ms(50.0);
    let mut chart = build_chart(config);
    chart.start_reveal(|_| {}).expect("start reveal");

    assert_eq!(chart.tick(0.0).expect("tick"), RevealStatus::Running);
    let drawn = chart.renderer().frames_rendered;
    assert_eq!(chart.tick(20.0).expect("tick"), RevealStatus::Waiting);
    assert_eq!(chart.tick(49.0).expect("tick"), RevealStatus::Waiting);
    assert_eq!(chart.renderer().frames_rendered, drawn);
    assert_eq!(chart.tick(50.0).expect("tick"), RevealStatus::Running);
    assert_eq!(chart.renderer().frames_rendered, drawn + 1);
}

#[test]
fn frame_count_does_not_depend_on_frame_timing() {
    let mut fast = build_chart(GuessChartConfig::default());
    fast.start_reveal(|_| {}).expect("start reveal");
    let (_, fast_frames) = run_to_end(&mut fast, 8.0);

    let mut slow = build_chart(GuessChartConfig::default());
    slow.start_reveal(|_| {}).expect("start reveal");
    let (_, slow_frames) = run_to_end(&mut slow, 40.0);

    assert_eq!(fast_frames, slow_frames);
}

#[test]
fn higher_speed_finishes_in_fewer_frames() {
    let mut slow = build_chart(GuessChartConfig::default().with_drawing_speed(1.0));
    slow.start_reveal(|_| {}).expect("start reveal");
    let (_, slow_frames) = run_to_end(&mut slow, 16.0);

    let mut fast = build_chart(GuessChartConfig::default().with_drawing_speed(6.0));
    fast.start_reveal(|_| {}).expect("start reveal");
    let (_, fast_frames) = run_to_end(&mut fast, 16.0);

    assert!(fast_frames < slow_frames);
}

#[test]
fn animator_visits_every_hidden_point() {
    let sequence = [
        PixelPoint::new(0.0, 100.0),
        PixelPoint::new(40.0, 60.0),
        PixelPoint::new(80.0, 90.0),
        PixelPoint::new(120.0, 90.0),
    ];
    let mut animator = RevealAnimator::new(&sequence, 40.0, 3.0, 0.0);
    assert_eq!(animator.segments().len(), 3);
    assert!(animator.segments()[0].angle > 0.0);
    assert!(animator.segments()[1].angle < 0.0);
    assert_eq!(animator.segments()[2].angle, 0.0);

    let mut steps = 0;
    while !animator.is_exhausted() {
        animator.advance();
        steps += 1;
        assert!(steps < 10_000, "animator never exhausted");
    }

    assert_eq!(animator.path(), &sequence[..]);
}

#[test]
fn reveal_frames_grow_the_revealed_path() {
    let mut chart = build_chart(GuessChartConfig::default().with_drawing_speed(50.0));
    chart.start_reveal(|_| {}).expect("start reveal");

    let mut previous_len = 0;
    let mut now = 0.0;
    while chart.is_revealing() {
        now += 16.0;
        chart.tick(now).expect("tick");
        if let Some(animator) = chart.reveal_animator() {
            assert!(animator.path().len() >= previous_len);
            previous_len = animator.path().len();
        }
    }
    assert_eq!(previous_len, 4);
}

#[test]
fn failed_reveal_frame_allows_a_new_reveal() {
    let failing = Rc::new(Cell::new(false));
    let renderer = SwitchableRenderer {
        failing: Rc::clone(&failing),
    };
    let dataset = Dataset::new(
        vec![
            DataGroup::new("known", vec![DataPoint::new(0, 1.0), DataPoint::new(1, 2.0)]),
            DataGroup::new("answer", vec![DataPoint::new(2, 4.0)]),
        ],
        HiddenGroupSelector::Last,
    );
    let mut chart =
        GuessChart::new(renderer, GuessChartConfig::default(), dataset).expect("chart init");

    let abandoned = Rc::new(Cell::new(false));
    let flag = Rc::clone(&abandoned);
    chart
        .start_reveal(move |_| flag.set(true))
        .expect("start reveal");
    failing.set(true);
    assert!(chart.tick(0.0).is_err());
    assert_eq!(chart.tick(16.0).expect("tick"), RevealStatus::Inactive);

    failing.set(false);
    let completed = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&completed);
    chart
        .start_reveal(move |_| counter.set(counter.get() + 1))
        .expect("restart reveal");
    let mut now = 0.0;
    while chart.tick(now).expect("tick").wants_next_frame() {
        now += 16.0;
    }
    assert_eq!(completed.get(), 1);
    assert!(!abandoned.get());
}
