//! Offline renderer: plays a scripted guess and the reveal for one scene and
//! writes PNG snapshots of the guess, the reveal midpoint and the final frame.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use guess_chart::core::Dataset;
use guess_chart::interaction::PointerEvent;
use guess_chart::render::CairoRenderer;
use guess_chart::{GuessChart, GuessChartConfig, RevealStatus};
use serde::Deserialize;
use tracing::info;

const DEFAULT_SCENE_PATH: &str = "tests/fixtures/sample_scene.json";
const DEFAULT_OUTPUT_ROOT: &str = "target/guess_chart_png";
const MAX_FRAMES: usize = 100_000;

#[derive(Debug, Deserialize)]
struct Scene {
    config: GuessChartConfig,
    dataset: Dataset,
}

#[derive(Debug)]
struct CliArgs {
    scene_path: PathBuf,
    output_root: PathBuf,
}

fn main() {
    let _ = guess_chart::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let raw = fs::read_to_string(&args.scene_path).map_err(|err| {
        format!(
            "failed to read scene `{}`: {err}",
            args.scene_path.display()
        )
    })?;
    let scene: Scene =
        serde_json::from_str(&raw).map_err(|err| format!("failed to parse scene json: {err}"))?;
    fs::create_dir_all(&args.output_root).map_err(|err| {
        format!(
            "failed to create output dir `{}`: {err}",
            args.output_root.display()
        )
    })?;

    let viewport = scene.config.viewport();
    let renderer = CairoRenderer::new(
        i32::try_from(viewport.width).map_err(|err| err.to_string())?,
        i32::try_from(viewport.height).map_err(|err| err.to_string())?,
    )
    .map_err(|err| err.to_string())?;
    let mut chart =
        GuessChart::new(renderer, scene.config, scene.dataset).map_err(|err| err.to_string())?;

    play_linear_guess(&mut chart)?;
    write_png(&chart, &args.output_root.join("01_guess.png"))?;

    chart
        .start_reveal(|score| info!(score = %score, "reveal finished"))
        .map_err(|err| err.to_string())?;

    let midpoint_segment = chart.mapped_dataset().hidden_group().points.len() / 2;
    let mut midpoint_written = false;
    let mut frame_time_ms = 0.0;
    for _ in 0..MAX_FRAMES {
        frame_time_ms += 1000.0 / 60.0;
        let status = chart.tick(frame_time_ms).map_err(|err| err.to_string())?;
        if let RevealStatus::Completed(score) = status {
            write_png(&chart, &args.output_root.join("03_final.png"))?;
            println!("difference: {score}%");
            return Ok(());
        }
        if !midpoint_written && reveal_segment(&chart) >= midpoint_segment {
            write_png(&chart, &args.output_root.join("02_reveal.png"))?;
            midpoint_written = true;
        }
    }
    Err(format!("reveal did not finish within {MAX_FRAMES} frames"))
}

/// Drags straight on from the last visible slope across every hidden slot.
fn play_linear_guess(chart: &mut GuessChart<CairoRenderer>) -> Result<(), String> {
    let viewport = chart.viewport();
    let geometry = chart.mapper().geometry();
    let mapped = chart.mapped_dataset();
    let anchor = mapped.anchor();
    let visible: Vec<_> = mapped
        .visible_groups()
        .flat_map(|(_, group)| group.points.iter().copied())
        .collect();
    let before_anchor = visible
        .len()
        .checked_sub(2)
        .map_or(anchor, |index| visible[index]);
    let slope = anchor.y - before_anchor.y;
    let targets: Vec<_> = mapped.hidden_group().points.iter().map(|p| p.x).collect();

    let press_x = anchor.x + chart.interval_width() / 2.0;
    if !chart.pointer_down(PointerEvent::unscaled(press_x, anchor.y, viewport)) {
        return Err("scripted press did not arm the capture".to_owned());
    }
    for (step, x) in targets.into_iter().enumerate() {
        let y = (anchor.y + slope * (step + 1) as f64).clamp(geometry.end_y, geometry.start_y);
        chart
            .pointer_move(PointerEvent::unscaled(x, y, viewport))
            .map_err(|err| err.to_string())?;
    }
    chart.pointer_up();
    Ok(())
}

fn reveal_segment(chart: &GuessChart<CairoRenderer>) -> usize {
    chart
        .reveal_animator()
        .map_or(0, |animator| animator.segment_index())
}

fn write_png(chart: &GuessChart<CairoRenderer>, path: &Path) -> Result<(), String> {
    let mut file = File::create(path)
        .map_err(|err| format!("failed to create `{}`: {err}", path.display()))?;
    chart
        .renderer()
        .write_png(&mut file)
        .map_err(|err| err.to_string())?;
    info!(path = %path.display(), "wrote snapshot");
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut scene_path = PathBuf::from(DEFAULT_SCENE_PATH);
    let mut output_root = PathBuf::from(DEFAULT_OUTPUT_ROOT);

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scene" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --scene".to_owned())?;
                scene_path = PathBuf::from(value);
            }
            "--output-root" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output-root".to_owned())?;
                output_root = PathBuf::from(value);
            }
            "--help" | "-h" => {
                println!("{}", usage_message());
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
        }
    }

    Ok(CliArgs {
        scene_path,
        output_root,
    })
}

fn usage_message() -> String {
    format!(
        "Usage: cargo run --features cairo-backend --bin render_guess_chart -- [--scene <path>] [--output-root <dir>]\n\
         Defaults:\n  --scene {DEFAULT_SCENE_PATH}\n  --output-root {DEFAULT_OUTPUT_ROOT}"
    )
}
