//! guess-chart: interactive "draw the trend" line chart engine.
//!
//! A chart shows the visible part of a series, lets the user sketch the
//! withheld tail with the pointer, then animates the true tail and scores
//! the sketch by area difference. Drawing goes through the backend-agnostic
//! `render::Renderer` trait; hosts forward pointer events and frame ticks.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{GuessChart, GuessChartConfig, RevealStatus};
pub use error::{ChartError, ChartResult};
