mod chart;
mod chart_scene;
mod config;
mod reveal;
mod validation;

pub use chart::GuessChart;
pub use config::GuessChartConfig;
pub use reveal::{RevealAnimator, RevealSegment, RevealStatus};
