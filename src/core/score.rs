use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::PixelPoint;

/// Percentage difference between the true hidden area and the guessed one.
///
/// Displays with two decimals, e.g. `"12.50"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferenceScore(f64);

impl DifferenceScore {
    /// Returns `None` for values that are not a well-defined percentage.
    #[must_use]
    pub fn new(percent: f64) -> Option<Self> {
        (percent.is_finite() && percent >= 0.0).then_some(Self(percent))
    }

    #[must_use]
    pub fn percent(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn as_text(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DifferenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Trapezoidal area under a polyline sampled at a constant x step.
#[must_use]
pub fn trapezoid_area(ys: &[f64], interval_width: f64) -> f64 {
    ys.windows(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0 * interval_width)
        .sum()
}

/// Compares a true sequence against a partially filled guess.
///
/// The guess contributes its filled prefix only; fewer than two filled
/// entries (or a zero true area) means there is no score yet.
#[must_use]
pub fn difference_score(
    truth: &[PixelPoint],
    guess: &[Option<f64>],
    interval_width: f64,
) -> Option<DifferenceScore> {
    let guessed: Vec<f64> = guess.iter().map_while(|y| *y).collect();
    if guessed.len() < 2 {
        return None;
    }
    let true_ys: Vec<f64> = truth.iter().map(|p| p.y).collect();
    let true_area = trapezoid_area(&true_ys, interval_width);
    if true_area == 0.0 || !true_area.is_finite() {
        return None;
    }
    let user_area = trapezoid_area(&guessed, interval_width);
    DifferenceScore::new((true_area - user_area).abs() / true_area.abs() * 100.0)
}

/// Score used once the reveal finishes.
///
/// A guess that never defined a segment covers none of the true area.
#[must_use]
pub fn final_score(
    truth: &[PixelPoint],
    guess: &[Option<f64>],
    interval_width: f64,
) -> DifferenceScore {
    difference_score(truth, guess, interval_width).unwrap_or(DifferenceScore(100.0))
}
