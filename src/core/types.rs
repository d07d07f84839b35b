use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One raw sample: ordinal position on the x axis and its domain value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: u32,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: u32, y: f64) -> Self {
        Self { x, y }
    }
}

/// Point already projected into pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Named run of consecutive samples, drawn as one shaded section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataGroup {
    pub name: String,
    pub points: Vec<DataPoint>,
}

impl DataGroup {
    #[must_use]
    pub fn new(name: impl Into<String>, points: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// Identifies which group is withheld as the answer key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenGroupSelector {
    /// The trailing group in display order.
    #[default]
    Last,
    /// Group at a fixed position in display order.
    Index(usize),
    /// First group whose name matches exactly.
    Name(String),
}

/// Ordered groups plus the answer-key designation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub groups: Vec<DataGroup>,
    #[serde(default)]
    pub hidden: HiddenGroupSelector,
}

impl Dataset {
    #[must_use]
    pub fn new(groups: Vec<DataGroup>, hidden: HiddenGroupSelector) -> Self {
        Self { groups, hidden }
    }

    #[must_use]
    pub fn total_point_count(&self) -> usize {
        self.groups.iter().map(|group| group.points.len()).sum()
    }

    /// Resolves the hidden selector and checks the dataset shape.
    ///
    /// The hidden group must be the trailing, non-empty group and must be
    /// preceded by a non-empty visible group supplying the anchor point.
    pub fn hidden_group_index(&self) -> ChartResult<usize> {
        let index = match &self.hidden {
            HiddenGroupSelector::Last => self.groups.len().checked_sub(1),
            HiddenGroupSelector::Index(index) => {
                (*index < self.groups.len()).then_some(*index)
            }
            HiddenGroupSelector::Name(name) => {
                self.groups.iter().position(|group| &group.name == name)
            }
        }
        .ok_or_else(|| {
            ChartError::InvalidData(format!(
                "hidden group selector {:?} does not match any group",
                self.hidden
            ))
        })?;

        if index + 1 != self.groups.len() {
            return Err(ChartError::InvalidData(
                "hidden group must be the trailing group".to_owned(),
            ));
        }
        if self.groups[index].points.is_empty() {
            return Err(ChartError::InvalidData(
                "hidden group must contain at least one point".to_owned(),
            ));
        }
        if index == 0 || self.groups[index - 1].points.is_empty() {
            return Err(ChartError::InvalidData(
                "hidden group must follow a non-empty visible group".to_owned(),
            ));
        }
        Ok(index)
    }

    pub fn validate(&self) -> ChartResult<usize> {
        let total = self.total_point_count();
        if total < 2 {
            return Err(ChartError::InvalidData(format!(
                "dataset needs at least 2 points, got {total}"
            )));
        }
        for group in &self.groups {
            if let Some(point) = group.points.iter().find(|point| !point.y.is_finite()) {
                return Err(ChartError::InvalidData(format!(
                    "group `{}` has non-finite value at x={}",
                    group.name, point.x
                )));
            }
        }
        // Ordinals must run 0..N-1 across groups in display order.
        let points = self.groups.iter().flat_map(|group| &group.points);
        for (position, point) in points.enumerate() {
            if usize::try_from(point.x).ok() != Some(position) {
                return Err(ChartError::InvalidData(format!(
                    "point at position {position} has ordinal x={}",
                    point.x
                )));
            }
        }
        self.hidden_group_index()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse dataset: {e}")))
    }
}
