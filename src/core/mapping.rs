use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, Dataset, PixelPoint, Viewport};
use crate::error::{ChartError, ChartResult};

/// Plot field inside the canvas, with the padded active band.
///
/// `start_y` is the bottom edge and `end_y` the top edge because pixel
/// space grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub viewport: Viewport,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    /// Fraction of the field height kept empty above the max and below the min.
    pub padding_ratio: f64,
}

impl FieldGeometry {
    pub fn new(viewport: Viewport, field_offset: f64, indent_percent: f64) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let width = f64::from(viewport.width);
        let height = f64::from(viewport.height);
        if !field_offset.is_finite()
            || field_offset < 0.0
            || field_offset * 2.0 >= width
            || field_offset * 2.0 >= height
        {
            return Err(ChartError::InvalidConfig(format!(
                "field offset {field_offset} leaves no plot area inside {width}x{height}"
            )));
        }
        if !indent_percent.is_finite() || !(0.0..50.0).contains(&indent_percent) {
            return Err(ChartError::InvalidConfig(
                "indent to active area must be finite and in [0, 50)".to_owned(),
            ));
        }

        Ok(Self {
            viewport,
            start_x: field_offset,
            start_y: height - field_offset,
            end_x: width - field_offset,
            end_y: field_offset,
            padding_ratio: indent_percent / 100.0,
        })
    }

    #[must_use]
    pub fn field_width(self) -> f64 {
        self.end_x - self.start_x
    }

    #[must_use]
    pub fn field_height(self) -> f64 {
        self.start_y - self.end_y
    }

    #[must_use]
    pub fn padding_px(self) -> f64 {
        self.padding_ratio * self.field_height()
    }

    #[must_use]
    pub fn active_height(self) -> f64 {
        self.field_height() - 2.0 * self.padding_px()
    }

    /// Pixel row the domain maximum lands on.
    #[must_use]
    pub fn top_bound(self) -> f64 {
        self.end_y + self.padding_px()
    }

    /// Pixel row the domain minimum lands on.
    #[must_use]
    pub fn bottom_bound(self) -> f64 {
        self.start_y - self.padding_px()
    }

    #[must_use]
    pub fn contains_y(self, y: f64) -> bool {
        y >= self.end_y && y <= self.start_y
    }
}

/// Projects ordinal/value samples into field pixels.
///
/// Built once per dataset; any change to the raw data means building a new
/// mapper, since the scaling factor depends on the global extremes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    geometry: FieldGeometry,
    interval_count: usize,
    interval_width: f64,
    domain_min: f64,
    domain_max: f64,
    scaling_factor: f64,
}

impl CoordinateMapper {
    pub fn from_dataset(geometry: FieldGeometry, dataset: &Dataset) -> ChartResult<Self> {
        let total = dataset.total_point_count();
        if total < 2 {
            return Err(ChartError::InvalidData(format!(
                "dataset needs at least 2 points, got {total}"
            )));
        }
        let values = || dataset.groups.iter().flat_map(|group| group.points.iter().map(|p| p.y));
        let domain_min = values().map(OrderedFloat).min().map_or(0.0, |v| v.0);
        let domain_max = values().map(OrderedFloat).max().map_or(0.0, |v| v.0);
        if !domain_min.is_finite() || !domain_max.is_finite() {
            return Err(ChartError::InvalidData(
                "dataset values must be finite".to_owned(),
            ));
        }

        let interval_count = total - 1;
        let interval_width = geometry.field_width() / interval_count as f64;
        let span = domain_max - domain_min;
        let scaling_factor = if span > 0.0 {
            geometry.active_height() / span
        } else {
            0.0
        };

        Ok(Self {
            geometry,
            interval_count,
            interval_width,
            domain_min,
            domain_max,
            scaling_factor,
        })
    }

    #[must_use]
    pub fn geometry(&self) -> FieldGeometry {
        self.geometry
    }

    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.interval_count
    }

    #[must_use]
    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    #[must_use]
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    #[must_use]
    pub fn map_x(&self, ordinal: u32) -> f64 {
        self.geometry.start_x + f64::from(ordinal) * self.interval_width
    }

    /// Flat datasets (max == min) sit on the middle of the active band.
    #[must_use]
    pub fn map_y(&self, value: f64) -> f64 {
        if self.scaling_factor == 0.0 {
            return (self.geometry.top_bound() + self.geometry.bottom_bound()) / 2.0;
        }
        self.geometry.bottom_bound() - (value - self.domain_min) * self.scaling_factor
    }

    /// Recovers the domain value drawn at pixel row `y`.
    #[must_use]
    pub fn unmap_y(&self, y: f64) -> f64 {
        if self.scaling_factor == 0.0 {
            return self.domain_min;
        }
        self.domain_min + (self.geometry.bottom_bound() - y) / self.scaling_factor
    }

    #[must_use]
    pub fn map_point(&self, point: DataPoint) -> PixelPoint {
        PixelPoint::new(self.map_x(point.x), self.map_y(point.y))
    }

    /// The only way to obtain a `MappedDataset`; the dataset is validated
    /// first so the hidden index always has a visible group before it.
    pub fn map_dataset(&self, dataset: &Dataset) -> ChartResult<MappedDataset> {
        let hidden_index = dataset.validate()?;
        let groups = dataset
            .groups
            .iter()
            .map(|group| MappedGroup {
                name: group.name.clone(),
                points: group.points.iter().map(|p| self.map_point(*p)).collect(),
            })
            .collect();
        Ok(MappedDataset {
            groups,
            hidden_index,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedGroup {
    pub name: String,
    pub points: Vec<PixelPoint>,
}

impl MappedGroup {
    /// Horizontal extent `(min_x, max_x)` of the group.
    #[must_use]
    pub fn x_span(&self) -> Option<(f64, f64)> {
        let min = self.points.iter().map(|p| OrderedFloat(p.x)).min()?;
        let max = self.points.iter().map(|p| OrderedFloat(p.x)).max()?;
        Some((min.0, max.0))
    }
}

/// Pixel-space dataset, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedDataset {
    groups: Vec<MappedGroup>,
    hidden_index: usize,
}

impl MappedDataset {
    #[must_use]
    pub fn groups(&self) -> &[MappedGroup] {
        &self.groups
    }

    #[must_use]
    pub fn hidden_index(&self) -> usize {
        self.hidden_index
    }

    #[must_use]
    pub fn hidden_group(&self) -> &MappedGroup {
        &self.groups[self.hidden_index]
    }

    /// Groups drawn before the reveal, with their display index.
    pub fn visible_groups(&self) -> impl Iterator<Item = (usize, &MappedGroup)> {
        let hidden = self.hidden_index;
        self.groups
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != hidden)
    }

    /// Last point drawn before the hidden segment starts.
    #[must_use]
    pub fn anchor(&self) -> PixelPoint {
        let previous = &self.groups[self.hidden_index - 1];
        previous.points[previous.points.len() - 1]
    }

    /// Hidden points prefixed with the anchor.
    #[must_use]
    pub fn hidden_sequence(&self) -> Vec<PixelPoint> {
        let hidden = &self.hidden_group().points;
        let mut sequence = Vec::with_capacity(hidden.len() + 1);
        sequence.push(self.anchor());
        sequence.extend(hidden.iter().copied());
        sequence
    }

    #[must_use]
    pub fn first_visible_point(&self) -> Option<PixelPoint> {
        self.visible_groups()
            .find_map(|(_, group)| group.points.first().copied())
    }

    #[must_use]
    pub fn final_point(&self) -> Option<PixelPoint> {
        self.groups
            .iter()
            .rev()
            .find_map(|group| group.points.last().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::{CoordinateMapper, FieldGeometry};
    use crate::core::{DataGroup, DataPoint, Dataset, HiddenGroupSelector, Viewport};

    #[test]
    fn flat_dataset_maps_to_band_center() {
        let geometry = FieldGeometry::new(Viewport::new(200, 100), 10.0, 10.0).expect("geometry");
        let dataset = Dataset::new(
            vec![
                DataGroup::new("a", vec![DataPoint::new(0, 5.0)]),
                DataGroup::new("b", vec![DataPoint::new(1, 5.0)]),
            ],
            HiddenGroupSelector::Last,
        );
        let mapper = CoordinateMapper::from_dataset(geometry, &dataset).expect("mapper");
        assert_eq!(mapper.scaling_factor(), 0.0);
        assert!((mapper.map_y(5.0) - 50.0).abs() <= 1e-9);
        assert!((mapper.unmap_y(17.0) - 5.0).abs() <= 1e-9);
    }

    #[test]
    fn oversized_offset_is_rejected() {
        assert!(FieldGeometry::new(Viewport::new(100, 100), 50.0, 10.0).is_err());
        assert!(FieldGeometry::new(Viewport::new(100, 100), 10.0, 50.0).is_err());
    }
}
