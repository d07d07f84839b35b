pub mod mapping;
pub mod score;
pub mod types;

pub use mapping::{CoordinateMapper, FieldGeometry, MappedDataset, MappedGroup};
pub use score::{DifferenceScore, difference_score, final_score, trapezoid_area};
pub use types::{DataGroup, DataPoint, Dataset, HiddenGroupSelector, PixelPoint, Viewport};
