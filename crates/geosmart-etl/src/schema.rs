//! Static schema registry for the land-cover survey layout.
//!
//! Every input table must conform to this fixed column set: ten continuous
//! measurements, two one-hot indicator groups (wilderness areas and soil
//! types) and an optional classification label. The registry is a pure
//! declaration with no failure modes; the ingestor and validator consult it
//! to apply storage widths and integrity rules.

use once_cell::sync::Lazy;
use polars::prelude::DataType;

/// Continuous physical/environmental measurements, stored as Float32.
pub const CONTINUOUS_COLUMNS: [&str; 10] = [
    "Elevation",
    "Aspect",
    "Slope",
    "Horizontal_Distance_To_Hydrology",
    "Vertical_Distance_To_Hydrology",
    "Horizontal_Distance_To_Roadways",
    "Hillshade_9am",
    "Hillshade_Noon",
    "Hillshade_3pm",
    "Horizontal_Distance_To_Fire_Points",
];

/// Optional classification label (1..7), stored as Int8 when present.
pub const LABEL_COLUMN: &str = "Cover_Type";

/// Number of wilderness-area indicator columns.
pub const WILDERNESS_COUNT: usize = 4;

/// Number of soil-type indicator columns.
pub const SOIL_COUNT: usize = 40;

static WILDERNESS_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    (1..=WILDERNESS_COUNT)
        .map(|i| format!("Wilderness_Area{}", i))
        .collect()
});

static SOIL_COLUMNS: Lazy<Vec<String>> =
    Lazy::new(|| (1..=SOIL_COUNT).map(|i| format!("Soil_Type{}", i)).collect());

/// Semantic role of a registered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Continuous measurement, standardized before persistence.
    Continuous,
    /// Wilderness-area one-hot indicator (group A, strictly exclusive).
    Wilderness,
    /// Soil-type one-hot indicator (group B).
    Soil,
    /// Optional supervision label.
    Label,
}

/// One of the two one-hot indicator groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorGroup {
    Wilderness,
    Soil,
}

impl IndicatorGroup {
    /// Column names of this group, in suffix order.
    pub fn columns(&self) -> &'static [String] {
        match self {
            Self::Wilderness => &WILDERNESS_COLUMNS,
            Self::Soil => &SOIL_COLUMNS,
        }
    }

    /// Common prefix of this group's column names.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Wilderness => "Wilderness_Area",
            Self::Soil => "Soil_Type",
        }
    }

    /// Display name used in error reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wilderness => "wilderness_area",
            Self::Soil => "soil_type",
        }
    }
}

/// Wilderness-area indicator column names (`Wilderness_Area1..4`).
pub fn wilderness_columns() -> &'static [String] {
    &WILDERNESS_COLUMNS
}

/// Soil-type indicator column names (`Soil_Type1..40`).
pub fn soil_columns() -> &'static [String] {
    &SOIL_COLUMNS
}

/// All columns required in every input, i.e. everything except the label.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    CONTINUOUS_COLUMNS
        .iter()
        .copied()
        .chain(WILDERNESS_COLUMNS.iter().map(String::as_str))
        .chain(SOIL_COLUMNS.iter().map(String::as_str))
}

/// Semantic role of `column`, or `None` for passthrough columns.
pub fn role_of(column: &str) -> Option<ColumnRole> {
    if CONTINUOUS_COLUMNS.contains(&column) {
        Some(ColumnRole::Continuous)
    } else if WILDERNESS_COLUMNS.iter().any(|c| c == column) {
        Some(ColumnRole::Wilderness)
    } else if SOIL_COLUMNS.iter().any(|c| c == column) {
        Some(ColumnRole::Soil)
    } else if column == LABEL_COLUMN {
        Some(ColumnRole::Label)
    } else {
        None
    }
}

/// Whether `column` belongs to the registered schema.
pub fn is_known(column: &str) -> bool {
    role_of(column).is_some()
}

/// Minimal fixed-width storage type for `column`.
///
/// Indicator and label columns fit in a single byte; continuous columns use
/// single-precision floats. Unregistered columns get `None` and pass through
/// with whatever dtype the reader infers.
pub fn storage_type(column: &str) -> Option<DataType> {
    match role_of(column)? {
        ColumnRole::Continuous => Some(DataType::Float32),
        ColumnRole::Wilderness | ColumnRole::Soil | ColumnRole::Label => Some(DataType::Int8),
    }
}

/// 1-based index encoded in an indicator column name, e.g. `Soil_Type29` -> 29.
pub fn indicator_index(column: &str, group: IndicatorGroup) -> Option<u32> {
    column.strip_prefix(group.prefix())?.parse().ok()
}
