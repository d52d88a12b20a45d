//! Gridded fields on a regular latitude/longitude grid
//!
//! A [`GriddedField`] holds a `(time, latitude, longitude)` cube together with its
//! coordinate vectors, e.g. monthly sea surface temperatures. Reading the data from
//! disk is left to the caller; this module provides the in-memory operations used to
//! derive a regional index from such a cube:
//!
//! 1. mask missing values ([`GriddedField::mask_fill_values`])
//! 2. cut out a region ([`GriddedField::select_region`])
//! 3. cut out a range of years ([`GriddedField::select_years`])
//! 4. average over the region ([`GriddedField::spatial_mean`])
//!
//! # Examples
//!
//! ```rust
//! use climod_core::spatial::{GriddedField, LatLonBox, YearWindow};
//! use ndarray::{array, Array3};
//!
//! let field = GriddedField::new(
//!     array![1971.5, 1972.5, 1973.5],
//!     array![-10.0, 0.0, 10.0],
//!     array![-160.0, -140.0],
//!     Array3::from_elem((3, 3, 2), 26.0),
//! )
//! .unwrap();
//!
//! let index = field
//!     .select_region(&LatLonBox::nino34())
//!     .and_then(|f| f.select_years(&YearWindow::new(1971, 1972)))
//!     .unwrap()
//!     .spatial_mean();
//! assert_eq!(index.to_vec(), vec![26.0, 26.0]);
//! ```

use crate::constants::FILL_VALUE_THRESHOLD;
use crate::errors::{ClimodError, ClimodResult};
use crate::timeseries::{FloatValue, Time};
use ndarray::{Array1, Array3, Axis};
use serde::{Deserialize, Serialize};

/// Inclusive latitude/longitude box in degrees
///
/// Longitudes are in the `[-180, 180]` convention, with west negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBox {
    pub lat_min: FloatValue,
    pub lat_max: FloatValue,
    pub lon_min: FloatValue,
    pub lon_max: FloatValue,
}

impl LatLonBox {
    pub fn new(
        lat_min: FloatValue,
        lat_max: FloatValue,
        lon_min: FloatValue,
        lon_max: FloatValue,
    ) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Nino 3.4 region: 5S-5N, 170W-120W
    pub fn nino34() -> Self {
        Self::new(-5.0, 5.0, -170.0, -120.0)
    }

    pub fn contains_latitude(&self, lat: FloatValue) -> bool {
        lat >= self.lat_min && lat <= self.lat_max
    }

    pub fn contains_longitude(&self, lon: FloatValue) -> bool {
        lon >= self.lon_min && lon <= self.lon_max
    }
}

/// Inclusive range of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub first: i32,
    pub last: i32,
}

impl YearWindow {
    pub fn new(first: i32, last: i32) -> Self {
        Self { first, last }
    }

    /// Whether a decimal-year time stamp falls in the window
    ///
    /// Every time stamp from 1 January of `first` up to 31 December of `last` matches.
    pub fn contains(&self, time: Time) -> bool {
        let year = time.floor();
        year >= self.first as Time && year <= self.last as Time
    }
}

/// A `(time, latitude, longitude)` data cube with its coordinates
///
/// Deserialising goes through [`GriddedField::new`], so a document whose
/// coordinates disagree with the data shape is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GriddedFieldData")]
pub struct GriddedField {
    times: Array1<Time>,
    latitudes: Array1<FloatValue>,
    longitudes: Array1<FloatValue>,
    values: Array3<FloatValue>,
}

/// Unchecked serialised form of a [`GriddedField`]
#[derive(Deserialize)]
struct GriddedFieldData {
    times: Array1<Time>,
    latitudes: Array1<FloatValue>,
    longitudes: Array1<FloatValue>,
    values: Array3<FloatValue>,
}

impl TryFrom<GriddedFieldData> for GriddedField {
    type Error = ClimodError;

    fn try_from(data: GriddedFieldData) -> ClimodResult<Self> {
        Self::new(data.times, data.latitudes, data.longitudes, data.values)
    }
}

impl GriddedField {
    /// Create a field, checking that every coordinate matches the data shape
    pub fn new(
        times: Array1<Time>,
        latitudes: Array1<FloatValue>,
        longitudes: Array1<FloatValue>,
        values: Array3<FloatValue>,
    ) -> ClimodResult<Self> {
        let (n_time, n_lat, n_lon) = values.dim();
        check_length("time", times.len(), n_time)?;
        check_length("latitude", latitudes.len(), n_lat)?;
        check_length("longitude", longitudes.len(), n_lon)?;

        Ok(Self {
            times,
            latitudes,
            longitudes,
            values,
        })
    }

    pub fn times(&self) -> &Array1<Time> {
        &self.times
    }

    pub fn latitudes(&self) -> &Array1<FloatValue> {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &Array1<FloatValue> {
        &self.longitudes
    }

    pub fn values(&self) -> &Array3<FloatValue> {
        &self.values
    }

    /// Replace values at or below the fill threshold (sea ice and land) with NaN
    pub fn mask_fill_values(&mut self) {
        self.values.mapv_inplace(|v| {
            if v <= FILL_VALUE_THRESHOLD {
                FloatValue::NAN
            } else {
                v
            }
        });
    }

    /// Keep only the grid cells inside `region`
    pub fn select_region(&self, region: &LatLonBox) -> ClimodResult<Self> {
        let lat_index = matching_indices("latitude", &self.latitudes, |lat| {
            region.contains_latitude(lat)
        })?;
        let lon_index = matching_indices("longitude", &self.longitudes, |lon| {
            region.contains_longitude(lon)
        })?;

        Ok(Self {
            times: self.times.clone(),
            latitudes: self.latitudes.select(Axis(0), &lat_index),
            longitudes: self.longitudes.select(Axis(0), &lon_index),
            values: self
                .values
                .select(Axis(1), &lat_index)
                .select(Axis(2), &lon_index),
        })
    }

    /// Keep only the time steps inside `window`
    pub fn select_years(&self, window: &YearWindow) -> ClimodResult<Self> {
        let time_index = matching_indices("time", &self.times, |t| window.contains(t))?;

        Ok(Self {
            times: self.times.select(Axis(0), &time_index),
            latitudes: self.latitudes.clone(),
            longitudes: self.longitudes.clone(),
            values: self.values.select(Axis(0), &time_index),
        })
    }

    /// Unweighted mean over all grid cells for each time step
    ///
    /// Missing (NaN) cells are skipped. A time step with no valid cells yields NaN.
    pub fn spatial_mean(&self) -> Array1<FloatValue> {
        self.values
            .outer_iter()
            .map(|slice| {
                let (sum, count) = slice
                    .iter()
                    .filter(|v| !v.is_nan())
                    .fold((0.0, 0usize), |(sum, count), &v| (sum + v, count + 1));
                if count == 0 {
                    FloatValue::NAN
                } else {
                    sum / count as FloatValue
                }
            })
            .collect()
    }
}

fn check_length(axis: &'static str, found: usize, expected: usize) -> ClimodResult<()> {
    if found != expected {
        return Err(ClimodError::ShapeMismatch {
            axis,
            expected,
            found,
        });
    }
    Ok(())
}

fn matching_indices<F>(
    axis: &'static str,
    coordinate: &Array1<FloatValue>,
    predicate: F,
) -> ClimodResult<Vec<usize>>
where
    F: Fn(FloatValue) -> bool,
{
    let indices: Vec<usize> = coordinate
        .iter()
        .enumerate()
        .filter(|&(_, &value)| predicate(value))
        .map(|(i, _)| i)
        .collect();

    if indices.is_empty() {
        return Err(ClimodError::EmptySelection { axis });
    }
    Ok(indices)
}
