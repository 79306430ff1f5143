use super::{Field, GridField, PointField, VectorSample};
use crate::error::{Axis, FieldError};
use crate::tools::wrap_lon;
use serde::{Deserialize, Serialize};

/// Field data as delivered by the host loader.
///
/// JSON arrays of `{lat, lon, u, v}` become `Points`, objects with
/// `{lats, lons, u, v}` become `Grid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldPayload {
    Grid(GridPayload),
    Points(Vec<VectorSample>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPayload {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
    pub u: Vec<Vec<f64>>,
    pub v: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Ascending,
    Descending,
}

impl FieldPayload {
    pub fn from_json(text: &str) -> Result<Self, FieldError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate and convert into the canonical field layout
    pub fn into_field(self) -> Result<Field, FieldError> {
        match self {
            FieldPayload::Points(samples) => points_field(samples).map(Field::Points),
            FieldPayload::Grid(grid) => grid_field(grid).map(Field::Grid),
        }
    }
}

fn points_field(mut samples: Vec<VectorSample>) -> Result<PointField, FieldError> {
    for (index, sample) in samples.iter_mut().enumerate() {
        let finite = sample.lat.is_finite() && sample.lon.is_finite() && sample.u.is_finite() && sample.v.is_finite();
        if !finite {
            return Err(FieldError::NonFinite { what: "samples", index });
        }
        // 0..360 exports
        sample.lon = wrap_lon(sample.lon);
    }
    Ok(PointField::new(samples))
}

fn grid_field(payload: GridPayload) -> Result<GridField, FieldError> {
    let GridPayload { mut lats, mut lons, mut u, mut v } = payload;

    check_dimensions("u", &u, lats.len(), lons.len())?;
    check_dimensions("v", &v, lats.len(), lons.len())?;
    check_finite("lats", &lats)?;
    check_finite("lons", &lons)?;
    for (what, rows) in [("u", &u), ("v", &v)] {
        for (i, row) in rows.iter().enumerate() {
            if let Some(j) = row.iter().position(|x| !x.is_finite()) {
                return Err(FieldError::NonFinite { what, index: i * lons.len() + j });
            }
        }
    }

    if axis_order(Axis::Lat, &lats)? == Order::Ascending {
        lats.reverse();
        u.reverse();
        v.reverse();
    }
    if axis_order(Axis::Lon, &lons)? == Order::Descending {
        lons.reverse();
        for row in u.iter_mut().chain(v.iter_mut()) {
            row.reverse();
        }
    }

    Ok(GridField { lats, lons, u, v })
}

fn check_dimensions(component: &'static str, rows: &[Vec<f64>], lats: usize, lons: usize) -> Result<(), FieldError> {
    if lats < 2 {
        return Err(FieldError::TooFewNodes { axis: Axis::Lat, len: lats });
    }
    if lons < 2 {
        return Err(FieldError::TooFewNodes { axis: Axis::Lon, len: lons });
    }
    let ragged = rows.iter().find(|row| row.len() != lons);
    if rows.len() != lats || ragged.is_some() {
        return Err(FieldError::DimensionMismatch {
            component,
            rows: rows.len(),
            cols: ragged.map_or(lons, |row| row.len()),
            lats,
            lons,
        });
    }
    Ok(())
}

fn check_finite(what: &'static str, values: &[f64]) -> Result<(), FieldError> {
    match values.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(FieldError::NonFinite { what, index }),
        None => Ok(()),
    }
}

fn axis_order(axis: Axis, values: &[f64]) -> Result<Order, FieldError> {
    let order = if values[1] > values[0] { Order::Ascending } else { Order::Descending };
    for (index, pair) in values.windows(2).enumerate() {
        let ok = match order {
            Order::Ascending => pair[1] > pair[0],
            Order::Descending => pair[1] < pair[0],
        };
        if !ok {
            return Err(FieldError::NonMonotonic { axis, index: index + 1 });
        }
    }
    Ok(order)
}
