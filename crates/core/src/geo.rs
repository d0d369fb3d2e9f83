//! Geo validator: great-circle distance and check-in admission.
//!
//! Pure functions, no side effects. Distance uses the haversine formula on
//! a spherical-earth model.

use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_RADIUS_KM, GEOFENCE_RADIUS_METERS};
use crate::errors::{Error, Result, ValidationError};

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    /// Rejects non-finite values and out-of-range degrees.
    pub fn validate(&self) -> Result<()> {
        let in_range = self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng);
        if in_range {
            Ok(())
        } else {
            Err(Error::Validation(ValidationError::InvalidInput(format!(
                "invalid coordinate ({}, {})",
                self.lat, self.lng
            ))))
        }
    }
}

/// Outcome of admission validation for a geofenced check-in.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Admitted { distance_m: f64 },
    TooFar { distance_m: f64 },
    AtCapacity,
    AlreadyCheckedIn,
}

/// Great-circle distance between two coordinates in kilometers
/// (haversine, spherical earth of radius 6371 km).
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Classifies a geofenced check-in attempt.
///
/// A reported position is admitted only strictly inside the 100 m geofence.
/// A duplicate attempt is reported as such before the capacity verdict so
/// that an already-admitted user is never told the event is full.
pub fn validate_admission(
    reported: Coordinate,
    event_location: Coordinate,
    capacity: Option<i64>,
    existing_count: i64,
    already_checked_in: bool,
) -> Admission {
    let distance_m = distance_km(reported, event_location) * 1000.0;
    if distance_m >= GEOFENCE_RADIUS_METERS {
        return Admission::TooFar { distance_m };
    }
    if already_checked_in {
        return Admission::AlreadyCheckedIn;
    }
    if let Some(max) = capacity {
        if existing_count >= max {
            return Admission::AtCapacity;
        }
    }
    Admission::Admitted { distance_m }
}
