/// Mean earth radius in kilometers for the spherical-earth haversine model
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Maximum allowed distance between a reported position and an event
/// location for a geofenced check-in, in meters
pub const GEOFENCE_RADIUS_METERS: f64 = 100.0;

/// Points per level step
pub const POINTS_PER_LEVEL: i64 = 100;

/// Points awarded for a secret-code check-in
pub const CHECKIN_BASE_POINTS: i64 = 10;

/// Points awarded for a geofenced check-in
pub const CHECKIN_GEO_POINTS: i64 = 15;

/// Floor for auto-generated goal targets
pub const MIN_GOAL_TARGET: i64 = 500;
