use thiserror::Error;

/// Validation failures of a check-in attempt. Returned synchronously with
/// enough detail for the caller to display a specific message.
#[derive(Error, Debug)]
pub enum CheckInError {
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Event is not active: {0}")]
    EventInactive(String),

    #[error("Invalid secret code")]
    InvalidCode,

    #[error("Reported position is {distance_m:.1} m from the event, outside the geofence")]
    TooFar { distance_m: f64 },

    #[error("Event is at capacity: {0}")]
    AtCapacity(String),

    #[error("Already checked in to event {0}")]
    AlreadyCheckedIn(String),
}
