//! Check-in intake module - geofenced and secret-code event check-ins.

mod checkins_errors;
mod checkins_model;
mod checkins_service;
mod checkins_traits;


pub use checkins_errors::CheckInError;
pub use checkins_model::{
    CheckIn, CheckInMode, CheckInResult, Event, EventStatus, NewCheckIn,
};
pub use checkins_service::CheckInService;
pub use checkins_traits::{CheckInRepositoryTrait, CheckInServiceTrait, EventRepositoryTrait};
