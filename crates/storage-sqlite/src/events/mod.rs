//! SQLite storage implementation for events.

mod model;
mod repository;

pub use model::EventDB;
pub use repository::EventRepository;
