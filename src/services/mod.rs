pub mod event_service;
pub mod user_service;

pub use event_service::{EventChanges, EventError, EventService, NewEvent};
pub use user_service::{NewUser, ProfileChanges, UserError, UserService};
