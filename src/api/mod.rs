pub mod events;
pub mod users;

pub use events::{EventResponse, ResolveDepth};
pub use users::{LoginResponse, UserResponse};
