pub mod event;
pub mod user;

pub use event::{Event, StoredMessage};
pub use user::User;
