pub mod attendance;
pub mod crud;
pub mod messages;

// Re-export handler functions for use in routing
pub use crud::create as event_create;
pub use crud::delete as event_delete;
pub use crud::get as event_get;
pub use crud::list as event_list;
pub use crud::update as event_update;

pub use attendance::attend as event_attend;
pub use attendance::leave as event_leave;

pub use messages::post as event_post_message;
