pub mod crud;
pub mod login;

// Re-export handler functions for use in routing
pub use crud::create as user_create;
pub use crud::delete as user_delete;
pub use crud::get as user_get;
pub use crud::list as user_list;
pub use crud::update as user_update;

pub use login::login as user_login;
