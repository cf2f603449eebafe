// Two route families: /api/users and /api/events. Registration and
// login are the only handlers reachable without a session token.
pub mod events;
pub mod users;
