// Public handlers: service info, health, and token acquisition
pub mod home;
pub mod users;
