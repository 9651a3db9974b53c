pub mod bot;
pub mod config;
pub mod detection;
pub mod handlers;
pub mod localization;
pub mod moderation;
pub mod persistence;
pub mod rate_limiters;
pub mod registration;
pub mod reply;
pub mod router;
pub mod session;
pub mod store;
pub mod summary;
pub mod utils;
pub mod validation;
