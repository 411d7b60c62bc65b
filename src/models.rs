pub mod auth;
pub mod dashboard;
pub mod project;
pub mod task;
pub mod user;
