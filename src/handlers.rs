pub mod board;
pub mod dashboard;
pub mod projects;
pub mod tasks;
