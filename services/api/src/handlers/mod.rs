pub mod auth;
pub mod student;
pub mod user;
