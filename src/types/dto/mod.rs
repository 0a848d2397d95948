// Data transfer objects - request/response bodies shared by server and client
pub mod academic_year;
pub mod admin;
pub mod auth;
pub mod common;
pub mod notification;
