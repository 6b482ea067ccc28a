pub mod auth;
pub mod lesson;
pub mod quiz;
pub mod shared;
pub mod teacher;
