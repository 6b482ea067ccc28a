pub mod auth;
pub mod form;
pub mod json;
pub mod path;
pub mod query;
