//! Server-rendered HTML pages over the same services as the JSON API.
//!
//! Handlers return a full page, a 303 redirect after a successful mutation,
//! or a [`PageError`] rendered as the error view. Edit and delete pages for
//! teachers and lessons require a login session.

pub mod account;
pub mod lesson;
pub mod quiz;
pub mod teacher;
mod view;

pub use view::PageError;
