pub mod auth;
pub mod contents;
pub mod forms;
pub mod genders;
pub mod setup;
pub mod tags;
pub mod tracks;
pub mod users;
