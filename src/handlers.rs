pub mod applications;
pub mod auth;
pub mod catalog;
pub mod documents;
pub mod persons;
